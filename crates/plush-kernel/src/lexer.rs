//! Lexer for plush command lines.
//!
//! Converts one input line into a stream of tokens using the logos lexer
//! generator. The grammar is flat: pipe, background, sequence, and redirect
//! operators, and whitespace-delimited words. There is no quoting or escape
//! interpretation.

use logos::Logos;
use std::fmt;

/// Lexer error types.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    UnexpectedCharacter,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter => write!(f, "unexpected character"),
        }
    }
}

impl std::error::Error for LexError {}

/// A token of the command-line grammar.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(error = LexError)]
pub enum Token {
    /// `|` — pipe into the next command.
    #[token("|")]
    Pipe,

    /// `&` — run the preceding command in the background.
    #[token("&")]
    Background,

    /// `;` — sequential separator.
    #[token(";")]
    Semi,

    /// `<` — redirect standard input.
    #[token("<")]
    RedirectIn,

    /// `>` — redirect standard output.
    #[token(">")]
    RedirectOut,

    /// `2>` — redirect standard error.
    #[token("2>")]
    RedirectErr,

    /// Any run of characters that is not whitespace or an operator.
    #[regex(r"[^ \t\r\n|&;<>]+", |lex| lex.slice().to_owned())]
    Word(String),
}

/// Tokenize one command line.
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    for result in Token::lexer(line) {
        tokens.push(result?);
    }
    Ok(tokens)
}
