//! Parser for plush command lines.
//!
//! Builds a sequence of [`CommandSpec`]s from the lexer's token stream. The
//! parser is a plain cursor object over its own token vector, so parsing is
//! reentrant and independently testable.

use thiserror::Error;

use crate::ast::CommandSpec;
use crate::lexer::Token;

/// Parse error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A redirect operator with no following file name.
    #[error("missing target after `{0}`")]
    MissingRedirectTarget(&'static str),
    /// A `|` with no command on one of its sides.
    #[error("empty pipeline stage")]
    EmptyPipelineStage,
    /// A `&` with no preceding command.
    #[error("missing command before `&`")]
    MissingCommand,
    /// The line ends with `|`.
    #[error("unterminated pipeline")]
    UnterminatedPipeline,
}

/// Cursor parser over a token vector.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse the whole token stream into a descriptor sequence.
    pub fn parse(mut self) -> Result<Vec<CommandSpec>, ParseError> {
        let mut specs: Vec<CommandSpec> = Vec::new();
        let mut current: Option<CommandSpec> = None;

        while let Some(token) = self.next() {
            match token {
                Token::Word(word) => {
                    current
                        .get_or_insert_with(|| CommandSpec::new(Vec::new()))
                        .argv
                        .push(word);
                }
                Token::RedirectIn => {
                    let target = self.expect_word("<")?;
                    current
                        .get_or_insert_with(|| CommandSpec::new(Vec::new()))
                        .redirect_in = Some(target);
                }
                Token::RedirectOut => {
                    let target = self.expect_word(">")?;
                    current
                        .get_or_insert_with(|| CommandSpec::new(Vec::new()))
                        .redirect_out = Some(target);
                }
                Token::RedirectErr => {
                    let target = self.expect_word("2>")?;
                    current
                        .get_or_insert_with(|| CommandSpec::new(Vec::new()))
                        .redirect_err = Some(target);
                }
                Token::Pipe => {
                    let mut spec = current.take().ok_or(ParseError::EmptyPipelineStage)?;
                    if spec.argv.is_empty() {
                        return Err(ParseError::EmptyPipelineStage);
                    }
                    spec.pipe_to_next = true;
                    Self::finish(&mut specs, spec);
                }
                Token::Background => {
                    let mut spec = current.take().ok_or(ParseError::MissingCommand)?;
                    if spec.argv.is_empty() {
                        return Err(ParseError::MissingCommand);
                    }
                    spec.background = true;
                    Self::finish(&mut specs, spec);
                }
                Token::Semi => {
                    if let Some(spec) = current.take() {
                        if spec.argv.is_empty() {
                            return Err(ParseError::MissingCommand);
                        }
                        Self::finish(&mut specs, spec);
                    }
                    // Empty segments between separators are skipped.
                }
            }
        }

        if let Some(spec) = current.take() {
            if spec.argv.is_empty() {
                return Err(ParseError::MissingCommand);
            }
            Self::finish(&mut specs, spec);
        }

        if specs.last().is_some_and(|s| s.pipe_to_next) {
            return Err(ParseError::UnterminatedPipeline);
        }

        Ok(specs)
    }

    fn finish(specs: &mut Vec<CommandSpec>, mut spec: CommandSpec) {
        spec.name = spec.argv[0].clone();
        specs.push(spec);
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect_word(&mut self, operator: &'static str) -> Result<String, ParseError> {
        match self.next() {
            Some(Token::Word(word)) => Ok(word),
            _ => Err(ParseError::MissingRedirectTarget(operator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Vec<CommandSpec>, ParseError> {
        Parser::new(crate::lexer::tokenize(line).unwrap()).parse()
    }

    #[test]
    fn simple_command() {
        let specs = parse("echo hello world").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "echo");
        assert_eq!(specs[0].argv, vec!["echo", "hello", "world"]);
        assert!(!specs[0].background);
        assert!(!specs[0].pipe_to_next);
    }

    #[test]
    fn all_three_redirects() {
        let specs = parse("prog < in.txt > out.txt 2> err.txt").unwrap();
        assert_eq!(specs[0].redirect_in.as_deref(), Some("in.txt"));
        assert_eq!(specs[0].redirect_out.as_deref(), Some("out.txt"));
        assert_eq!(specs[0].redirect_err.as_deref(), Some("err.txt"));
        assert_eq!(specs[0].argv, vec!["prog"]);
    }

    #[test]
    fn redirect_before_arguments() {
        // The original grammar allows the target anywhere after the operator.
        let specs = parse("sort < data -r").unwrap();
        assert_eq!(specs[0].redirect_in.as_deref(), Some("data"));
        assert_eq!(specs[0].argv, vec!["sort", "-r"]);
    }

    #[test]
    fn pipeline_links_are_contiguous() {
        let specs = parse("cat f | sort | uniq").unwrap();
        assert_eq!(specs.len(), 3);
        assert!(specs[0].pipe_to_next);
        assert!(specs[1].pipe_to_next);
        assert!(!specs[2].pipe_to_next);
    }

    #[test]
    fn background_marks_the_command() {
        let specs = parse("sleep 10 &").unwrap();
        assert!(specs[0].background);
    }

    #[test]
    fn background_then_next_command() {
        let specs = parse("sleep 10 & pwd").unwrap();
        assert_eq!(specs.len(), 2);
        assert!(specs[0].background);
        assert!(!specs[1].background);
    }

    #[test]
    fn sequential_separator() {
        let specs = parse("cd /tmp ; pwd").unwrap();
        assert_eq!(specs.len(), 2);
    }

    #[test]
    fn empty_segments_skipped() {
        let specs = parse("; ; pwd ;").unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "pwd");
    }

    #[test]
    fn missing_redirect_target_is_an_error() {
        assert_eq!(
            parse("ls >"),
            Err(ParseError::MissingRedirectTarget(">"))
        );
    }

    #[test]
    fn dangling_pipe_is_an_error() {
        assert_eq!(parse("ls |"), Err(ParseError::UnterminatedPipeline));
    }

    #[test]
    fn leading_pipe_is_an_error() {
        assert_eq!(parse("| sort"), Err(ParseError::EmptyPipelineStage));
    }

    #[test]
    fn double_pipe_is_an_error() {
        assert_eq!(parse("a | | b"), Err(ParseError::EmptyPipelineStage));
    }

    #[test]
    fn bare_background_is_an_error() {
        assert_eq!(parse("&"), Err(ParseError::MissingCommand));
    }

    #[test]
    fn empty_line_parses_to_nothing() {
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn pipeline_with_redirects_at_the_edges() {
        let specs = parse("cat < in | tr a-z A-Z > out").unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0].redirect_in.as_deref(), Some("in"));
        assert_eq!(specs[1].redirect_out.as_deref(), Some("out"));
    }
}
