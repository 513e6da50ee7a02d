//! plush REPL — interactive front end for the plush kernel.
//!
//! Handles:
//! - The read–dispatch loop over rustyline, with persistent history
//! - Prompt customization via the `prompt` line command
//! - History listing (`history`) and recall (`!<n>`, `!<prefix>`)
//! - `^C`/`^D` behavior at the prompt
//! - One-shot (`-c`) and script execution modes

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::runtime::Runtime;

use plush_kernel::{ExecResult, Kernel, LineOutcome};

const DEFAULT_PROMPT: &str = "default% ";

/// What the loop should do after evaluating a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// REPL state: the kernel, its runtime, the prompt, and session history.
pub struct Repl {
    kernel: Kernel,
    runtime: Runtime,
    prompt: String,
    history: Vec<String>,
}

impl Repl {
    /// Create a REPL and install the interpreter's signal handling.
    pub fn new() -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let kernel = Kernel::new();
        runtime
            .block_on(async { kernel.install_interrupt_guards() })
            .context("Failed to install signal handlers")?;

        Ok(Self {
            kernel,
            runtime,
            prompt: DEFAULT_PROMPT.to_string(),
            history: Vec::new(),
        })
    }

    /// Handle the `prompt <text>` command.
    fn set_prompt(&mut self, arg: &str) {
        match prompt_for(arg) {
            Some(prompt) => {
                self.prompt = prompt;
                println!("Setting prompt to: {}", self.prompt);
            }
            None => self.prompt = DEFAULT_PROMPT.to_string(),
        }
    }

    /// Print the session's numbered history.
    fn print_history(&self) {
        for (i, entry) in self.history.iter().enumerate() {
            println!("{}: {}", i + 1, entry);
        }
    }

    /// Evaluate one line and print its results.
    fn eval_and_print(&mut self, line: &str) -> Flow {
        match self.runtime.block_on(self.kernel.eval_line(line)) {
            Ok(LineOutcome::Exit) => Flow::Exit,
            Ok(LineOutcome::Continue(results)) => {
                print_results(&results);
                Flow::Continue
            }
            Err(e) => {
                eprintln!("plush: {e}");
                Flow::Continue
            }
        }
    }
}

/// Compute the prompt for a `prompt` command argument.
///
/// An empty or whitespace-leading argument resets to the default (None);
/// otherwise the new prompt gets a trailing space appended.
fn prompt_for(arg: &str) -> Option<String> {
    if arg.is_empty() || arg.starts_with(char::is_whitespace) {
        None
    } else {
        Some(format!("{arg} "))
    }
}

/// Resolve a `!` history recall request (the text after the `!`).
fn resolve_bang(history: &[String], request: &str) -> Result<String, &'static str> {
    if request.is_empty() {
        return Err("Error: '!' requires a command number or prefix string.");
    }

    if request.chars().all(|c| c.is_ascii_digit()) {
        let n: usize = request
            .parse()
            .map_err(|_| "No such command in history.")?;
        return n
            .checked_sub(1)
            .and_then(|i| history.get(i))
            .cloned()
            .ok_or("No such command in history.");
    }

    history
        .iter()
        .rev()
        .find(|entry| entry.starts_with(request))
        .cloned()
        .ok_or("No such command in history.")
}

fn print_results(results: &[ExecResult]) {
    for result in results {
        if !result.out.is_empty() {
            println!("{}", result.out);
        }
        if !result.err.is_empty() {
            eprintln!("{}", result.err);
        }
    }
}

/// Location of the persistent history file.
fn history_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.data_dir().join("plush").join("history.txt"))
}

/// Save REPL history to disk.
fn save_history(rl: &mut Editor<(), DefaultHistory>, path: &Option<PathBuf>) {
    if let Some(path) = path {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create history directory: {}", e);
            }
        }
        if let Err(e) = rl.save_history(path) {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

/// Run the interactive REPL.
pub fn run() -> Result<()> {
    let mut rl: Editor<(), DefaultHistory> =
        Editor::new().context("Failed to create editor")?;

    let history_path = history_path();
    if let Some(ref path) = history_path {
        if let Err(e) = rl.load_history(path) {
            // Missing file is expected on first run.
            let is_not_found = matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound);
            if !is_not_found {
                tracing::warn!("Failed to load history: {}", e);
            }
        }
    }

    let mut repl = Repl::new()?;

    loop {
        match rl.readline(&repl.prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                if let Some(rest) = trimmed.strip_prefix("prompt ") {
                    repl.set_prompt(rest);
                    continue;
                }

                if trimmed == "history" {
                    repl.print_history();
                    continue;
                }

                if let Some(request) = trimmed.strip_prefix('!') {
                    match resolve_bang(&repl.history, request) {
                        Ok(resolved) => {
                            println!("{resolved}");
                            if repl.eval_and_print(&resolved) == Flow::Exit {
                                break;
                            }
                        }
                        Err(message) => println!("{message}"),
                    }
                    continue;
                }

                if let Err(e) = rl.add_history_entry(trimmed) {
                    tracing::warn!("Failed to add history entry: {}", e);
                }
                repl.history.push(trimmed.to_string());

                if repl.eval_and_print(trimmed) == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C pressed. Type 'exit' to quit shell.");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    save_history(&mut rl, &history_path);
    Ok(())
}

/// Evaluate one command line and exit with its status.
pub fn run_command_line(cmd: &str) -> Result<i32> {
    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let mut kernel = Kernel::new();
    runtime
        .block_on(async { kernel.install_interrupt_guards() })
        .context("Failed to install signal handlers")?;

    match runtime.block_on(kernel.eval_line(cmd))? {
        LineOutcome::Exit => Ok(0),
        LineOutcome::Continue(results) => {
            print_results(&results);
            Ok(results.last().map(|r| r.code).unwrap_or(0))
        }
    }
}

/// Run a script file line by line, stopping at `exit`.
pub fn run_script(path: &str) -> Result<i32> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script: {path}"))?;

    let runtime = Runtime::new().context("Failed to create tokio runtime")?;
    let mut kernel = Kernel::new();
    runtime
        .block_on(async { kernel.install_interrupt_guards() })
        .context("Failed to install signal handlers")?;

    let mut code = 0;
    for (lineno, line) in source.lines().enumerate() {
        // Skip a shebang on the first line.
        if lineno == 0 && line.starts_with("#!") {
            continue;
        }
        match runtime.block_on(kernel.eval_line(line)) {
            Ok(LineOutcome::Exit) => return Ok(0),
            Ok(LineOutcome::Continue(results)) => {
                print_results(&results);
                if let Some(last) = results.last() {
                    code = last.code;
                }
            }
            Err(e) => eprintln!("plush: {path}:{}: {e}", lineno + 1),
        }
    }
    Ok(code)
}
