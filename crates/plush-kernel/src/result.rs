//! ExecResult — the outcome of one command, builtin, or pipeline.
//!
//! External commands inherit the shell's standard streams, so for them the
//! interesting field is `code`; builtins report through `out`/`err` and the
//! REPL prints those. Failures that must not kill the interactive loop
//! (spawn errors, bad redirect targets, builtin argument errors) travel as
//! failed results, never as `Err`.

use std::process::ExitStatus;

/// The result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i32,
    /// Output text for the REPL to print (builtins only; external commands
    /// write to the terminal themselves).
    pub out: String,
    /// Diagnostic text for the REPL to print on stderr.
    pub err: String,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
        }
    }

    /// Create a failed result with a diagnostic message.
    pub fn failure(code: i32, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
        }
    }

    /// Create a result from a child's wait status.
    ///
    /// A signal termination maps to the conventional `128 + signum`.
    pub fn from_status(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        let code = match status.code() {
            Some(code) => code,
            None => 128 + status.signal().unwrap_or(0),
        };
        Self {
            code,
            out: String::new(),
            err: String::new(),
        }
    }

    /// True if the command succeeded (exit code 0).
    pub fn ok(&self) -> bool {
        self.code == 0
    }
}

impl Default for ExecResult {
    fn default() -> Self {
        Self::success("")
    }
}
