//! pwd — Print the shell's working directory.

use async_trait::async_trait;

use crate::builtins::Builtin;
use crate::result::ExecResult;
use crate::state::ShellState;

/// Pwd builtin.
pub struct Pwd;

#[async_trait]
impl Builtin for Pwd {
    fn name(&self) -> &str {
        "pwd"
    }

    async fn execute(&self, _argv: &[String], state: &mut ShellState) -> ExecResult {
        ExecResult::success(state.cwd.display().to_string())
    }
}
