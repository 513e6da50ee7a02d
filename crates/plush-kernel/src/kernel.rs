//! The Kernel — owns and coordinates the core components.
//!
//! One `eval_line` call takes a raw input line through environment
//! expansion, tokenizing, parsing, grouping, and dispatch. Builtins run
//! before any process is spawned; `exit` unwinds the control loop; plain
//! commands go to the launcher and pipeline runs to the orchestrator.
//! Sequential groups separated by `;` complete in order, with foreground
//! groups finishing before the next is dispatched.

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::ast::{self, Invocation};
use crate::builtins::{BuiltinRegistry, register_builtins};
use crate::expand::expand_env_vars;
use crate::lexer::tokenize;
use crate::parser::Parser;
use crate::result::ExecResult;
use crate::scheduler::{Supervisor, run_command, run_pipeline};
use crate::state::ShellState;

/// What the control loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Keep reading; these are the results of the line's invocations.
    Continue(Vec<ExecResult>),
    /// The `exit` builtin ran; terminate with success status.
    Exit,
}

/// The interpreter core.
pub struct Kernel {
    state: ShellState,
    builtins: BuiltinRegistry,
    supervisor: Arc<Supervisor>,
}

impl Kernel {
    /// Create a kernel rooted at the process's working directory.
    pub fn new() -> Self {
        Self::with_state(ShellState::new())
    }

    /// Create a kernel with explicit shell state (tests, script mode).
    pub fn with_state(state: ShellState) -> Self {
        let mut builtins = BuiltinRegistry::new();
        register_builtins(&mut builtins);
        Self {
            state,
            builtins,
            supervisor: Supervisor::new(),
        }
    }

    /// Install the process-wide interrupt guards. Call once, from within
    /// the runtime, before the first command.
    pub fn install_interrupt_guards(&self) -> io::Result<()> {
        self.supervisor.install_interrupt_guards()
    }

    /// The supervisor (job table and event stream).
    pub fn supervisor(&self) -> &Arc<Supervisor> {
        &self.supervisor
    }

    /// The shell's working directory.
    pub fn cwd(&self) -> &Path {
        &self.state.cwd
    }

    /// Evaluate one input line.
    ///
    /// Lex and parse errors are returned as `Err` and reported by the
    /// caller; everything downstream (spawn failures, redirect failures,
    /// builtin errors) is carried in the results so the loop survives it.
    pub async fn eval_line(&mut self, line: &str) -> Result<LineOutcome> {
        let line = expand_env_vars(line);
        let tokens = tokenize(&line)?;
        let specs = Parser::new(tokens).parse()?;

        let mut results = Vec::new();
        for invocation in ast::group(specs) {
            match self.dispatch(&invocation).await {
                Some(result) => results.push(result),
                None => return Ok(LineOutcome::Exit),
            }
        }
        Ok(LineOutcome::Continue(results))
    }

    /// Route one invocation. Returns None when `exit` was requested.
    async fn dispatch(&mut self, invocation: &Invocation) -> Option<ExecResult> {
        if invocation.stages.len() == 1 {
            let spec = &invocation.stages[0];
            if spec.name == "exit" {
                // Any argument is discarded; the interpreter exits 0.
                return None;
            }
            if let Some(builtin) = self.builtins.get(&spec.name) {
                return Some(builtin.execute(&spec.argv, &mut self.state).await);
            }
            Some(run_command(spec, invocation.background, &self.state, &self.supervisor).await)
        } else {
            Some(
                run_pipeline(
                    &invocation.stages,
                    invocation.background,
                    &self.state,
                    &self.supervisor,
                )
                .await,
            )
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}
