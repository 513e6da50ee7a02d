//! Executing a pipeline of two or more commands over real OS pipes.
//!
//! Stages are spawned in left-to-right order. Each inter-stage pipe is
//! created when its writer is spawned, and its read end is moved into the
//! next stage's standard input. All pipe descriptors are close-on-exec, so
//! a child only ever holds the endpoints explicitly wired to it, and the
//! parent's copy of each end is dropped as soon as the downstream stage is
//! spawned — a reader sees EOF exactly when its writer exits.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, ChildStdout, Command};
use tokio::time::Instant;
use tracing::debug;

use crate::ast::CommandSpec;
use crate::glob::expand_wildcards;
use crate::result::ExecResult;
use crate::state::ShellState;

use super::launcher::{open_input, open_output, spawn_failure};
use super::supervisor::{Supervisor, WATCHDOG_TIMEOUT, format_started};

/// Execute a contiguous pipeline run.
///
/// A failure while wiring or spawning abandons the whole pipeline: the
/// diagnostic is returned, stages already running are handed to the
/// supervisor for silent collection, and the caller's loop continues.
pub async fn run_pipeline(
    stages: &[CommandSpec],
    background: bool,
    state: &ShellState,
    supervisor: &Arc<Supervisor>,
) -> ExecResult {
    debug_assert!(stages.len() >= 2, "single commands go through the launcher");

    let last = stages.len() - 1;
    let mut children: Vec<(u32, Child, String)> = Vec::with_capacity(stages.len());
    let mut upstream: Option<ChildStdout> = None;

    for (i, spec) in stages.iter().enumerate() {
        let argv = expand_wildcards(&spec.argv, &state.cwd, state.home.as_deref());
        let Some(program) = argv.first().cloned() else {
            abandon(children, supervisor);
            return ExecResult::failure(1, "empty pipeline stage");
        };

        let mut cmd = Command::new(&program);
        cmd.args(&argv[1..]).current_dir(&state.cwd);

        // Standard input: the upstream pipe, or stage 0's file redirect.
        if let Some(stdout) = upstream.take() {
            match stdout.into_owned_fd() {
                Ok(fd) => {
                    cmd.stdin(Stdio::from(fd));
                }
                Err(e) => {
                    abandon(children, supervisor);
                    return ExecResult::failure(1, format!("{program}: pipe: {e}"));
                }
            }
        } else if i == 0 {
            if let Some(path) = &spec.redirect_in {
                match open_input(state, path) {
                    Ok(file) => {
                        cmd.stdin(Stdio::from(file));
                    }
                    Err(e) => {
                        abandon(children, supervisor);
                        return ExecResult::failure(1, format!("{path}: {e}"));
                    }
                }
            }
        }

        // Standard output: the downstream pipe, or the final stage's
        // redirect. Intermediate redirects cannot override the pipe.
        if i < last {
            cmd.stdout(Stdio::piped());
        } else if let Some(path) = &spec.redirect_out {
            match open_output(state, path) {
                Ok(file) => {
                    cmd.stdout(Stdio::from(file));
                }
                Err(e) => {
                    abandon(children, supervisor);
                    return ExecResult::failure(1, format!("{path}: {e}"));
                }
            }
        }

        // Standard error is never piped; a redirect applies to any stage.
        if let Some(path) = &spec.redirect_err {
            match open_output(state, path) {
                Ok(file) => {
                    cmd.stderr(Stdio::from(file));
                }
                Err(e) => {
                    abandon(children, supervisor);
                    return ExecResult::failure(1, format!("{path}: {e}"));
                }
            }
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                let failure = spawn_failure(&program, &e);
                abandon(children, supervisor);
                return failure;
            }
        };
        if i < last {
            upstream = child.stdout.take();
        }
        let pid = child.id().unwrap_or_default();
        debug!(pid, program = %program, stage = i, "spawned pipeline stage");
        children.push((pid, child, spec.name.clone()));
    }

    if background {
        for (pid, child, name) in children {
            println!("{}", format_started(pid));
            supervisor.watch_background(child, pid, name).await;
        }
        ExecResult::success("")
    } else {
        // One absolute deadline covers every stage; waiting in spawn order
        // does not extend any stage's budget.
        let deadline = Instant::now() + WATCHDOG_TIMEOUT;
        let mut result = ExecResult::success("");
        for (pid, child, name) in children {
            result = match supervisor.wait_foreground(child, pid, &name, deadline).await {
                Ok(status) => ExecResult::from_status(status),
                Err(e) => ExecResult::failure(1, format!("{name}: wait: {e}")),
            };
        }
        result
    }
}

fn abandon(children: Vec<(u32, Child, String)>, supervisor: &Arc<Supervisor>) {
    for (pid, child, _) in children {
        supervisor.reap_detached(child, pid);
    }
}
