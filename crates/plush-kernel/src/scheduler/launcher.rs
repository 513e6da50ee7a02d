//! Launching a single, non-piped command.
//!
//! Expands wildcards, opens redirect targets, spawns the child with a
//! PATH-searching exec, and either waits under the watchdog (foreground) or
//! announces the pid and hands the child to the supervisor (background).
//! Every failure here is local: the command is abandoned and the caller's
//! loop continues.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tokio::time::Instant;
use tracing::debug;

use crate::ast::CommandSpec;
use crate::glob::expand_wildcards;
use crate::result::ExecResult;
use crate::state::ShellState;

use super::supervisor::{Supervisor, WATCHDOG_TIMEOUT, format_started};

/// Permission bits for created redirect targets.
const REDIRECT_CREATE_MODE: u32 = 0o644;

/// Open a redirect source for reading.
pub(crate) fn open_input(state: &ShellState, path: &str) -> io::Result<File> {
    File::open(state.resolve_path(path))
}

/// Open a redirect target, truncating or creating it at mode 0644.
pub(crate) fn open_output(state: &ShellState, path: &str) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(REDIRECT_CREATE_MODE)
        .open(state.resolve_path(path))
}

/// Map a spawn error to the conventional shell diagnostics.
pub(crate) fn spawn_failure(program: &str, error: &io::Error) -> ExecResult {
    if error.kind() == io::ErrorKind::NotFound {
        ExecResult::failure(127, format!("{program}: command not found"))
    } else {
        ExecResult::failure(126, format!("{program}: {error}"))
    }
}

/// Execute one command descriptor with no pipeline successor.
pub async fn run_command(
    spec: &CommandSpec,
    background: bool,
    state: &ShellState,
    supervisor: &Arc<Supervisor>,
) -> ExecResult {
    let argv = expand_wildcards(&spec.argv, &state.cwd, state.home.as_deref());
    let Some(program) = argv.first() else {
        return ExecResult::success("");
    };

    let mut cmd = Command::new(program);
    cmd.args(&argv[1..]).current_dir(&state.cwd);

    if let Some(path) = &spec.redirect_in {
        match open_input(state, path) {
            Ok(file) => {
                cmd.stdin(Stdio::from(file));
            }
            Err(e) => return ExecResult::failure(1, format!("{path}: {e}")),
        }
    }
    if let Some(path) = &spec.redirect_out {
        match open_output(state, path) {
            Ok(file) => {
                cmd.stdout(Stdio::from(file));
            }
            Err(e) => return ExecResult::failure(1, format!("{path}: {e}")),
        }
    }
    if let Some(path) = &spec.redirect_err {
        match open_output(state, path) {
            Ok(file) => {
                cmd.stderr(Stdio::from(file));
            }
            Err(e) => return ExecResult::failure(1, format!("{path}: {e}")),
        }
    }

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return spawn_failure(program, &e),
    };
    let pid = child.id().unwrap_or_default();
    debug!(pid, program = %program, background, "spawned");

    if background {
        println!("{}", format_started(pid));
        supervisor
            .watch_background(child, pid, spec.name.clone())
            .await;
        ExecResult::success("")
    } else {
        let deadline = Instant::now() + WATCHDOG_TIMEOUT;
        match supervisor
            .wait_foreground(child, pid, &spec.name, deadline)
            .await
        {
            Ok(status) => ExecResult::from_status(status),
            Err(e) => ExecResult::failure(1, format!("{program}: wait: {e}")),
        }
    }
}
