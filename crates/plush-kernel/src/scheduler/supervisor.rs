//! The supervisor — single owner of every "collect terminated child" call.
//!
//! Foreground waits, background collection, and detached reaping all go
//! through here, so a child is awaited exactly once through its own handle
//! and a foreground completion can never be stolen by a background drain.
//! The watchdog is a per-record deadline raced against the wait, not a
//! process-wide alarm slot.

use std::io;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Child;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::broadcast;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use super::job::{JobRecord, JobTable};

/// Fixed watchdog budget for foreground commands. Not configurable per
/// command.
pub const WATCHDOG_TIMEOUT: Duration = Duration::from_secs(60);

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Normal exit with this code.
    Exited(i32),
    /// Terminated by this signal.
    Signaled(i32),
}

impl Disposition {
    /// Reconstruct the disposition from an OS wait status.
    pub fn from_status(status: ExitStatus) -> Self {
        use std::os::unix::process::ExitStatusExt;

        match status.code() {
            Some(code) => Disposition::Exited(code),
            None => Disposition::Signaled(status.signal().unwrap_or(0)),
        }
    }
}

/// Observable job lifecycle events.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// A background process was spawned.
    Started { pid: u32 },
    /// A supervised process terminated.
    Finished { pid: u32, disposition: Disposition },
    /// The watchdog killed a foreground process.
    WatchdogFired { pid: u32 },
}

/// Supervises all spawned processes.
pub struct Supervisor {
    jobs: JobTable,
    events: broadcast::Sender<JobEvent>,
}

impl Supervisor {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            jobs: JobTable::new(),
            events,
        })
    }

    /// Subscribe to job lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    /// The live job table.
    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    /// Install the interrupt guards: SIGINT, SIGQUIT, and SIGTSTP each
    /// print an informational message and never terminate or suspend the
    /// shell. Children revert these to default dispositions when they
    /// replace their program image, so a foreground child still dies on
    /// interrupt.
    ///
    /// Must be called from within the runtime, once, before any command
    /// executes.
    pub fn install_interrupt_guards(&self) -> io::Result<()> {
        install_guard(
            SignalKind::interrupt(),
            "\nCTRL-C pressed. Type 'exit' to quit shell.",
        )?;
        install_guard(
            SignalKind::quit(),
            "\nCTRL-\\ pressed. Type 'exit' to quit shell.",
        )?;
        install_guard(
            SignalKind::from_raw(nix::sys::signal::Signal::SIGTSTP as i32),
            "\nCTRL-Z pressed. Type 'exit' to quit shell.",
        )?;
        Ok(())
    }

    /// Await one foreground child, racing the watchdog deadline.
    ///
    /// On expiry the child is killed unconditionally, the diagnostic is
    /// printed, and the killed status is observed and returned so the
    /// caller sees an ordinary (signalled) completion.
    pub async fn wait_foreground(
        &self,
        mut child: Child,
        pid: u32,
        command: &str,
        deadline: Instant,
    ) -> io::Result<ExitStatus> {
        self.jobs
            .insert(JobRecord {
                pid,
                command: command.to_string(),
                background: false,
                deadline: Some(deadline),
            })
            .await;

        let waited = tokio::select! {
            status = child.wait() => status,
            _ = sleep_until(deadline) => {
                if let Err(e) = child.start_kill() {
                    warn!(pid, error = %e, "failed to kill timed-out process");
                }
                println!("System call is taking too long. Terminating child process...\n");
                let _ = self.events.send(JobEvent::WatchdogFired { pid });
                child.wait().await
            }
        };

        self.jobs.remove(pid).await;
        if let Ok(status) = &waited {
            let _ = self.events.send(JobEvent::Finished {
                pid,
                disposition: Disposition::from_status(*status),
            });
        }
        waited
    }

    /// Register a background child and collect it asynchronously.
    ///
    /// Each child gets its own collection task, so near-simultaneous
    /// completions are each reported, exactly once.
    pub async fn watch_background(self: &Arc<Self>, mut child: Child, pid: u32, command: String) {
        self.jobs
            .insert(JobRecord {
                pid,
                command,
                background: true,
                deadline: None,
            })
            .await;
        let _ = self.events.send(JobEvent::Started { pid });

        let supervisor = Arc::clone(self);
        tokio::spawn(async move {
            let status = child.wait().await;
            supervisor.jobs.remove(pid).await;
            match status {
                Ok(status) => {
                    let disposition = Disposition::from_status(status);
                    println!("{}", format_finished(pid, disposition));
                    let _ = supervisor.events.send(JobEvent::Finished { pid, disposition });
                }
                Err(e) => warn!(pid, error = %e, "wait for background job failed"),
            }
        });
    }

    /// Collect a child without reporting. Used for stages of an abandoned
    /// pipeline, which terminate on their own once their pipe peers vanish.
    pub fn reap_detached(&self, mut child: Child, pid: u32) {
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!(pid, ?status, "collected abandoned process"),
                Err(e) => warn!(pid, error = %e, "wait for abandoned process failed"),
            }
        });
    }
}

fn install_guard(kind: SignalKind, message: &'static str) -> io::Result<()> {
    let mut stream = signal(kind)?;
    tokio::spawn(async move {
        while stream.recv().await.is_some() {
            println!("{message}");
        }
    });
    Ok(())
}

/// The announcement printed right after a background spawn.
pub fn format_started(pid: u32) -> String {
    format!("[Started background job with PID {pid}]")
}

/// The completion line printed once per background termination.
pub fn format_finished(pid: u32, disposition: Disposition) -> String {
    match disposition {
        Disposition::Exited(code) => {
            format!("[Background job with PID {pid} finished with exit code {code}]")
        }
        Disposition::Signaled(signum) => {
            format!("[Background job with PID {pid} finished due to signal {signum}]")
        }
    }
}
