//! Scheduler module for plush — process launching, pipelines, and job
//! supervision.
//!
//! This module provides:
//! - **Launcher**: Run one non-piped command, foreground or background.
//! - **Pipeline**: Run a chain of commands over real OS pipes.
//! - **Supervisor**: The single owner of all child waits — foreground waits
//!   with the watchdog, background collection and reporting, and the
//!   interrupt guards.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Supervisor                           │
//! │  jobs: JobTable (pid → record, deadline)                     │
//! │  - wait_foreground(child, deadline) → status   (watchdog)    │
//! │  - watch_background(child)          → reported once, async   │
//! │  - reap_detached(child)             → collected silently     │
//! │  - events: broadcast<JobEvent>                               │
//! └──────────────────────────────────────────────────────────────┘
//!
//! ┌─────────┐  pipe   ┌─────────┐  pipe   ┌─────────┐
//! │ stage 0 │────────▶│ stage 1 │────────▶│ stage 2 │
//! │ (spawn) │ stdout  │ (spawn) │ stdout  │ (spawn) │
//! └─────────┘         └─────────┘         └─────────┘
//! ```

mod job;
mod launcher;
mod pipeline;
mod supervisor;

pub use job::{JobRecord, JobTable};
pub use launcher::run_command;
pub use pipeline::run_pipeline;
pub use supervisor::{
    Disposition, JobEvent, Supervisor, WATCHDOG_TIMEOUT, format_finished, format_started,
};
