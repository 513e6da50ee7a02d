//! plush-kernel: the core of the plush shell.
//!
//! This crate provides:
//!
//! - **Lexer**: Tokenizes a command line using logos
//! - **Parser**: Builds command descriptors from tokens
//! - **Expand**: `$VAR` environment expansion and tilde handling
//! - **Glob**: Argument-level wildcard expansion
//! - **Builtins**: `cd` and `pwd`, dispatched before any process is spawned
//! - **Scheduler**: Launching commands and pipelines, background job
//!   collection, and the foreground watchdog
//! - **Kernel**: Ties state, builtins, and the scheduler together behind a
//!   single `eval_line` entry point

pub mod ast;
pub mod builtins;
pub mod expand;
pub mod glob;
pub mod kernel;
pub mod lexer;
pub mod parser;
pub mod paths;
pub mod result;
pub mod scheduler;
pub mod state;

pub use kernel::{Kernel, LineOutcome};
pub use result::ExecResult;

// Job observability (for embedders and tests watching background work)
pub use scheduler::{Disposition, JobEvent, Supervisor, WATCHDOG_TIMEOUT};
