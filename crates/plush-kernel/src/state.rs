//! Shell state owned by the kernel.
//!
//! The interpreter never calls `chdir`; the working directory lives here and
//! flows to children via `Command::current_dir`, to redirect opens, and to
//! relative glob walks. The previous working directory backs `cd -` and is
//! written on every attempted `cd`, successful or not.

use std::io;
use std::path::{Path, PathBuf};

/// Mutable shell state. Touched only by the control loop.
#[derive(Debug, Clone)]
pub struct ShellState {
    /// Current working directory (always canonical).
    pub cwd: PathBuf,
    /// Working directory before the most recent `cd` attempt.
    pub prev_cwd: Option<PathBuf>,
    /// Home directory, if known.
    pub home: Option<PathBuf>,
}

impl ShellState {
    /// Capture the process's working directory and environment.
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        Self {
            cwd,
            prev_cwd: None,
            home: crate::paths::home_dir(),
        }
    }

    /// State rooted at an explicit directory (tests, script mode).
    pub fn with_cwd(cwd: PathBuf) -> Self {
        Self {
            cwd,
            prev_cwd: None,
            home: crate::paths::home_dir(),
        }
    }

    /// Resolve a path argument against the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Change the working directory, verifying the target is a directory.
    ///
    /// Does not touch `prev_cwd`; recording the prior directory is the
    /// caller's job because it must happen even when this fails.
    pub fn set_cwd_checked(&mut self, target: &Path) -> io::Result<()> {
        let canonical = std::fs::canonicalize(target)?;
        if !canonical.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                "Not a directory",
            ));
        }
        self.cwd = canonical;
        Ok(())
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}
