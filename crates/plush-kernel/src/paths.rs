//! Path helpers.

use std::path::PathBuf;

/// The user's home directory, from `$HOME`.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_dir_follows_env() {
        // HOME is set in any sane test environment.
        if let Some(home) = home_dir() {
            assert!(home.is_absolute());
        }
    }
}
