//! cd — Change the shell's working directory.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::builtins::Builtin;
use crate::result::ExecResult;
use crate::state::ShellState;

/// Cd builtin.
///
/// Resolution order: no argument or `~` is the home directory; `-` is the
/// previous working directory; `~/rest` is home-relative; anything else is
/// taken literally, relative to the working directory. The directory in
/// effect before the attempt becomes the new previous directory whether or
/// not the change succeeds.
pub struct Cd;

#[async_trait]
impl Builtin for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    async fn execute(&self, argv: &[String], state: &mut ShellState) -> ExecResult {
        let prior = state.cwd.clone();
        let result = change_dir(argv.get(1).map(String::as_str), state);
        state.prev_cwd = Some(prior);
        result
    }
}

fn change_dir(arg: Option<&str>, state: &mut ShellState) -> ExecResult {
    let target: PathBuf = match arg {
        None | Some("~") => match &state.home {
            Some(home) => home.clone(),
            None => return ExecResult::failure(1, "cd: HOME not set"),
        },
        Some("-") => match &state.prev_cwd {
            Some(prev) => prev.clone(),
            None => return ExecResult::failure(1, "cd: OLDPWD not set"),
        },
        Some(path) => {
            if let Some(rest) = path.strip_prefix("~/") {
                match &state.home {
                    Some(home) => home.join(rest),
                    None => return ExecResult::failure(1, "cd: HOME not set"),
                }
            } else {
                state.resolve_path(path)
            }
        }
    };

    match state.set_cwd_checked(&target) {
        Ok(()) => ExecResult::success(""),
        Err(e) => ExecResult::failure(1, format!("cd: {}: {}", target.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::Builtin;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("cd")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    fn state_in(dir: &std::path::Path) -> ShellState {
        let mut state = ShellState::with_cwd(dir.to_path_buf());
        state.cwd = std::fs::canonicalize(dir).unwrap();
        state
    }

    #[tokio::test]
    async fn cd_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut state = state_in(dir.path());

        let result = Cd.execute(&argv(&["sub"]), &mut state).await;
        assert!(result.ok(), "{}", result.err);
        assert!(state.cwd.ends_with("sub"));
    }

    #[tokio::test]
    async fn cd_dash_without_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let before = state.cwd.clone();

        let result = Cd.execute(&argv(&["-"]), &mut state).await;
        assert!(!result.ok());
        assert_eq!(result.err, "cd: OLDPWD not set");
        assert_eq!(state.cwd, before);
        // Even the failed attempt records the prior directory.
        assert_eq!(state.prev_cwd.as_deref(), Some(before.as_path()));
    }

    #[tokio::test]
    async fn cd_dash_toggles() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let mut state = state_in(dir.path());
        let start = state.cwd.clone();

        Cd.execute(&argv(&["sub"]), &mut state).await;
        let sub = state.cwd.clone();

        let result = Cd.execute(&argv(&["-"]), &mut state).await;
        assert!(result.ok());
        assert_eq!(state.cwd, start);

        let result = Cd.execute(&argv(&["-"]), &mut state).await;
        assert!(result.ok());
        assert_eq!(state.cwd, sub);
    }

    #[tokio::test]
    async fn cd_home_variants() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir(home.path().join("sub")).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let mut state = state_in(dir.path());
        state.home = Some(home.path().to_path_buf());

        let result = Cd.execute(&argv(&[]), &mut state).await;
        assert!(result.ok(), "{}", result.err);
        assert_eq!(state.cwd, std::fs::canonicalize(home.path()).unwrap());

        let mut state = state_in(dir.path());
        state.home = Some(home.path().to_path_buf());
        let result = Cd.execute(&argv(&["~/sub"]), &mut state).await;
        assert!(result.ok(), "{}", result.err);
        assert!(state.cwd.ends_with("sub"));
    }

    #[tokio::test]
    async fn cd_nonexistent_fails_but_records_prior() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        let before = state.cwd.clone();

        let result = Cd.execute(&argv(&["no-such-dir"]), &mut state).await;
        assert!(!result.ok());
        assert!(result.err.starts_with("cd: "));
        assert_eq!(state.cwd, before);
        assert_eq!(state.prev_cwd.as_deref(), Some(before.as_path()));
    }

    #[tokio::test]
    async fn cd_no_home_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_in(dir.path());
        state.home = None;

        let result = Cd.execute(&argv(&[]), &mut state).await;
        assert_eq!(result.err, "cd: HOME not set");
    }
}
