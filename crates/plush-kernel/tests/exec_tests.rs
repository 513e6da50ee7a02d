//! Tests for single-command execution: spawning, redirection, builtins, and
//! failure containment. These run real processes.

use std::path::Path;

use plush_kernel::state::ShellState;
use plush_kernel::{ExecResult, Kernel, LineOutcome};

fn kernel_in(dir: &Path) -> Kernel {
    let cwd = std::fs::canonicalize(dir).unwrap();
    Kernel::with_state(ShellState::with_cwd(cwd))
}

async fn eval(kernel: &mut Kernel, line: &str) -> Vec<ExecResult> {
    match kernel.eval_line(line).await.unwrap() {
        LineOutcome::Continue(results) => results,
        LineOutcome::Exit => panic!("unexpected exit"),
    }
}

// ============================================================================
// Spawning
// ============================================================================

#[tokio::test]
async fn external_command_runs() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());
    let results = eval(&mut kernel, "true").await;
    assert_eq!(results.len(), 1);
    assert!(results[0].ok());
}

#[tokio::test]
async fn failing_command_reports_its_code() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());
    let results = eval(&mut kernel, "false").await;
    assert_eq!(results[0].code, 1);
}

#[tokio::test]
async fn unknown_command_is_local_failure() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());

    let results = eval(&mut kernel, "definitely_not_a_real_command_12345").await;
    assert_eq!(results[0].code, 127);
    assert!(results[0].err.contains("command not found"), "{}", results[0].err);

    // The loop survives.
    let results = eval(&mut kernel, "true").await;
    assert!(results[0].ok());
}

// ============================================================================
// Redirection
// ============================================================================

#[tokio::test]
async fn stdout_redirect_truncates_and_creates() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());

    eval(&mut kernel, "echo hello > out.txt").await;
    let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert_eq!(out, "hello\n");

    // Re-running truncates.
    eval(&mut kernel, "echo shorter > out.txt").await;
    let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert_eq!(out, "shorter\n");
}

#[tokio::test]
async fn created_redirect_target_is_mode_644() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());

    eval(&mut kernel, "echo x > perm.txt").await;
    let mode = std::fs::metadata(dir.path().join("perm.txt"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o644);
}

#[tokio::test]
async fn stdin_redirect_feeds_the_child() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("in.txt"), "from a file\n").unwrap();
    let mut kernel = kernel_in(dir.path());

    eval(&mut kernel, "cat < in.txt > copy.txt").await;
    let copy = std::fs::read_to_string(dir.path().join("copy.txt")).unwrap();
    assert_eq!(copy, "from a file\n");
}

#[tokio::test]
async fn stderr_redirect_captures_error_text() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());

    let results = eval(&mut kernel, "ls /no/such/dir 2> err.txt").await;
    assert!(!results[0].ok());

    let err = std::fs::read_to_string(dir.path().join("err.txt")).unwrap();
    assert!(!err.is_empty());

    // Interpreter continues.
    let results = eval(&mut kernel, "true").await;
    assert!(results[0].ok());
}

#[tokio::test]
async fn unreadable_redirect_source_abandons_the_command() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());

    let results = eval(&mut kernel, "cat < missing.txt > out.txt").await;
    assert!(!results[0].ok());
    assert!(results[0].err.contains("missing.txt"));
    // The output target is not created when the input open fails first.
    assert!(!dir.path().join("out.txt").exists());
}

// ============================================================================
// Wildcards
// ============================================================================

#[tokio::test]
async fn wildcards_expand_before_spawn() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "").unwrap();
    std::fs::write(dir.path().join("b.txt"), "").unwrap();
    std::fs::write(dir.path().join("c.log"), "").unwrap();
    let mut kernel = kernel_in(dir.path());

    eval(&mut kernel, "ls *.txt > listed.txt").await;
    let listed = std::fs::read_to_string(dir.path().join("listed.txt")).unwrap();
    assert_eq!(listed, "a.txt\nb.txt\n");
}

#[tokio::test]
async fn non_matching_pattern_passes_through_literally() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());

    eval(&mut kernel, "echo *.zzz > out.txt").await;
    let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
    assert_eq!(out, "*.zzz\n");
}

// ============================================================================
// Builtins through the dispatcher
// ============================================================================

#[tokio::test]
async fn cd_dash_first_reports_oldpwd() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());
    let before = kernel.cwd().to_path_buf();

    let results = eval(&mut kernel, "cd -").await;
    assert_eq!(results[0].err, "cd: OLDPWD not set");
    assert_eq!(kernel.cwd(), before);
}

#[tokio::test]
async fn cd_changes_where_children_run() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let mut kernel = kernel_in(dir.path());

    eval(&mut kernel, "cd sub").await;
    eval(&mut kernel, "touch made-here").await;
    assert!(dir.path().join("sub").join("made-here").exists());
}

#[tokio::test]
async fn exit_wins_over_path_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let mut kernel = kernel_in(dir.path());
    assert_eq!(
        kernel.eval_line("exit 42").await.unwrap(),
        LineOutcome::Exit
    );
}
