//! Command descriptors and invocation grouping.
//!
//! The parser produces a flat sequence of [`CommandSpec`]s, one per simple
//! command on the line. Descriptors linked by `pipe_to_next` form a
//! contiguous pipeline run; [`group`] slices a sequence into the
//! [`Invocation`]s the dispatcher executes in order.

/// One parsed command: program name, arguments, redirections, and its links
/// to the rest of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path (`argv[0]`).
    pub name: String,
    /// Full argument vector, including `argv[0]`.
    pub argv: Vec<String>,
    /// Redirect standard input from this file.
    pub redirect_in: Option<String>,
    /// Redirect standard output to this file (truncate or create).
    pub redirect_out: Option<String>,
    /// Redirect standard error to this file (truncate or create).
    pub redirect_err: Option<String>,
    /// This command was followed by `&`.
    pub background: bool,
    /// This command pipes its output into the next descriptor.
    pub pipe_to_next: bool,
}

impl CommandSpec {
    /// Create a descriptor from an argument vector.
    pub fn new(argv: Vec<String>) -> Self {
        let name = argv.first().cloned().unwrap_or_default();
        Self {
            name,
            argv,
            redirect_in: None,
            redirect_out: None,
            redirect_err: None,
            background: false,
            pipe_to_next: false,
        }
    }
}

/// One dispatch unit: a contiguous pipeline run (length 1 for a plain
/// command) and whether the shell waits for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Pipeline stages in left-to-right order. Never empty.
    pub stages: Vec<CommandSpec>,
    /// Run without blocking the control loop.
    pub background: bool,
}

/// Slice a descriptor sequence into invocations.
///
/// Pipeline links are contiguous: a run extends while `pipe_to_next` is set
/// and ends at the first descriptor without it. The background flag is taken
/// from the run's final stage, where the `&` appears syntactically.
pub fn group(specs: Vec<CommandSpec>) -> Vec<Invocation> {
    let mut invocations = Vec::new();
    let mut stages: Vec<CommandSpec> = Vec::new();

    for spec in specs {
        let ends_run = !spec.pipe_to_next;
        stages.push(spec);
        if ends_run {
            let background = stages.last().map(|s| s.background).unwrap_or(false);
            invocations.push(Invocation {
                stages: std::mem::take(&mut stages),
                background,
            });
        }
    }

    // A trailing linked run can only arise from a parser bug; the parser
    // rejects dangling pipes. Flush it as a foreground run if it happens.
    if !stages.is_empty() {
        invocations.push(Invocation {
            stages,
            background: false,
        });
    }

    invocations
}
