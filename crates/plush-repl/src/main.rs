//! plush CLI entry point.
//!
//! Usage:
//!   plush                      # Interactive REPL
//!   plush -c <command>         # Execute one command line and exit
//!   plush script.sh            # Run a script line by line

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => {
            plush_repl::run()?;
            Ok(ExitCode::SUCCESS)
        }

        Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("plush {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some("-c") => {
            let cmd = args.get(2).context("-c requires a command argument")?;
            let code = plush_repl::run_command_line(cmd)?;
            Ok(exit_code(code))
        }

        Some(path) if !path.starts_with('-') => {
            let code = plush_repl::run_script(path)?;
            Ok(exit_code(code))
        }

        Some(unknown) => {
            eprintln!("Unknown option: {unknown}");
            eprintln!("Run 'plush --help' for usage.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}

fn print_help() {
    println!(
        r#"plush v{}

Usage:
  plush                        Interactive REPL
  plush -c <command>           Execute one command line and exit
  plush <script>               Run a script file

Options:
  -c <command>                 Execute command string and exit
  -h, --help                   Show this help
  -V, --version                Show version

Inside the shell:
  cmd args...                  Run an external command (PATH search)
  a | b | c                    Pipeline (connects stdout → stdin)
  cmd &                        Run in the background
  cmd < in > out 2> err        Redirect standard streams
  a ; b                        Run sequentially
  cd [dir | - | ~ | ~/sub]     Change directory
  pwd                          Print working directory
  prompt <text>                Change the prompt
  history, !<n>, !<prefix>     List and recall history
  exit                         Quit (always status 0)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
