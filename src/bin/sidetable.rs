// src/bin/sidetable.rs

use anyhow::Result;
use clap::{FromArgMatches, error::ErrorKind};
use colored::*;
use sidetable::{
    CancellationToken,
    cli::{self, Cli, Commands, handlers},
    constants::INTERRUPTED_EXIT_CODE,
    core::workspace::{Workspace, WorkspaceError},
    system::executor::ExecutionError,
};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Sets up logging, runs the CLI and maps the outcome onto a process exit code.
fn main() {
    // Nothing installs a Ctrl+C handler: the terminal delivers SIGINT to the
    // child directly. The token is for embedders and future use.
    let cancellation_token = Arc::new(AtomicBool::new(false));
    env_logger::init();

    if let Err(e) = run_cli(&cancellation_token) {
        // --- Centralized Error Handling ---
        match cli::execution_error(&e) {
            // The child already reported its own failure; mirror its code.
            Some(ExecutionError::Exit { code, .. }) => std::process::exit(*code),
            Some(ExecutionError::Cancelled) => std::process::exit(INTERRUPTED_EXIT_CODE),
            _ => {}
        }

        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Loads the workspace first so that `--help` can list the configured tools,
/// then dispatches to the built-in handler or the tool runner.
fn run_cli(cancellation_token: &CancellationToken) -> Result<()> {
    let workspace = open_workspace();
    let mut command = cli::build_command(&workspace);
    let cli = match command
        .clone()
        .try_get_matches()
        .and_then(|matches| Cli::from_arg_matches(&matches))
    {
        Ok(cli) => cli,
        Err(e) => exit_with_usage(e),
    };
    log::debug!("CLI args parsed: {:?}", cli);

    match cli.command {
        None => {
            command.print_help()?;
            Ok(())
        }
        Some(Commands::List) => handlers::list::handle(),
        Some(Commands::Doctor) => handlers::doctor::handle(),
        Some(Commands::Init) => handlers::init::handle(),
        Some(Commands::Version) => handlers::version::handle(),
        Some(Commands::Completion { shell }) => handlers::completion::handle(shell, &mut command),
        Some(Commands::External(args)) => handlers::run::handle(workspace, args, cancellation_token),
    }
}

/// `--help` and `--version` keep clap's success exit. Every usage error exits
/// with 1 like any other failure.
fn exit_with_usage(e: clap::Error) -> ! {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
        _ => {
            if let Err(print_error) = e.print() {
                log::debug!("Failed to print usage error: {}", print_error);
            }
            std::process::exit(1);
        }
    }
}

fn open_workspace() -> Result<Workspace, WorkspaceError> {
    let root = match handlers::commons::workspace_root() {
        Ok(root) => root,
        Err(e) => {
            log::debug!("{:#}", e);
            // An unusable working directory surfaces again from `Workspace::open`.
            std::env::current_dir().unwrap_or_default()
        }
    };
    let workspace = Workspace::open(&root, None);
    if let Err(e) = &workspace {
        log::debug!("Workspace unavailable: {}", e);
    }
    workspace
}
