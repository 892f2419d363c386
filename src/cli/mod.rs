// src/cli/mod.rs

use crate::{
    core::{
        config::ConfigError,
        workspace::{RunError, Workspace, WorkspaceError},
    },
    system::executor::ExecutionError,
};
use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;

pub mod handlers;

/// sidetable: run your own tools against a private, per-project directory.
#[derive(Parser, Debug)]
#[command(
    name = "sidetable",
    version = crate::version::VERSION,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List the tools and aliases defined in the configuration
    List,
    /// Check the configuration and report every issue found
    Doctor,
    /// Create the default configuration file
    Init,
    /// Print version information
    Version,
    /// Generate a shell completion script
    #[command(long_about = "
Generates a completion script for the built-in commands.

Examples:
  sidetable completion bash > ~/.local/share/bash-completion/completions/sidetable
  sidetable completion zsh > ~/.zfunc/_sidetable
  sidetable completion fish > ~/.config/fish/completions/sidetable.fish
")]
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Run a configured tool or alias: `sidetable <name> [args...]`
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

/// Builds the clap command, listing the workspace's tools after the help text.
///
/// A workspace that failed to open only replaces the listing with a hint;
/// the built-in commands stay available.
pub fn build_command(workspace: &Result<Workspace, WorkspaceError>) -> clap::Command {
    Cli::command().after_help(tools_help(workspace))
}

fn tools_help(workspace: &Result<Workspace, WorkspaceError>) -> String {
    match workspace {
        Ok(workspace) => {
            let catalog = workspace.catalog();
            if catalog.is_empty() {
                return "No tools configured.".to_string();
            }
            format!("Tools:\n{}", handlers::commons::render_entries(catalog.valid()))
        }
        Err(WorkspaceError::Config(ConfigError::Missing { path })) => format!(
            "No configuration found at {}.\nRun `sidetable init` to create one.",
            path.display()
        ),
        Err(e) => {
            log::debug!("Tools unavailable for help: {}", e);
            "Error occurred while loading user-defined tools. Run `sidetable doctor` to diagnose the problem."
                .to_string()
        }
    }
}

/// Finds the execution failure behind `error`, if the error came from running a child.
pub fn execution_error(error: &anyhow::Error) -> Option<&ExecutionError> {
    if let Some(e) = error.downcast_ref::<ExecutionError>() {
        return Some(e);
    }
    match error.downcast_ref::<RunError>() {
        Some(RunError::Execution(e)) => Some(e),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{builtin, config};
    use std::path::{Path, PathBuf};

    fn workspace() -> Workspace {
        let config = config::parse(
            r#"
directory: .sidetable
tools:
  notes:
    run: ls
    description: Private notes
aliases:
  n:
    tool: notes
"#,
            Path::new("/cfg/config.yml"),
        )
        .unwrap();
        Workspace::from_config(PathBuf::from("/work/project"), config)
    }

    #[test]
    fn test_command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_builtin_subcommand_is_reserved() {
        for sub in Cli::command().get_subcommands() {
            assert!(
                builtin::is_reserved_name(sub.get_name()),
                "'{}' is not reserved",
                sub.get_name()
            );
        }
        assert!(builtin::is_reserved_name("help"));
    }

    #[test]
    fn test_unknown_name_is_external_with_verbatim_args() {
        let cli = Cli::try_parse_from(["sidetable", "notes", "--version", "-x", "a b"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::External(vec![
                OsString::from("notes"),
                OsString::from("--version"),
                OsString::from("-x"),
                OsString::from("a b"),
            ]))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_external_args_need_not_be_utf8() {
        use std::os::unix::ffi::OsStrExt;

        let raw = std::ffi::OsStr::from_bytes(b"file\xff.txt").to_os_string();
        let cli = Cli::try_parse_from([OsString::from("sidetable"), OsString::from("e"), raw.clone()])
            .unwrap();
        assert_eq!(cli.command, Some(Commands::External(vec![OsString::from("e"), raw])));
    }

    #[test]
    fn test_builtins_parse() {
        let cli = Cli::try_parse_from(["sidetable", "list"]).unwrap();
        assert_eq!(cli.command, Some(Commands::List));
        let cli = Cli::try_parse_from(["sidetable", "completion", "bash"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Completion {
                shell: clap_complete::Shell::Bash
            })
        );
        let cli = Cli::try_parse_from(["sidetable"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_help_lists_tools_and_aliases() {
        let mut cmd = build_command(&Ok(workspace()));
        let help = cmd.render_long_help().to_string();
        assert!(help.contains("notes"), "help was: {}", help);
        assert!(help.contains("Private notes"));
        assert!(help.contains("n -> notes"));
    }

    #[test]
    fn test_help_hints_at_init_when_config_is_missing() {
        let missing: Result<Workspace, WorkspaceError> =
            Err(WorkspaceError::Config(ConfigError::Missing {
                path: PathBuf::from("/cfg/config.yml"),
            }));
        let help = build_command(&missing).render_long_help().to_string();
        assert!(help.contains("sidetable init"));
        assert!(help.contains("list"));
    }

    #[test]
    fn test_execution_error_is_found_through_run_error() {
        let err = anyhow::Error::from(RunError::Execution(ExecutionError::Exit {
            program: "sh".to_string(),
            code: 42,
        }));
        assert_eq!(execution_error(&err).and_then(|e| e.exit_code()), Some(42));

        let other = anyhow::anyhow!("boom");
        assert!(execution_error(&other).is_none());
    }
}
