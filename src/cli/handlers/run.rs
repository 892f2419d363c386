// src/cli/handlers/run.rs

use crate::{
    CancellationToken,
    core::workspace::{Workspace, WorkspaceError},
    system::executor::Streams,
};
use anyhow::{Result, anyhow};
use std::ffi::OsString;

/// Runs `sidetable <name> [args...]`.
///
/// `args` is the raw external subcommand: the entry name followed by the
/// arguments to forward verbatim. The child's streams are the caller's own.
pub fn handle(
    workspace: Result<Workspace, WorkspaceError>,
    args: Vec<OsString>,
    cancellation_token: &CancellationToken,
) -> Result<()> {
    let (name, user_args) = args
        .split_first()
        .ok_or_else(|| anyhow!("No tool name given."))?;
    // Names are configuration keys, so a non-UTF-8 name can only miss.
    let name = name.to_string_lossy();
    let workspace = workspace?;

    log::debug!("Running '{}' with {} user argument(s).", name, user_args.len());
    workspace.run(&name, user_args, Streams::inherit(), cancellation_token)?;
    Ok(())
}
