// src/cli/handlers/completion.rs

use anyhow::Result;
use clap_complete::Shell;
use std::io::{self, Write};

/// Prints a completion script for `shell` to stdout.
pub fn handle(shell: Shell, command: &mut clap::Command) -> Result<()> {
    write_completion(shell, command, &mut io::stdout())
}

pub fn write_completion<W: Write>(shell: Shell, command: &mut clap::Command, out: &mut W) -> Result<()> {
    let name = command.get_name().to_string();
    clap_complete::generate(shell, command, name, out);
    Ok(())
}
