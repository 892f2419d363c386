// src/cli/handlers/version.rs

use crate::version::VERSION;
use anyhow::Result;

pub fn handle() -> Result<()> {
    println!("sidetable {}", VERSION);
    Ok(())
}
