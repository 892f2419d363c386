// src/cli/handlers/doctor.rs

use crate::{
    cli::handlers::commons,
    core::validator::{self, ValidationResult},
};
use anyhow::{Result, anyhow};
use colored::*;

/// Validates the configuration without running anything.
/// Fails with the number of issues so the exit code reflects the outcome.
pub fn handle() -> Result<()> {
    let config = commons::read_config()?;
    let result = validator::validate(&config);
    log::debug!(
        "Checked configuration at {}.",
        config.config_file_path.display()
    );

    print!("{}", render(&result));
    if result.is_ok() {
        Ok(())
    } else {
        Err(anyhow!("doctor found {} issue(s)", result.len()))
    }
}

pub fn render(result: &ValidationResult) -> String {
    if result.is_ok() {
        return format!("{} no issues found\n", "✅".green());
    }
    result
        .issues()
        .iter()
        .map(|issue| format!("{}  {}\n", "⚠️".yellow(), issue))
        .collect()
}
