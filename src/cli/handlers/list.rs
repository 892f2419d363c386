// src/cli/handlers/list.rs

use crate::{
    cli::handlers::commons,
    core::{catalog::Catalog, validator},
};
use anyhow::Result;
use colored::*;

/// Prints every tool and alias. Entries invalidated by the configuration are
/// listed separately with the reason instead of failing the command.
pub fn handle() -> Result<()> {
    let root = commons::workspace_root()?;
    let config = commons::read_config()?;
    let validation = validator::validate(&config);
    let catalog = Catalog::build(&config, &root, &validation);

    print!("{}", render(&catalog));
    Ok(())
}

/// Renders the listing. Plain text; headers are the only styled part.
pub fn render(catalog: &Catalog) -> String {
    let mut output = String::new();

    if catalog.valid().next().is_none() {
        output.push_str("No tools configured.\n");
    } else {
        output.push_str(&format!("{}\n", "Tools:".bold()));
        output.push_str(&commons::render_entries(catalog.valid()));
    }

    let invalid: Vec<Vec<String>> = catalog
        .invalid()
        .map(|entry| {
            vec![
                commons::entry_label(entry),
                entry.kind.to_string(),
                entry.invalid_reason.clone().unwrap_or_default(),
            ]
        })
        .collect();
    if !invalid.is_empty() {
        output.push_str(&format!("\n{}\n", "Invalid entries:".yellow().bold()));
        for line in commons::format_columns(&invalid) {
            output.push_str(&format!("  {}\n", line));
        }
    }

    output
}
