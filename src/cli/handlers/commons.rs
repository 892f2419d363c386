// src/cli/handlers/commons.rs

// Shared helpers for the built-in command handlers.

use crate::{
    core::{
        catalog::{CatalogEntry, EntryKind},
        config,
    },
    models::Config,
};
use anyhow::{Context, Result};
use dialoguer::console::measure_text_width;
use std::env;
use std::path::PathBuf;

/// Spaces between two columns.
const COLUMN_GAP: usize = 2;

/// The project sidetable was invoked from: the canonical current directory.
pub fn workspace_root() -> Result<PathBuf> {
    let cwd = env::current_dir().context("Could not determine the current directory")?;
    dunce::canonicalize(&cwd)
        .with_context(|| format!("Could not resolve the current directory '{}'", cwd.display()))
}

/// Locates and parses `config.yml` without validating it.
pub fn read_config() -> Result<Config> {
    let path = config::find_config_path()?;
    Ok(config::read(&path)?)
}

/// Aligns `rows` into columns. Display width is measured, so wide characters
/// and ANSI styling do not break alignment. The last column is never padded.
pub fn format_columns(rows: &[Vec<String>]) -> Vec<String> {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; column_count];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (i, (cell, width)) in row.iter().zip(&widths).enumerate() {
                line.push_str(cell);
                if i + 1 < row.len() {
                    let padding = width.saturating_sub(measure_text_width(cell)) + COLUMN_GAP;
                    line.push_str(&" ".repeat(padding));
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// The label shown for an entry: `name` for tools, `name -> target` for aliases.
pub fn entry_label(entry: &CatalogEntry) -> String {
    match (entry.kind, &entry.target) {
        (EntryKind::Alias, Some(target)) => format!("{} -> {}", entry.name, target),
        _ => entry.name.clone(),
    }
}

/// Renders entries as indented `label  description` lines.
pub fn render_entries<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let rows: Vec<Vec<String>> = entries
        .into_iter()
        .map(|entry| {
            vec![
                entry_label(entry),
                entry.description.clone().unwrap_or_default(),
            ]
        })
        .collect();

    format_columns(&rows)
        .into_iter()
        .map(|line| format!("  {}\n", line))
        .collect()
}
