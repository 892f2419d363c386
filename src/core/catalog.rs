// src/core/catalog.rs

use crate::{
    core::{
        interpolator::evaluate,
        invocation::context_for,
        validator::{alias_path, tool_path, ValidationResult},
    },
    models::Config,
};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Tool,
    Alias,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Tool => write!(f, "tool"),
            EntryKind::Alias => write!(f, "alias"),
        }
    }
}

/// A listable tool or alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub kind: EntryKind,
    /// The aliased tool. `None` for tools.
    pub target: Option<String>,
    /// Rendered description, or the raw text when it could not be rendered.
    pub description: Option<String>,
    /// Why the entry cannot be used, when validation flagged it.
    pub invalid_reason: Option<String>,
}

impl CatalogEntry {
    pub fn is_valid(&self) -> bool {
        self.invalid_reason.is_none()
    }
}

/// Every tool, then every alias, each sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds the catalog of `config`, flagging each entry named by an issue
    /// in `validation`.
    pub fn build(config: &Config, workspace_root: &Path, validation: &ValidationResult) -> Self {
        let mut entries = Vec::with_capacity(config.tools.len() + config.aliases.len());

        for (name, tool) in &config.tools {
            entries.push(CatalogEntry {
                name: name.clone(),
                kind: EntryKind::Tool,
                target: None,
                description: render_description(
                    config,
                    name,
                    name,
                    tool.description.as_deref(),
                    workspace_root,
                ),
                invalid_reason: invalid_reason(validation, &tool_path(name)),
            });
        }

        for (name, alias) in &config.aliases {
            entries.push(CatalogEntry {
                name: name.clone(),
                kind: EntryKind::Alias,
                target: Some(alias.target().to_string()),
                description: render_description(
                    config,
                    name,
                    alias.target(),
                    alias.description.as_deref(),
                    workspace_root,
                ),
                invalid_reason: invalid_reason(validation, &alias_path(name)),
            });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn valid(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|entry| entry.is_valid())
    }

    pub fn invalid(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|entry| !entry.is_valid())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn render_description(
    config: &Config,
    entry_name: &str,
    tool_name: &str,
    description: Option<&str>,
    workspace_root: &Path,
) -> Option<String> {
    let raw = description?;
    let context = context_for(config, tool_name, workspace_root);
    match evaluate(raw, &context) {
        Ok(rendered) => Some(rendered),
        Err(e) => {
            log::warn!("Could not render description of '{}': {}", entry_name, e);
            Some(raw.to_string())
        }
    }
}

fn invalid_reason(validation: &ValidationResult, entry_path: &str) -> Option<String> {
    let reasons: Vec<&str> = validation
        .issues_under(entry_path)
        .map(|issue| issue.message.as_str())
        .collect();
    if reasons.is_empty() {
        None
    } else {
        Some(reasons.join("; "))
    }
}
