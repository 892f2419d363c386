// src/core/resolver.rs

use crate::models::{AliasOverlay, Config, ResolvedEntry};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unknown tool or alias: '{name}'")]
    EntryNotFound { name: String },
    /// Only reachable with a configuration that skipped validation.
    #[error("alias '{alias}' points to unknown tool '{tool}'")]
    AliasTargetMissing { alias: String, tool: String },
}

/// Maps a user-supplied `name` onto a tool.
///
/// Tool names are matched first and never carry an alias overlay. Aliases are
/// only consulted when no tool matches; validation forbids the two sharing a
/// name, so the order only matters for unvalidated input.
pub fn resolve<'a>(config: &'a Config, name: &str) -> Result<ResolvedEntry<'a>, ResolveError> {
    if let Some((tool_name, tool)) = config.tools.get_key_value(name) {
        log::debug!("Resolved '{}' to tool '{}'.", name, tool_name);
        return Ok(ResolvedEntry {
            tool_name,
            tool,
            alias: None,
        });
    }

    let (alias_name, alias) =
        config
            .aliases
            .get_key_value(name)
            .ok_or_else(|| ResolveError::EntryNotFound {
                name: name.to_string(),
            })?;

    let (tool_name, tool) = config.tools.get_key_value(alias.target()).ok_or_else(|| {
        ResolveError::AliasTargetMissing {
            alias: alias_name.clone(),
            tool: alias.target().to_string(),
        }
    })?;

    log::debug!("Resolved alias '{}' to tool '{}'.", alias_name, tool_name);
    Ok(ResolvedEntry {
        tool_name,
        tool,
        alias: Some(AliasOverlay {
            name: alias_name,
            args: &alias.args,
            env: &alias.env,
        }),
    })
}
