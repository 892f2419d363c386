//! # Invocation Builder
//!
//! Turns a name from the command line into a fully evaluated [`Invocation`].
//!
//! The argument vector is layered with the alias outermost:
//!
//! ```text
//! alias.prepend, tool.prepend, <user args>, tool.append, alias.append
//! ```
//!
//! User arguments are passed verbatim and never templated. The environment
//! starts from the ambient one; the tool's `env` overlays it and the alias's
//! `env` overlays that. Ambient keys keep their position when overridden and
//! new keys are appended in key order.
//!
//! Building either succeeds completely or fails; no partial invocation is
//! ever returned.

use crate::{
    core::{
        interpolator::{Interpolator, TemplateContext, TemplateError},
        resolver::{self, ResolveError},
        validator::{alias_path, tool_path},
    },
    models::{Config, Invocation, ResolvedEntry},
};
use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("failed to evaluate {field}: {source}")]
    Template {
        field: String,
        #[source]
        source: TemplateError,
    },
    #[error("tool '{tool}' evaluates to an empty program")]
    EmptyProgram { tool: String },
    #[error("tool '{tool}' evaluates to a program containing whitespace: '{program}'")]
    ProgramContainsWhitespace { tool: String, program: String },
}

/// The template context seen by everything belonging to `tool_name`.
pub fn context_for(config: &Config, tool_name: &str, workspace_root: &Path) -> TemplateContext {
    TemplateContext::new(
        workspace_root,
        &config.directory,
        tool_name,
        config.config_dir(),
    )
}

/// Resolves `name` and builds its invocation.
///
/// `base_env` is the ambient environment the child inherits before any
/// tool or alias overrides are applied.
pub fn build<I>(
    config: &Config,
    name: &str,
    user_args: &[OsString],
    workspace_root: &Path,
    base_env: I,
) -> Result<Invocation, BuildError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let entry = resolver::resolve(config, name)?;
    build_resolved(config, &entry, user_args, workspace_root, base_env)
}

/// Builds the invocation for an already resolved entry.
pub fn build_resolved<I>(
    config: &Config,
    entry: &ResolvedEntry<'_>,
    user_args: &[OsString],
    workspace_root: &Path,
    base_env: I,
) -> Result<Invocation, BuildError>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let context = context_for(config, entry.tool_name, workspace_root);
    let interpolator = Interpolator::new(&context);
    let tool_field = tool_path(entry.tool_name);

    // --- Program ---
    let program = evaluate_field(&interpolator, &entry.tool.run, || {
        format!("{}.run", tool_field)
    })?;
    if program.trim().is_empty() {
        return Err(BuildError::EmptyProgram {
            tool: entry.tool_name.to_string(),
        });
    }
    if program.contains(char::is_whitespace) {
        return Err(BuildError::ProgramContainsWhitespace {
            tool: entry.tool_name.to_string(),
            program,
        });
    }

    // --- Arguments ---
    let alias_field = entry.alias.map(|alias| alias_path(alias.name));
    let mut args: Vec<OsString> = Vec::with_capacity(user_args.len());

    if let (Some(alias), Some(field)) = (entry.alias, &alias_field) {
        let prepend = evaluate_list(&interpolator, &alias.args.prepend, field, "prepend")?;
        args.extend(prepend.into_iter().map(OsString::from));
    }
    let tool_prepend = evaluate_list(&interpolator, &entry.tool.args.prepend, &tool_field, "prepend")?;
    args.extend(tool_prepend.into_iter().map(OsString::from));
    args.extend(user_args.iter().cloned());
    let tool_append = evaluate_list(&interpolator, &entry.tool.args.append, &tool_field, "append")?;
    args.extend(tool_append.into_iter().map(OsString::from));
    if let (Some(alias), Some(field)) = (entry.alias, &alias_field) {
        let append = evaluate_list(&interpolator, &alias.args.append, field, "append")?;
        args.extend(append.into_iter().map(OsString::from));
    }

    // --- Environment ---
    let mut overlay = evaluate_env(&interpolator, &entry.tool.env, &tool_field)?;
    if let (Some(alias), Some(field)) = (entry.alias, &alias_field) {
        overlay.extend(evaluate_env(&interpolator, alias.env, field)?);
    }
    let env = merge_env(base_env, overlay);

    log::debug!(
        "Built invocation for '{}': {} {:?} ({} env var(s))",
        entry.display_name(),
        program,
        args,
        env.len()
    );

    Ok(Invocation { program, args, env })
}

fn evaluate_field<F>(
    interpolator: &Interpolator<'_>,
    template: &str,
    field: F,
) -> Result<String, BuildError>
where
    F: FnOnce() -> String,
{
    interpolator
        .expand(template)
        .map_err(|source| BuildError::Template {
            field: field(),
            source,
        })
}

fn evaluate_list(
    interpolator: &Interpolator<'_>,
    templates: &[String],
    owner: &str,
    position: &str,
) -> Result<Vec<String>, BuildError> {
    templates
        .iter()
        .enumerate()
        .map(|(index, template)| {
            evaluate_field(interpolator, template, || {
                format!("{}.args.{}[{}]", owner, position, index)
            })
        })
        .collect()
}

fn evaluate_env(
    interpolator: &Interpolator<'_>,
    env: &BTreeMap<String, String>,
    owner: &str,
) -> Result<BTreeMap<String, String>, BuildError> {
    env.iter()
        .map(|(key, template)| {
            let value = evaluate_field(interpolator, template, || format!("{}.env.{}", owner, key))?;
            Ok((key.clone(), value))
        })
        .collect()
}

/// Overlays `overrides` onto `base`.
///
/// Keys already present in `base` are replaced where they stand; the rest are
/// appended in the order `overrides` yields them.
pub fn merge_env<I>(base: I, overrides: BTreeMap<String, String>) -> Vec<(OsString, OsString)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut replaced: HashSet<&str> = HashSet::new();
    let mut merged: Vec<(OsString, OsString)> = base
        .into_iter()
        .map(|(key, value)| {
            match key
                .to_str()
                .and_then(|k| overrides.get_key_value(k))
            {
                Some((k, new_value)) => {
                    replaced.insert(k.as_str());
                    (key, OsString::from(new_value))
                }
                None => (key, value),
            }
        })
        .collect();

    merged.extend(
        overrides
            .iter()
            .filter(|(key, _)| !replaced.contains(key.as_str()))
            .map(|(key, value)| (OsString::from(key), OsString::from(value))),
    );
    merged
}
