// src/core/interpolator.rs

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use thiserror::Error;

lazy_static! {
    static ref FIELD_REFERENCE_RE: Regex = Regex::new(r"^\.([A-Za-z_][A-Za-z0-9_]*)$")
        .expect("field reference pattern is a valid regex");
}

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Names of the fields a template may reference.
pub const FIELD_NAMES: &[&str] = &["WorkspaceRoot", "ToolDir", "ConfigDir"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated placeholder at offset {offset}: missing '}}}}'")]
    Unterminated { offset: usize },
    #[error("unsupported template expression '{expression}': only field references like '.ToolDir' are allowed")]
    InvalidExpression { expression: String },
    #[error("unknown template field '.{name}' (available: .WorkspaceRoot, .ToolDir, .ConfigDir)")]
    UnknownField { name: String },
}

/// The values a template can see. Built once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext {
    /// Absolute root of the project sidetable was invoked from.
    pub workspace_root: PathBuf,
    /// `workspace_root/directory/<tool name>`.
    pub tool_dir: PathBuf,
    /// Directory containing the loaded `config.yml`.
    pub config_dir: PathBuf,
}

impl TemplateContext {
    pub fn new(workspace_root: &Path, directory: &str, tool_name: &str, config_dir: &Path) -> Self {
        Self {
            workspace_root: workspace_root.to_path_buf(),
            tool_dir: workspace_root.join(directory).join(tool_name),
            config_dir: config_dir.to_path_buf(),
        }
    }

    /// Looks up a field by its template name.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let path = match name {
            "WorkspaceRoot" => &self.workspace_root,
            "ToolDir" => &self.tool_dir,
            "ConfigDir" => &self.config_dir,
            _ => return None,
        };
        Some(dunce::simplified(path).to_string_lossy())
    }
}

/// Expands `{{.Field}}` references against a [`TemplateContext`].
///
/// This is attribute interpolation only: one left-to-right pass, no loops,
/// conditionals or functions. Whitespace inside the braces is allowed
/// (`{{ .ToolDir }}`). Substituted values are never rescanned.
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    context: &'a TemplateContext,
}

impl<'a> Interpolator<'a> {
    pub fn new(context: &'a TemplateContext) -> Self {
        Self { context }
    }

    /// Expands every placeholder in `template`.
    ///
    /// # Errors
    /// Fails closed: an unterminated `{{`, anything other than a `.Field`
    /// reference, or a field outside [`FIELD_NAMES`] is an error, never an
    /// empty substitution.
    pub fn expand(&self, template: &str) -> Result<String, TemplateError> {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;
        let mut consumed = 0;

        while let Some((before, opened)) = rest.split_once(OPEN) {
            output.push_str(before);

            let (body, after) = opened.split_once(CLOSE).ok_or(TemplateError::Unterminated {
                offset: consumed + before.len(),
            })?;
            let expression = body.trim();

            let name = FIELD_REFERENCE_RE
                .captures(expression)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str())
                .ok_or_else(|| TemplateError::InvalidExpression {
                    expression: expression.to_string(),
                })?;

            let value = self
                .context
                .field(name)
                .ok_or_else(|| TemplateError::UnknownField {
                    name: name.to_string(),
                })?;
            output.push_str(&value);

            consumed += before.len() + OPEN.len() + body.len() + CLOSE.len();
            rest = after;
        }

        output.push_str(rest);
        Ok(output)
    }
}

/// Convenience wrapper around [`Interpolator::expand`].
pub fn evaluate(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    Interpolator::new(context).expand(template)
}
