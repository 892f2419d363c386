//! # Configuration Validator
//!
//! Checks a parsed [`Config`] against every structural rule and reports all
//! violations at once, so a user fixing their `config.yml` sees the whole
//! picture in a single pass.
//!
//! Each rule is checked independently:
//!
//! - `directory` is non-empty and relative.
//! - `tools` is non-empty.
//! - every tool has a non-empty `run` without whitespace, and a non-reserved name.
//! - every alias name is non-empty, has no whitespace, is not reserved and does
//!   not shadow a tool.
//! - every alias names an existing tool.
//!
//! Issues are sorted by path, then message, for reproducible output.

use crate::{core::builtin, models::Config};
use std::fmt;
use std::path::Path;

pub const MSG_DIRECTORY_REQUIRED: &str = "directory is required";
pub const MSG_DIRECTORY_MUST_BE_RELATIVE: &str = "directory must be relative";
pub const MSG_TOOLS_REQUIRED: &str = "tools are required";
pub const MSG_TOOL_RUN_REQUIRED: &str = "tool run is required";
pub const MSG_TOOL_RUN_HAS_WHITESPACE: &str = "tool run must not contain whitespace";
pub const MSG_TOOL_CONFLICTS_WITH_BUILTIN: &str = "tool conflicts with builtin command";
pub const MSG_ALIAS_NAME_REQUIRED: &str = "alias name is required";
pub const MSG_ALIAS_NAME_HAS_WHITESPACE: &str = "alias name must not contain whitespace";
pub const MSG_ALIAS_CONFLICTS_WITH_BUILTIN: &str = "alias conflicts with builtin command";
pub const MSG_ALIAS_CONFLICTS_WITH_TOOL: &str = "alias conflicts with tool name";
pub const MSG_ALIAS_TOOL_REQUIRED: &str = "alias tool is required";
pub const MSG_ALIAS_TOOL_NOT_FOUND: &str = "alias tool not found";

/// A single rule violation.
///
/// Field order matters: the derived `Ord` sorts by path, then message.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Issue {
    /// Location in the document, e.g. `tools["git"].run`. Empty for the root.
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The sorted outcome of validating a configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    issues: Vec<Issue>,
}

impl ValidationResult {
    fn from_unsorted(mut issues: Vec<Issue>) -> Self {
        issues.sort();
        Self { issues }
    }

    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues located at or below `path_prefix` (see [`tool_path`], [`alias_path`]).
    pub fn issues_under<'a>(&'a self, path_prefix: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.path.starts_with(path_prefix))
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Path of a tool entry, e.g. `tools["git"]`.
pub fn tool_path(name: &str) -> String {
    format!("tools[{:?}]", name)
}

/// Path of an alias entry, e.g. `aliases["g"]`.
pub fn alias_path(name: &str) -> String {
    format!("aliases[{:?}]", name)
}

/// Validates `config` against the built-in reserved names.
pub fn validate(config: &Config) -> ValidationResult {
    validate_with(config, builtin::is_reserved_name)
}

/// Validates `config`, using `is_reserved` to decide which names belong to
/// built-in commands.
pub fn validate_with<F>(config: &Config, is_reserved: F) -> ValidationResult
where
    F: Fn(&str) -> bool,
{
    let mut issues = Vec::new();
    validate_directory(&config.directory, &mut issues);
    validate_tools(config, &is_reserved, &mut issues);
    validate_aliases(config, &is_reserved, &mut issues);

    let result = ValidationResult::from_unsorted(issues);
    log::debug!("Validation finished with {} issue(s).", result.len());
    result
}

fn validate_directory(directory: &str, issues: &mut Vec<Issue>) {
    if directory.trim().is_empty() {
        issues.push(Issue::new("directory", MSG_DIRECTORY_REQUIRED));
        return;
    }
    let path = Path::new(directory);
    if path.is_absolute() || path.has_root() {
        issues.push(Issue::new("directory", MSG_DIRECTORY_MUST_BE_RELATIVE));
    }
}

fn validate_tools<F>(config: &Config, is_reserved: &F, issues: &mut Vec<Issue>)
where
    F: Fn(&str) -> bool,
{
    if config.tools.is_empty() {
        issues.push(Issue::new("tools", MSG_TOOLS_REQUIRED));
        return;
    }

    for (name, tool) in &config.tools {
        let path = tool_path(name);

        if tool.run.trim().is_empty() {
            issues.push(Issue::new(format!("{}.run", path), MSG_TOOL_RUN_REQUIRED));
        } else if tool.run.contains(char::is_whitespace) {
            issues.push(Issue::new(format!("{}.run", path), MSG_TOOL_RUN_HAS_WHITESPACE));
        }

        if is_reserved(name) {
            issues.push(Issue::new(path, MSG_TOOL_CONFLICTS_WITH_BUILTIN));
        }
    }
}

fn validate_aliases<F>(config: &Config, is_reserved: &F, issues: &mut Vec<Issue>)
where
    F: Fn(&str) -> bool,
{
    for (name, alias) in &config.aliases {
        let path = alias_path(name);

        if name.trim().is_empty() {
            issues.push(Issue::new(path.clone(), MSG_ALIAS_NAME_REQUIRED));
        } else if name.contains(char::is_whitespace) {
            issues.push(Issue::new(path.clone(), MSG_ALIAS_NAME_HAS_WHITESPACE));
        }
        if is_reserved(name) {
            issues.push(Issue::new(path.clone(), MSG_ALIAS_CONFLICTS_WITH_BUILTIN));
        }
        if config.tools.contains_key(name) {
            issues.push(Issue::new(path.clone(), MSG_ALIAS_CONFLICTS_WITH_TOOL));
        }

        let tool_field = format!("{}.tool", path);
        if alias.target().is_empty() {
            issues.push(Issue::new(tool_field, MSG_ALIAS_TOOL_REQUIRED));
        } else if !config.tools.contains_key(alias.target()) {
            issues.push(Issue::new(tool_field, MSG_ALIAS_TOOL_NOT_FOUND));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Alias, Tool};

    fn tool(run: &str) -> Tool {
        Tool {
            run: run.to_string(),
            ..Default::default()
        }
    }

    fn alias(target: &str) -> Alias {
        Alias {
            tool: target.to_string(),
            ..Default::default()
        }
    }

    fn valid_config() -> Config {
        let mut config = Config {
            directory: ".sidetable".to_string(),
            ..Default::default()
        };
        config.tools.insert("git".to_string(), tool("git"));
        config.aliases.insert("g".to_string(), alias("git"));
        config
    }

    fn messages(result: &ValidationResult) -> Vec<String> {
        result.issues().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_valid_config_has_no_issues() {
        let result = validate(&valid_config());
        assert!(result.is_ok(), "Unexpected issues: {}", result);
    }

    #[test]
    fn test_directory_rules() {
        let mut config = valid_config();
        config.directory = "   ".to_string();
        assert_eq!(messages(&validate(&config)), vec!["directory: directory is required"]);

        config.directory = "/abs/private".to_string();
        assert_eq!(
            messages(&validate(&config)),
            vec!["directory: directory must be relative"]
        );
    }

    #[test]
    fn test_empty_tools_is_reported() {
        let config = Config {
            directory: ".sidetable".to_string(),
            ..Default::default()
        };
        assert_eq!(messages(&validate(&config)), vec!["tools: tools are required"]);
    }

    #[test]
    fn test_tool_run_rules() {
        let mut config = valid_config();
        config.tools.insert("blank".to_string(), tool("  "));
        config.tools.insert("spaced".to_string(), tool("git status"));
        config.tools.insert("tabbed".to_string(), tool("git\tlog"));

        assert_eq!(
            messages(&validate(&config)),
            vec![
                r#"tools["blank"].run: tool run is required"#,
                r#"tools["spaced"].run: tool run must not contain whitespace"#,
                r#"tools["tabbed"].run: tool run must not contain whitespace"#,
            ]
        );
    }

    #[test]
    fn test_tool_name_conflicts_with_builtin() {
        let mut config = valid_config();
        config.tools.insert("list".to_string(), tool("ls"));
        assert_eq!(
            messages(&validate(&config)),
            vec![r#"tools["list"]: tool conflicts with builtin command"#]
        );
    }

    #[test]
    fn test_alias_rules() {
        let mut config = valid_config();
        config.aliases.insert("git".to_string(), alias("git"));
        config.aliases.insert("my alias".to_string(), alias("git"));
        config.aliases.insert("help".to_string(), alias("git"));
        config.aliases.insert("orphan".to_string(), alias("missing"));
        config.aliases.insert("untargeted".to_string(), alias(""));

        assert_eq!(
            messages(&validate(&config)),
            vec![
                r#"aliases["git"]: alias conflicts with tool name"#,
                r#"aliases["help"]: alias conflicts with builtin command"#,
                r#"aliases["my alias"]: alias name must not contain whitespace"#,
                r#"aliases["orphan"].tool: alias tool not found"#,
                r#"aliases["untargeted"].tool: alias tool is required"#,
            ]
        );
    }

    #[test]
    fn test_alias_target_is_trimmed_before_lookup() {
        let mut config = valid_config();
        config.aliases.insert("padded".to_string(), alias(" git "));
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_alias_name_is_reported() {
        let mut config = valid_config();
        config.aliases.insert(String::new(), alias("git"));
        assert_eq!(
            messages(&validate(&config)),
            vec![r#"aliases[""]: alias name is required"#]
        );
    }

    #[test]
    fn test_all_independent_violations_are_reported_together() {
        let mut config = valid_config();
        config.directory = "/absolute".to_string();
        config.tools.insert("list".to_string(), tool("ls"));
        config.aliases.insert("x".to_string(), alias("nonexistent"));

        let result = validate(&config);
        assert_eq!(result.len(), 3);
        assert_eq!(
            messages(&result),
            vec![
                r#"aliases["x"].tool: alias tool not found"#,
                "directory: directory must be relative",
                r#"tools["list"]: tool conflicts with builtin command"#,
            ]
        );
    }

    #[test]
    fn test_custom_reserved_predicate_is_honored() {
        let config = valid_config();
        let result = validate_with(&config, |name| name == "git");
        assert_eq!(
            messages(&result),
            vec![r#"tools["git"]: tool conflicts with builtin command"#]
        );
    }

    #[test]
    fn test_issues_under_does_not_match_name_prefixes() {
        let mut config = valid_config();
        config.tools.insert("gi".to_string(), tool(""));
        let result = validate(&config);
        assert_eq!(result.issues_under(&tool_path("gi")).count(), 1);
        assert_eq!(result.issues_under(&tool_path("git")).count(), 0);
    }
}
