// src/models.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

// --- `config.yml` MODELS (What is read from the configuration file) ---

/// Treats an explicit YAML `null` (e.g. `tools:` with nothing after it) the same
/// as an absent key, so validation rather than the parser reports the problem.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Represents the deserialized structure of a `config.yml` file.
///
/// Required fields default to empty values so that a missing `directory`, `run`
/// or `tool` surfaces as a validation issue alongside every other problem
/// instead of aborting the parse.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project-relative directory that holds one private subdirectory per tool.
    #[serde(default, deserialize_with = "null_as_default")]
    pub directory: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools: BTreeMap<String, Tool>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub aliases: BTreeMap<String, Alias>,
    /// Absolute path of the file this configuration was loaded from.
    #[serde(skip)]
    pub config_file_path: PathBuf,
}

impl Config {
    /// The directory containing the loaded configuration file.
    pub fn config_dir(&self) -> &Path {
        self.config_file_path.parent().unwrap_or(Path::new(""))
    }

    /// Sorted tool names.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Sorted alias names.
    pub fn alias_names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }
}

/// One delegatable command definition.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Tool {
    /// Program to launch. May contain template references.
    #[serde(default, deserialize_with = "null_as_default")]
    pub run: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Args::is_empty"
    )]
    pub args: Args,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named shortcut to a tool that layers its own args and env on top.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Alias {
    /// Name of the target tool.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Args::is_empty"
    )]
    pub args: Args,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Alias {
    /// The target tool name with surrounding whitespace removed.
    pub fn target(&self) -> &str {
        self.tool.trim()
    }
}

/// Arguments injected around the caller's own arguments.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Args {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub prepend: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub append: Vec<String>,
}

impl Args {
    pub fn is_empty(&self) -> bool {
        self.prepend.is_empty() && self.append.is_empty()
    }
}

// --- RUNTIME MODELS (never persisted) ---

/// The overlay contributed by an alias when a name resolves through one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasOverlay<'a> {
    pub name: &'a str,
    pub args: &'a Args,
    pub env: &'a BTreeMap<String, String>,
}

/// The result of looking a user-supplied name up in a `Config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedEntry<'a> {
    pub tool_name: &'a str,
    pub tool: &'a Tool,
    /// Present only when the name matched an alias.
    pub alias: Option<AliasOverlay<'a>>,
}

impl<'a> ResolvedEntry<'a> {
    /// The name the user typed: the alias name if one was used, else the tool name.
    pub fn display_name(&self) -> &'a str {
        self.alias.map_or(self.tool_name, |alias| alias.name)
    }
}

/// A fully evaluated process invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    /// Final argument vector. User arguments may be arbitrary OS strings.
    pub args: Vec<OsString>,
    /// The complete child environment, as ordered key/value pairs.
    pub env: Vec<(OsString, OsString)>,
}

impl Invocation {
    /// Looks a variable up in the final environment. The last entry wins.
    pub fn env_var(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// The environment rendered as `KEY=VALUE` entries.
    pub fn env_entries(&self) -> Vec<OsString> {
        self.env
            .iter()
            .map(|(key, value)| {
                let mut entry = OsString::with_capacity(key.len() + value.len() + 1);
                entry.push(key);
                entry.push("=");
                entry.push(value);
                entry
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sections_deserialize_as_empty() {
        let yaml = "directory: .sidetable\ntools:\naliases:\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.tools.is_empty());
        assert!(config.aliases.is_empty());
    }

    #[test]
    fn test_missing_run_is_left_for_validation() {
        let yaml = "directory: .sidetable\ntools:\n  git:\n    description: no run\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tools["git"].run, "");
    }

    #[test]
    fn test_unknown_field_in_tool_is_rejected() {
        let yaml = "directory: .sidetable\ntools:\n  git:\n    runs: git\n";
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err(), "Should fail due to unknown field 'runs'");
        let error_msg = result.unwrap_err().to_string();
        assert!(
            error_msg.contains("unknown field `runs`"),
            "Error message was: {}",
            error_msg
        );
    }

    #[test]
    fn test_legacy_inline_alias_is_rejected() {
        let yaml = "directory: .sidetable\ntools:\n  git:\n    run: git\n    alias: g\n";
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_preserves_args_and_env() {
        let yaml = r#"
directory: .sidetable
tools:
  git:
    run: git
    args:
      prepend: ["-C", "{{.ToolDir}}"]
      append: ["--no-pager"]
    env:
      GIT_DIR: "{{.ToolDir}}/.git"
    description: Private git
aliases:
  gs:
    tool: git
    args:
      prepend: [status]
    env:
      PAGER: cat
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let rendered = serde_yaml::to_string(&config).unwrap();
        let reparsed: Config = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(config, reparsed);
        assert_eq!(reparsed.tools["git"].args.prepend, vec!["-C", "{{.ToolDir}}"]);
        assert_eq!(reparsed.aliases["gs"].env["PAGER"], "cat");
    }

    #[test]
    fn test_alias_target_ignores_surrounding_whitespace() {
        let alias = Alias {
            tool: "  git\t".to_string(),
            ..Default::default()
        };
        assert_eq!(alias.target(), "git");
    }

    #[test]
    fn test_display_name_prefers_alias() {
        let tool = Tool {
            run: "git".to_string(),
            ..Default::default()
        };
        let args = Args::default();
        let env = BTreeMap::new();
        let direct = ResolvedEntry {
            tool_name: "git",
            tool: &tool,
            alias: None,
        };
        let aliased = ResolvedEntry {
            alias: Some(AliasOverlay {
                name: "g",
                args: &args,
                env: &env,
            }),
            ..direct
        };
        assert_eq!(direct.display_name(), "git");
        assert_eq!(aliased.display_name(), "g");
    }

    #[test]
    fn test_env_entries_are_key_value_pairs() {
        let invocation = Invocation {
            program: "env".to_string(),
            args: vec![],
            env: vec![
                (OsString::from("A"), OsString::from("1")),
                (OsString::from("B"), OsString::from("x=y")),
            ],
        };
        assert_eq!(
            invocation.env_entries(),
            vec![OsString::from("A=1"), OsString::from("B=x=y")]
        );
        assert_eq!(invocation.env_var("B"), Some(OsStr::new("x=y")));
        assert_eq!(invocation.env_var("C"), None);
    }
}
