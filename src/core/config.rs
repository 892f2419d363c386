// src/core/config.rs

use crate::{
    core::{
        paths::{self, PathError},
        validator::{self, ValidationResult},
    },
    models::Config,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The configuration written by `sidetable init`.
pub const DEFAULT_CONFIG_YAML: &str = r#"# sidetable configuration
#
# `directory` is relative to the project you run sidetable from. Each tool
# gets its own subdirectory there, available to templates as {{.ToolDir}}.
# Other template fields: {{.WorkspaceRoot}} and {{.ConfigDir}}.
directory: .sidetable

tools:
  notes:
    run: ls
    args:
      append:
        - "{{.ToolDir}}"
    description: List the private notes kept for this project

aliases:
  ll:
    tool: notes
    args:
      prepend:
        - "-la"
    description: Long listing of the private notes
"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    Missing { path: PathBuf },
    #[error("could not read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration:\n{0}")]
    Validation(ValidationResult),
    #[error(transparent)]
    Location(#[from] PathError),
}

impl ConfigError {
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Missing { .. })
    }
}

/// Discovers `config.yml` and checks that it exists.
pub fn find_config_path() -> Result<PathBuf, ConfigError> {
    let path = paths::resolve_config_path()?;
    if !path.is_file() {
        return Err(ConfigError::Missing { path });
    }
    Ok(path)
}

/// Reads and validates the configuration at `path`.
///
/// Fails if the file is absent, unreadable, not valid YAML for the schema, or
/// has at least one validation issue. All issues are reported together.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let config = read(path)?;
    let result = validator::validate(&config);
    if !result.is_ok() {
        return Err(ConfigError::Validation(result));
    }
    log::debug!(
        "Loaded {} tool(s) and {} alias(es) from {}",
        config.tools.len(),
        config.aliases.len(),
        config.config_file_path.display()
    );
    Ok(config)
}

/// Reads and parses the configuration at `path` without validating it.
/// Used by `doctor` and `list`, which report problems instead of failing on them.
pub fn read(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConfigError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let absolute = std::path::absolute(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse(&content, dunce::simplified(&absolute))
}

/// Parses YAML `content` as if it had been read from `path`.
pub fn parse(content: &str, path: &Path) -> Result<Config, ConfigError> {
    let mut config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    config.config_file_path = path.to_path_buf();
    Ok(config)
}

/// Serializes `config` back to YAML. Template strings are kept verbatim.
pub fn to_yaml(config: &Config) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(config)
}
