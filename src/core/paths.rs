// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, CONFIG_DIR_ENV, CONFIG_FILENAME, XDG_CONFIG_HOME_ENV};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not determine the user configuration directory.")]
    ConfigHomeNotFound,
}

/// Returns the path of `config.yml`, whether or not the file exists.
///
/// `SIDETABLE_CONFIG_DIR` names the directory containing the file directly.
/// Otherwise the file lives in `sidetable/` under the per-user config home.
pub fn resolve_config_path() -> Result<PathBuf, PathError> {
    config_path_with(|key| env::var(key).ok(), dirs::home_dir)
}

/// Same as [`resolve_config_path`], with the environment lookup and home
/// directory injected so callers (and tests) never touch process state.
pub fn config_path_with<L, H>(lookup: L, home_dir: H) -> Result<PathBuf, PathError>
where
    L: Fn(&str) -> Option<String>,
    H: FnOnce() -> Option<PathBuf>,
{
    if let Some(dir) = non_empty(lookup(CONFIG_DIR_ENV)) {
        log::debug!("Using config directory from {}: {}", CONFIG_DIR_ENV, dir);
        return Ok(config_path_in(Path::new(&dir)));
    }

    let config_home = config_home_with(&lookup, home_dir)?;
    Ok(config_path_in(&config_home.join(APP_DIR_NAME)))
}

/// The per-user configuration home.
///
/// On Windows this is the platform's roaming config directory. Everywhere else
/// it follows XDG: `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`. This
/// includes macOS.
fn config_home_with<L, H>(lookup: &L, home_dir: H) -> Result<PathBuf, PathError>
where
    L: Fn(&str) -> Option<String>,
    H: FnOnce() -> Option<PathBuf>,
{
    if cfg!(target_os = "windows") {
        return dirs::config_dir().ok_or(PathError::ConfigHomeNotFound);
    }

    if let Some(dir) = non_empty(lookup(XDG_CONFIG_HOME_ENV)) {
        return Ok(PathBuf::from(dir));
    }

    home_dir()
        .map(|home| home.join(".config"))
        .ok_or(PathError::ConfigHomeNotFound)
}

fn config_path_in(dir: &Path) -> PathBuf {
    dunce::simplified(dir).join(CONFIG_FILENAME)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
