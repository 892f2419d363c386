// src/cli/handlers/init.rs

use crate::core::{config::DEFAULT_CONFIG_YAML, paths};
use anyhow::{Context, Result, bail};
use colored::*;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Scaffolds the default `config.yml` at the discovered location.
pub fn handle() -> Result<()> {
    let path = paths::resolve_config_path()?;
    write_default_config(&path)?;
    println!("{} {}", "Created".green().bold(), path.display());
    Ok(())
}

/// Writes the default configuration to `path`, refusing to overwrite.
///
/// On Unix the parent directory is created `0700` and the file `0600`.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_private_dir(parent)
            .with_context(|| format!("Could not create directory '{}'", parent.display()))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = match options.open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            bail!("config already exists: {}", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Could not create '{}'", path.display()));
        }
    };
    file.write_all(DEFAULT_CONFIG_YAML.as_bytes())
        .with_context(|| format!("Could not write '{}'", path.display()))?;

    log::debug!("Wrote default configuration to {}.", path.display());
    Ok(())
}

fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config;
    use tempfile::TempDir;

    #[test]
    fn test_writes_loadable_default_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("sidetable").join("config.yml");

        write_default_config(&path).unwrap();

        let loaded = config::load(&path).unwrap();
        assert!(!loaded.tools.is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "directory: keep-me\n").unwrap();

        let err = write_default_config(&path).unwrap_err();
        assert!(err.to_string().contains("config already exists"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "directory: keep-me\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_are_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let config_dir = dir.path().join("sidetable");
        let path = config_dir.join("config.yml");
        write_default_config(&path).unwrap();

        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        let dir_mode = fs::metadata(&config_dir).unwrap().permissions().mode() & 0o777;
        assert_eq!(file_mode & 0o077, 0, "file mode was {:o}", file_mode);
        assert_eq!(dir_mode & 0o077, 0, "dir mode was {:o}", dir_mode);
    }
}
