// src/core/workspace.rs

use crate::{
    CancellationToken,
    core::{
        catalog::Catalog,
        config::{self, ConfigError},
        invocation::{self, BuildError},
        validator,
    },
    models::{Config, Invocation},
    system::executor::{self, ExecutionError, Streams},
};
use std::env;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Workspace root '{}' does not exist.", path.display())]
    RootNotFound { path: PathBuf },
    #[error("Workspace root '{}' is not a directory.", path.display())]
    RootNotDirectory { path: PathBuf },
    #[error("Workspace root '{}' could not be accessed: {source}", path.display())]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl WorkspaceError {
    /// `true` when the only problem is that no `config.yml` exists yet.
    pub fn is_config_missing(&self) -> bool {
        matches!(self, WorkspaceError::Config(e) if e.is_missing())
    }
}

/// Failure of [`Workspace::run`]: either nothing could be built, or the
/// child could not be run to a successful exit.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// A validated configuration bound to the project it is used from.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens the workspace rooted at `root`.
    ///
    /// `config_path` overrides discovery of `config.yml`. The configuration is
    /// loaded strictly: any validation issue fails the open.
    pub fn open(root: &Path, config_path: Option<&Path>) -> Result<Self, WorkspaceError> {
        let root = canonical_root(root)?;
        let path = match config_path {
            Some(path) => path.to_path_buf(),
            None => config::find_config_path()?,
        };
        log::debug!("Opening workspace '{}' with config '{}'.", root.display(), path.display());
        let config = config::load(&path)?;
        Ok(Self { root, config })
    }

    /// Binds an already loaded configuration to `root` without further checks.
    pub fn from_config(root: PathBuf, config: Config) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::build(&self.config, &self.root, &validator::validate(&self.config))
    }

    /// Builds the invocation for `name` on top of the current process environment.
    pub fn build(&self, name: &str, args: &[OsString]) -> Result<Invocation, BuildError> {
        invocation::build(&self.config, name, args, &self.root, env::vars_os())
    }

    /// Builds and executes `name`, blocking until the child exits.
    pub fn run(
        &self,
        name: &str,
        args: &[OsString],
        streams: Streams,
        cancellation_token: &CancellationToken,
    ) -> Result<(), RunError> {
        let invocation = self.build(name, args)?;
        executor::execute(&invocation, streams, cancellation_token)?;
        Ok(())
    }
}

fn canonical_root(root: &Path) -> Result<PathBuf, WorkspaceError> {
    let inaccessible = |source: std::io::Error| WorkspaceError::RootInaccessible {
        path: root.to_path_buf(),
        source,
    };

    let metadata = match root.metadata() {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(WorkspaceError::RootNotFound {
                path: root.to_path_buf(),
            });
        }
        Err(e) => return Err(inaccessible(e)),
    };
    if !metadata.is_dir() {
        return Err(WorkspaceError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    dunce::canonicalize(root).map_err(inaccessible)
}
