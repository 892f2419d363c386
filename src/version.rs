// src/version.rs

/// Full version string, e.g. `0.4.0` or `0.4.0 (rev: 1a2b3c4, modified)`.
/// Assembled by `build.rs` from the package version and the git checkout.
pub const VERSION: &str = env!("SIDETABLE_VERSION");

/// Abbreviated git revision the binary was built from, if known.
pub const GIT_REVISION: Option<&str> = option_env!("SIDETABLE_GIT_REV");
