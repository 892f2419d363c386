// src/constants.rs

/// The name of the application, used for the per-user configuration subdirectory.
pub const APP_DIR_NAME: &str = "sidetable";

/// The only configuration file name that is recognized.
pub const CONFIG_FILENAME: &str = "config.yml";

/// Environment variable naming a directory that directly contains `config.yml`.
pub const CONFIG_DIR_ENV: &str = "SIDETABLE_CONFIG_DIR";

/// Standard XDG variable for the per-user configuration home.
pub const XDG_CONFIG_HOME_ENV: &str = "XDG_CONFIG_HOME";

/// Exit code reported when an invocation is interrupted, as a shell would.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;
