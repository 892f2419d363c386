//! # Core Resolution Pipeline
//!
//! Everything between a raw `config.yml` and a ready-to-spawn `Invocation`.
//!
//! - **`builtin`**: the fixed set of names reserved for built-in commands.
//! - **`paths`**: locating `config.yml` (override variable, then the XDG config home).
//! - **`config`**: reading, parsing and strictly loading a configuration file.
//! - **`validator`**: collects every structural problem as a sorted list of issues.
//! - **`resolver`**: maps a user-supplied name onto a tool, with an optional alias overlay.
//! - **`interpolator`**: `{{.Field}}` substitution over a closed set of context fields.
//! - **`invocation`**: assembles program, argument vector and environment.
//! - **`catalog`**: the listable view of tools and aliases used by `list`.
//! - **`workspace`**: a loaded configuration bound to a project root.

pub mod builtin;
pub mod catalog;
pub mod config;
pub mod interpolator;
pub mod invocation;
pub mod paths;
pub mod resolver;
pub mod validator;
pub mod workspace;
