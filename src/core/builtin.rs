// src/core/builtin.rs

/// Names taken by built-in commands. A tool or alias with one of these names
/// could never be reached from the command line.
pub const RESERVED_NAMES: &[&str] = &["completion", "doctor", "help", "init", "list", "version"];

/// Returns `true` when `name` is reserved for a built-in command.
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}
