// src/cli/handlers/mod.rs

// One module per built-in command, plus the runner for configured tools.

pub mod commons;
pub mod completion;
pub mod doctor;
pub mod init;
pub mod list;
pub mod run;
pub mod version;
