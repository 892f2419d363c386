use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared flag used to ask a running invocation to stop.
/// Setting it to `true` makes the executor kill the child and return
/// `ExecutionError::Cancelled`.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
pub mod version;
