//! # System Interaction Layer
//!
//! The boundary between the resolution pipeline and the operating system.
//!
//! - **`executor`**: spawns a built `Invocation` as a child process, wires up its
//!   standard streams, mirrors its exit code and kills it on cancellation.

pub mod executor;
