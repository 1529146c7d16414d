//! External command execution.
//!
//! Listing commands are the only subprocesses pkgsense spawns. They run
//! with captured output, an optional deadline, and a [`CancelToken`] that
//! lets another thread abandon the wait and kill the child.

pub mod cancel;
pub mod command;

pub use cancel::CancelToken;
pub use command::{execute, CommandOptions, CommandResult};
