//! Detection configuration.
//!
//! # Modules
//!
//! - [`settings`] - Tunables for a detection pass (manager, timeout, search path)

pub mod settings;

pub use settings::{expand_tilde, DetectionSettings, DEFAULT_TIMEOUT_SECS};
