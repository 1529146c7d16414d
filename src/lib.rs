//! pkgsense - Installed-software detection for package catalogs.
//!
//! Given a catalog of applications and application suites, pkgsense decides
//! which are installed on the current machine. Cheap filesystem checks run
//! first; whatever they cannot settle is verified with a single package
//! manager listing per manager.
//!
//! # Modules
//!
//! - [`catalog`] - Applications, suites and catalog files
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Detection settings
//! - [`detection`] - The two-layer detection engine
//! - [`error`] - Error types and result aliases
//! - [`shell`] - Subprocess execution with deadlines and cancellation
//! - [`ui`] - Spinners, tables and terminal output
//!
//! # Example
//!
//! ```
//! use pkgsense::catalog::{Application, SoftwareItem};
//! use pkgsense::detection::{CommandLister, SearchPath, TwoLayerPackageChecker};
//! use std::sync::Arc;
//!
//! // An empty search path and no package manager: nothing can be found.
//! let checker = TwoLayerPackageChecker::new(
//!     None,
//!     SearchPath::new(vec![]),
//!     Arc::new(CommandLister::new()),
//! );
//! let items = vec![SoftwareItem::from(
//!     Application::new("Git", "git").with_executables(["git"]),
//! )];
//! let report = checker.check(&items);
//! assert!(!report.is_installed("Git"));
//! assert_eq!(report.stats.l2_hit_rate(), 100.0);
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod shell;
pub mod ui;

pub use error::{PkgsenseError, Result};
