//! Installed-software detection.
//!
//! Detection runs in two layers. Layer 2 ([`quick`]) answers from the
//! filesystem: catalog-declared executables and a package-to-binary
//! heuristic table, no subprocesses. Layer 3 ([`batch`]) runs a single
//! listing command per package manager for whatever Layer 2 could not
//! settle. [`TwoLayerPackageChecker`] drives both and merges the verdicts.
//!
//! # Modules
//!
//! - [`adapter`] - Supported package managers, listing commands and parsers
//! - [`search_path`] - Executable lookup over PATH and extra directories
//! - [`heuristics`] - Package token to binary table
//! - [`quick`] - Layer 2
//! - [`lister`] - Running listing commands
//! - [`batch`] - Layer 3
//! - [`checker`] - The orchestrator
//! - [`pass`] - Passes on a worker thread
//! - [`report`] / [`stats`] - Pass output

pub mod adapter;
pub mod batch;
pub mod checker;
pub mod heuristics;
pub mod lister;
pub mod pass;
pub mod quick;
pub mod report;
pub mod search_path;
pub mod stats;

pub use adapter::PackageManagerKind;
pub use batch::{BatchOutcome, BatchPackageChecker, BatchWarning};
pub use checker::TwoLayerPackageChecker;
pub use heuristics::{HeuristicEntry, HeuristicTable};
pub use lister::{CommandLister, PackageLister};
pub use pass::PassHandle;
pub use quick::{QuickOutcome, QuickVerificationChecker, Verdict, VerdictSource};
pub use report::DetectionReport;
pub use search_path::SearchPath;
pub use stats::PerformanceStats;
