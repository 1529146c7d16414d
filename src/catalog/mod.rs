//! Software catalog: the items a detection pass is run over.
//!
//! # Modules
//!
//! - [`model`] - Applications, suites and the derived suite status
//! - [`loader`] - YAML catalog files

pub mod loader;
pub mod model;

pub use loader::{Catalog, DEFAULT_CATALOG_FILE};
pub use model::{Application, ApplicationSuite, SoftwareItem, SuiteStatus};
