//! Catalog file loading and validation.
//!
//! A catalog file is YAML with an optional `settings:` block and an ordered
//! `software:` list mixing applications and suites:
//!
//! ```yaml
//! settings:
//!   package_manager: apt
//! software:
//!   - name: Git
//!     package: git
//!     executables: [git]
//!   - name: Node toolchain
//!     components:
//!       - { name: Node, package: nodejs, executables: [node] }
//!       - { name: npm, package: npm }
//! ```

use crate::catalog::model::{Application, ApplicationSuite, SoftwareItem};
use crate::config::DetectionSettings;
use crate::error::{PkgsenseError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// File name looked up in the working directory when no catalog is given.
pub const DEFAULT_CATALOG_FILE: &str = "pkgsense.yml";

/// A loaded catalog: detection settings plus the ordered items.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub settings: DetectionSettings,
    pub items: Vec<SoftwareItem>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    settings: DetectionSettings,
    #[serde(default)]
    software: Vec<CatalogEntry>,
}

/// Applications must carry `package`; suites must carry `components`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Application(Application),
    Suite(SuiteEntry),
}

#[derive(Debug, Deserialize)]
struct SuiteEntry {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    components: Vec<Application>,
}

impl From<CatalogEntry> for SoftwareItem {
    fn from(entry: CatalogEntry) -> Self {
        match entry {
            CatalogEntry::Application(app) => SoftwareItem::Application(app),
            CatalogEntry::Suite(suite) => SoftwareItem::Suite(ApplicationSuite {
                name: suite.name,
                description: suite.description,
                category: suite.category,
                components: suite.components,
            }),
        }
    }
}

impl Catalog {
    /// Load and validate a catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PkgsenseError::CatalogNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PkgsenseError::Io(e)
            }
        })?;

        let catalog = Self::parse(&content, path)?;
        catalog.validate()?;
        tracing::debug!(
            "Loaded catalog {} with {} items",
            path.display(),
            catalog.items.len()
        );
        Ok(catalog)
    }

    /// Parse YAML content into a catalog without validating it.
    ///
    /// `source_path` is only used for error reporting.
    pub fn parse(content: &str, source_path: &Path) -> Result<Self> {
        let file: CatalogFile =
            serde_yaml::from_str(content).map_err(|e| PkgsenseError::CatalogParseError {
                path: source_path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            settings: file.settings,
            items: file.software.into_iter().map(SoftwareItem::from).collect(),
        })
    }

    /// Check names, package tokens and settings.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;

        let mut leaf_names = HashSet::new();
        let mut suite_names = HashSet::new();

        for item in &self.items {
            if let SoftwareItem::Suite(suite) = item {
                if suite.name.trim().is_empty() {
                    return Err(invalid("suite with an empty name"));
                }
                if !suite_names.insert(suite.name.as_str()) {
                    return Err(invalid(&format!("duplicate suite name '{}'", suite.name)));
                }
                if suite.components.is_empty() {
                    return Err(invalid(&format!("suite '{}' has no components", suite.name)));
                }
            }

            for app in item.leaves() {
                if app.name.trim().is_empty() {
                    return Err(invalid("application with an empty name"));
                }
                if app.package_tokens().is_empty() {
                    return Err(invalid(&format!(
                        "application '{}' has an empty package",
                        app.name
                    )));
                }
                if !leaf_names.insert(app.name.as_str()) {
                    return Err(invalid(&format!(
                        "duplicate application name '{}'",
                        app.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Every leaf application, suites flattened, in catalog order.
    pub fn leaves(&self) -> impl Iterator<Item = &Application> {
        self.items.iter().flat_map(|item| item.leaves().iter())
    }

    /// Write detection results back onto the `installed` flags.
    ///
    /// Leaves absent from `results` are set to not installed, so a stale
    /// `true` from an earlier pass never survives.
    pub fn apply_results(&mut self, results: &HashMap<String, bool>) {
        for item in &mut self.items {
            let leaves: &mut [Application] = match item {
                SoftwareItem::Application(app) => std::slice::from_mut(app),
                SoftwareItem::Suite(suite) => &mut suite.components,
            };
            for app in leaves {
                app.installed = results.get(&app.name).copied().unwrap_or(false);
            }
        }
    }
}

fn invalid(message: &str) -> PkgsenseError {
    PkgsenseError::CatalogValidationError {
        message: message.to_string(),
    }
}
