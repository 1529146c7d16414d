//! Detection settings.
//!
//! Settings come from the `settings:` block of a catalog file and can be
//! overridden from the command line.

use crate::error::{PkgsenseError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default deadline for a single listing command.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Tunables for a detection pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionSettings {
    /// Active package manager identifier; auto-detected when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,

    /// Deadline in seconds for each listing command.
    pub timeout_secs: u64,

    /// Directories searched after PATH when resolving executables.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_paths: Vec<PathBuf>,

    /// Also search well-known version manager directories (nvm, cargo, ...).
    #[serde(skip_serializing_if = "is_false")]
    pub probe_version_managers: bool,

    /// Extra package → binaries heuristics, layered over the built-in table.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub heuristics: BTreeMap<String, Vec<String>>,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            package_manager: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            extra_paths: Vec::new(),
            probe_version_managers: false,
            heuristics: BTreeMap::new(),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl DetectionSettings {
    /// Listing deadline as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Extra search directories with a leading `~` expanded.
    pub fn expanded_extra_paths(&self) -> Vec<PathBuf> {
        self.extra_paths.iter().map(|p| expand_tilde(p)).collect()
    }

    /// Check the settings for values a pass cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(PkgsenseError::CatalogValidationError {
                message: "settings.timeout_secs must be greater than zero".to_string(),
            });
        }

        for (package, binaries) in &self.heuristics {
            if package.trim().is_empty() {
                return Err(PkgsenseError::CatalogValidationError {
                    message: "settings.heuristics contains an empty package name".to_string(),
                });
            }
            if binaries.iter().all(|b| b.trim().is_empty()) {
                return Err(PkgsenseError::CatalogValidationError {
                    message: format!(
                        "settings.heuristics.{} must list at least one binary",
                        package
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
