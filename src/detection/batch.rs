//! Layer 3: one package-manager listing per manager per pass.

use crate::catalog::Application;
use crate::detection::adapter::PackageManagerKind;
use crate::detection::lister::PackageLister;
use crate::error::PkgsenseError;
use crate::shell::CancelToken;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A Layer 3 batch that could not be verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchWarning {
    pub manager: String,
    pub item_count: usize,
    pub error: String,
}

impl BatchWarning {
    fn new(manager: &str, item_count: usize, error: &PkgsenseError) -> Self {
        Self {
            manager: manager.to_string(),
            item_count,
            error: error.to_string(),
        }
    }
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not verify {} items via {}: {}",
            self.item_count, self.manager, self.error
        )
    }
}

/// Verdicts for exactly the items of one batch.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub results: HashMap<String, bool>,

    /// Set when the listing failed; every result is then `false`.
    pub failure: Option<BatchWarning>,
}

impl BatchOutcome {
    fn failed(apps: &[&Application], warning: BatchWarning) -> Self {
        Self {
            results: apps.iter().map(|a| (a.name.clone(), false)).collect(),
            failure: Some(warning),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Verifies applications against package-manager listings.
#[derive(Clone)]
pub struct BatchPackageChecker {
    lister: Arc<dyn PackageLister>,
    timeout: Duration,
}

impl BatchPackageChecker {
    pub fn new(lister: Arc<dyn PackageLister>, timeout: Duration) -> Self {
        Self { lister, timeout }
    }

    /// Set the deadline for each listing.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Verify one batch with a single listing.
    ///
    /// An application is installed when every one of its package tokens is
    /// in the listing.
    pub fn check(
        &self,
        manager: PackageManagerKind,
        apps: &[&Application],
        cancel: &CancelToken,
    ) -> BatchOutcome {
        if apps.is_empty() {
            return BatchOutcome::default();
        }

        let output = match self.lister.list_installed(manager, self.timeout, cancel) {
            Ok(output) => output,
            Err(e) => {
                let warning = BatchWarning::new(manager.id(), apps.len(), &e);
                tracing::warn!("{}", warning);
                return BatchOutcome::failed(apps, warning);
            }
        };

        let installed: HashSet<String> = manager.normalize(&output);
        tracing::debug!("{} lists {} installed packages", manager, installed.len());

        let results = apps
            .iter()
            .map(|app| {
                let tokens = app.package_tokens();
                let present =
                    !tokens.is_empty() && tokens.iter().all(|token| installed.contains(*token));
                tracing::debug!("{}: {} listing -> {}", app.name, manager, present);
                (app.name.clone(), present)
            })
            .collect();

        BatchOutcome {
            results,
            failure: None,
        }
    }

    /// Verify several batches keyed by manager identifier, one thread each.
    ///
    /// Identifiers that do not name a supported manager fail their batch
    /// without running anything.
    pub fn check_all(
        &self,
        groups: &BTreeMap<String, Vec<&Application>>,
        cancel: &CancelToken,
    ) -> Vec<(String, BatchOutcome)> {
        thread::scope(|scope| {
            let handles: Vec<_> = groups
                .iter()
                .map(|(id, apps)| {
                    let handle = match PackageManagerKind::parse(id) {
                        Ok(kind) => Some(scope.spawn(move || self.check(kind, apps, cancel))),
                        Err(_) => None,
                    };
                    (id, apps, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, apps, handle)| {
                    let outcome = match handle {
                        Some(handle) => handle.join().unwrap_or_else(|_| {
                            let err = PkgsenseError::Other(anyhow::anyhow!(
                                "listing thread panicked"
                            ));
                            BatchOutcome::failed(apps, BatchWarning::new(id, apps.len(), &err))
                        }),
                        None => {
                            let err = PkgsenseError::UnknownPackageManager {
                                manager: id.clone(),
                            };
                            let warning = BatchWarning::new(id, apps.len(), &err);
                            tracing::warn!("{}", warning);
                            BatchOutcome::failed(apps, warning)
                        }
                    };
                    (id.clone(), outcome)
                })
                .collect()
        })
    }
}

impl fmt::Debug for BatchPackageChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchPackageChecker")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
