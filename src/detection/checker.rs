//! Two-layer detection orchestrator.
//!
//! A pass flattens the catalog into leaf applications, settles what it can
//! from the filesystem (Layer 2), then sends the rest to one listing per
//! package manager (Layer 3) and merges the two.

use crate::catalog::{Application, SoftwareItem};
use crate::config::DetectionSettings;
use crate::detection::adapter::PackageManagerKind;
use crate::detection::batch::{BatchOutcome, BatchPackageChecker, BatchWarning};
use crate::detection::heuristics::HeuristicTable;
use crate::detection::lister::{CommandLister, PackageLister};
use crate::detection::pass::PassHandle;
use crate::detection::quick::QuickVerificationChecker;
use crate::detection::report::DetectionReport;
use crate::detection::search_path::SearchPath;
use crate::detection::stats::PerformanceStats;
use crate::error::Result;
use crate::shell::CancelToken;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Manager label used in warnings when nothing could be detected.
const NO_MANAGER: &str = "none";

/// Runs detection passes and keeps the statistics of the latest one.
#[derive(Debug, Clone)]
pub struct TwoLayerPackageChecker {
    active_manager: Option<String>,
    quick: QuickVerificationChecker,
    batch: BatchPackageChecker,
    last_stats: Arc<Mutex<Option<PerformanceStats>>>,
}

impl TwoLayerPackageChecker {
    /// Create a checker with the built-in heuristics and default timeout.
    pub fn new(
        active_manager: Option<String>,
        search_path: SearchPath,
        lister: Arc<dyn PackageLister>,
    ) -> Self {
        Self {
            active_manager,
            quick: QuickVerificationChecker::new(search_path, HeuristicTable::builtin()),
            batch: BatchPackageChecker::new(
                lister,
                Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            ),
            last_stats: Arc::new(Mutex::new(None)),
        }
    }

    /// Build a checker for this host from detection settings.
    ///
    /// The search path is `PATH`, then `extra_paths`, then version manager
    /// directories when enabled. Without a configured manager the host's
    /// manager is detected from that search path.
    pub fn from_settings(settings: &DetectionSettings) -> Self {
        let mut search_path = SearchPath::from_env();
        search_path.extend(settings.expanded_extra_paths());
        if settings.probe_version_managers {
            search_path = search_path.with_version_managers();
        }

        let active_manager = settings.package_manager.clone().or_else(|| {
            let detected = PackageManagerKind::detect(&search_path);
            match detected {
                Some(kind) => tracing::debug!("Detected package manager: {}", kind),
                None => tracing::debug!("No supported package manager detected"),
            }
            detected.map(|kind| kind.id().to_string())
        });

        Self::new(active_manager, search_path, Arc::new(CommandLister::new()))
            .with_heuristics(HeuristicTable::builtin().with_overrides(&settings.heuristics))
            .with_timeout(settings.timeout())
    }

    /// Replace the heuristic table.
    pub fn with_heuristics(mut self, heuristics: HeuristicTable) -> Self {
        self.quick = QuickVerificationChecker::new(self.quick.search_path().clone(), heuristics);
        self
    }

    /// Set the deadline for each listing command.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.batch = self.batch.with_timeout(timeout);
        self
    }

    pub fn active_manager(&self) -> Option<&str> {
        self.active_manager.as_deref()
    }

    /// Statistics of the most recent completed pass.
    pub fn stats(&self) -> Option<PerformanceStats> {
        self.last_stats.lock().ok().and_then(|stats| stats.clone())
    }

    /// Run a pass on the calling thread.
    pub fn check(&self, items: &[SoftwareItem]) -> DetectionReport {
        self.run(items, &CancelToken::new())
    }

    /// Run a pass on a worker thread.
    pub fn spawn(&self, items: Vec<SoftwareItem>) -> Result<PassHandle> {
        let checker = self.clone();
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let handle = thread::Builder::new()
            .name("pkgsense-pass".to_string())
            .spawn(move || checker.run(&items, &token))?;
        Ok(PassHandle::new(handle, cancel))
    }

    /// Run a pass, aborting Layer 3 when `cancel` fires.
    pub fn run(&self, items: &[SoftwareItem], cancel: &CancelToken) -> DetectionReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let leaves = unique_leaves(items);
        tracing::debug!("Checking {} applications", leaves.len());

        let l2_start = Instant::now();
        let quick = self.quick.verify(&leaves);
        let l2_time = l2_start.elapsed();

        let l3_start = Instant::now();
        let (groups, unmanaged) = self.group_by_manager(&quick.unresolved);
        let mut outcomes = self.batch.check_all(&groups, cancel);
        if !unmanaged.is_empty() {
            outcomes.push((NO_MANAGER.to_string(), unmanaged_outcome(&unmanaged)));
        }
        let l3_time = if quick.unresolved.is_empty() {
            Duration::ZERO
        } else {
            l3_start.elapsed()
        };

        // name -> (installed, batch succeeded)
        let mut layer3: HashMap<&str, (bool, bool)> = HashMap::new();
        let mut warnings = Vec::new();
        for (_, outcome) in &outcomes {
            for (name, installed) in &outcome.results {
                layer3.insert(name.as_str(), (*installed, outcome.succeeded()));
            }
            if let Some(warning) = &outcome.failure {
                warnings.push(warning.clone());
            }
        }

        let mut results = HashMap::with_capacity(leaves.len());
        let mut overrides = 0;
        for app in &leaves {
            let verdict = quick.resolved.get(&app.name);
            let checked = layer3.get(app.name.as_str()).copied();

            let installed = match (verdict, checked) {
                (Some(v), _) if !v.is_tentative() => v.installed,
                (Some(v), Some((listed, true))) => {
                    if listed != v.installed {
                        tracing::debug!(
                            "{}: package manager overrides heuristic ({} -> {})",
                            app.name,
                            v.installed,
                            listed
                        );
                        overrides += 1;
                    }
                    listed
                }
                (Some(v), _) => v.installed,
                (None, Some((listed, _))) => listed,
                (None, None) => false,
            };
            results.insert(app.name.clone(), installed);
        }

        let stats = PerformanceStats {
            total_items: leaves.len(),
            l2_resolved: quick.final_count(),
            l3_checked: quick.unresolved.len(),
            l3_overrides: overrides,
            l2_time,
            l3_time,
            total_time: start.elapsed(),
        };
        tracing::info!("{}", stats);

        if let Ok(mut last) = self.last_stats.lock() {
            *last = Some(stats.clone());
        }

        DetectionReport::new(started_at, items, results, warnings, stats)
    }

    /// Group forwarded items by effective manager, canonicalizing known ids.
    fn group_by_manager<'a>(
        &self,
        apps: &[&'a Application],
    ) -> (BTreeMap<String, Vec<&'a Application>>, Vec<&'a Application>) {
        let mut groups: BTreeMap<String, Vec<&'a Application>> = BTreeMap::new();
        let mut unmanaged = Vec::new();

        for app in apps {
            let Some(id) = app.manager.as_deref().or(self.active_manager.as_deref()) else {
                unmanaged.push(*app);
                continue;
            };
            let key = PackageManagerKind::parse(id)
                .map(|kind| kind.id().to_string())
                .unwrap_or_else(|_| id.trim().to_ascii_lowercase());
            groups.entry(key).or_default().push(*app);
        }

        (groups, unmanaged)
    }
}

/// Leaf applications in catalog order, first occurrence of a name wins.
fn unique_leaves(items: &[SoftwareItem]) -> Vec<&Application> {
    let mut seen = HashSet::new();
    items
        .iter()
        .flat_map(|item| item.leaves().iter())
        .filter(|app| seen.insert(app.name.as_str()))
        .collect()
}

fn unmanaged_outcome(apps: &[&Application]) -> BatchOutcome {
    let warning = BatchWarning {
        manager: NO_MANAGER.to_string(),
        item_count: apps.len(),
        error: "no package manager configured or detected".to_string(),
    };
    tracing::warn!("{}", warning);
    BatchOutcome {
        results: apps.iter().map(|a| (a.name.clone(), false)).collect(),
        failure: Some(warning),
    }
}
