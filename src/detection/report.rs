//! The output of one detection pass.

use crate::catalog::{SoftwareItem, SuiteStatus};
use crate::detection::batch::BatchWarning;
use crate::detection::stats::PerformanceStats;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Results, suite states, warnings and statistics of a pass.
///
/// Built fresh for every pass; nothing carries over between passes.
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub started_at: DateTime<Utc>,

    /// Leaf application name to installed state.
    pub results: HashMap<String, bool>,

    /// Suite name to derived state.
    pub suites: BTreeMap<String, SuiteStatus>,

    pub warnings: Vec<BatchWarning>,

    pub stats: PerformanceStats,
}

impl DetectionReport {
    pub(crate) fn new(
        started_at: DateTime<Utc>,
        items: &[SoftwareItem],
        results: HashMap<String, bool>,
        warnings: Vec<BatchWarning>,
        stats: PerformanceStats,
    ) -> Self {
        let suites = items
            .iter()
            .filter_map(|item| match item {
                SoftwareItem::Suite(suite) => {
                    Some((suite.name.clone(), suite.status_from(&results)))
                }
                SoftwareItem::Application(_) => None,
            })
            .collect();

        Self {
            started_at,
            results,
            suites,
            warnings,
            stats,
        }
    }

    /// Installed state of a leaf application, `false` when unknown.
    pub fn is_installed(&self, name: &str) -> bool {
        self.results.get(name).copied().unwrap_or(false)
    }

    pub fn suite_status(&self, name: &str) -> Option<SuiteStatus> {
        self.suites.get(name).copied()
    }

    pub fn installed_count(&self) -> usize {
        self.results.values().filter(|v| **v).count()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
