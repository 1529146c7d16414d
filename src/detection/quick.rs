//! Layer 2: resolve items from the filesystem without spawning processes.

use crate::catalog::Application;
use crate::detection::heuristics::HeuristicTable;
use crate::detection::search_path::SearchPath;
use serde::Serialize;
use std::collections::HashMap;

/// Where a Layer 2 verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// Catalog-declared executables. Authoritative.
    Executables,
    /// Built-in or user heuristic table.
    Heuristic { weak: bool },
}

/// A Layer 2 decision about one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub installed: bool,
    pub source: VerdictSource,
}

impl Verdict {
    /// Whether Layer 3 should confirm this verdict.
    pub fn is_tentative(&self) -> bool {
        matches!(self.source, VerdictSource::Heuristic { weak: true })
    }
}

/// Result of running Layer 2 over a set of applications.
#[derive(Debug, Default)]
pub struct QuickOutcome<'a> {
    /// Every verdict reached, tentative ones included.
    pub resolved: HashMap<String, Verdict>,

    /// Applications Layer 3 must look at: no verdict, or a tentative one.
    pub unresolved: Vec<&'a Application>,
}

impl QuickOutcome<'_> {
    /// Number of items settled without Layer 3.
    pub fn final_count(&self) -> usize {
        self.resolved.values().filter(|v| !v.is_tentative()).count()
    }
}

/// Checks applications against the search path and heuristic table.
#[derive(Debug, Clone)]
pub struct QuickVerificationChecker {
    search_path: SearchPath,
    heuristics: HeuristicTable,
}

impl QuickVerificationChecker {
    pub fn new(search_path: SearchPath, heuristics: HeuristicTable) -> Self {
        Self {
            search_path,
            heuristics,
        }
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Verify each application, splitting verdicts from forwarded items.
    pub fn verify<'a>(&self, apps: &[&'a Application]) -> QuickOutcome<'a> {
        let mut outcome = QuickOutcome::default();

        for app in apps {
            match self.verify_one(app) {
                Some(verdict) => {
                    if verdict.is_tentative() {
                        outcome.unresolved.push(app);
                    }
                    outcome.resolved.insert(app.name.clone(), verdict);
                }
                None => outcome.unresolved.push(app),
            }
        }

        tracing::debug!(
            "Layer 2: {} settled, {} forwarded",
            outcome.final_count(),
            outcome.unresolved.len()
        );
        outcome
    }

    /// Verify one application. `None` means Layer 2 cannot tell.
    pub fn verify_one(&self, app: &Application) -> Option<Verdict> {
        if app.has_executables() {
            let installed = self.search_path.any_resolves(&app.executables);
            tracing::debug!(
                "{}: executables {:?} -> {}",
                app.name,
                app.executables,
                installed
            );
            return Some(Verdict {
                installed,
                source: VerdictSource::Executables,
            });
        }

        let tokens = app.package_tokens();
        if tokens.is_empty() {
            return None;
        }

        let mut weak = false;
        for token in &tokens {
            let Some(entry) = self.heuristics.get(token) else {
                tracing::debug!("{}: no heuristic for '{}'", app.name, token);
                return None;
            };
            if !self.search_path.any_resolves(&entry.binaries) {
                tracing::debug!("{}: heuristic miss for '{}'", app.name, token);
                return None;
            }
            weak |= entry.weak;
        }

        tracing::debug!("{}: heuristic hit (weak: {})", app.name, weak);
        Some(Verdict {
            installed: true,
            source: VerdictSource::Heuristic { weak },
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn bin_dir(binaries: &[&str]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for bin in binaries {
            let path = temp.path().join(bin);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        temp
    }

    fn checker(dir: &TempDir) -> QuickVerificationChecker {
        QuickVerificationChecker::new(
            SearchPath::new(vec![dir.path().to_path_buf()]),
            HeuristicTable::builtin(),
        )
    }

    #[test]
    fn executables_found_is_authoritative_true() {
        let dir = bin_dir(&["git"]);
        let app = Application::new("Git", "git").with_executables(["git"]);
        let verdict = checker(&dir).verify_one(&app).unwrap();
        assert!(verdict.installed);
        assert_eq!(verdict.source, VerdictSource::Executables);
        assert!(!verdict.is_tentative());
    }

    #[test]
    fn executables_missing_is_authoritative_false() {
        let dir = bin_dir(&[]);
        let app = Application::new("Git", "git").with_executables(["git"]);
        let verdict = checker(&dir).verify_one(&app).unwrap();
        assert!(!verdict.installed);
        assert_eq!(verdict.source, VerdictSource::Executables);
    }

    #[test]
    fn any_executable_is_enough() {
        let dir = bin_dir(&["fdfind"]);
        let app = Application::new("fd", "fd-find").with_executables(["fd", "fdfind"]);
        assert!(checker(&dir).verify_one(&app).unwrap().installed);
    }

    #[test]
    fn strong_heuristic_hit_is_final() {
        let dir = bin_dir(&["curl"]);
        let app = Application::new("curl", "curl");
        let verdict = checker(&dir).verify_one(&app).unwrap();
        assert!(verdict.installed);
        assert_eq!(verdict.source, VerdictSource::Heuristic { weak: false });
    }

    #[test]
    fn weak_heuristic_hit_is_tentative() {
        let dir = bin_dir(&["gcc"]);
        let app = Application::new("Build tools", "build-essential");
        let verdict = checker(&dir).verify_one(&app).unwrap();
        assert!(verdict.installed);
        assert!(verdict.is_tentative());
    }

    #[test]
    fn heuristic_miss_is_unresolved() {
        let dir = bin_dir(&[]);
        let app = Application::new("curl", "curl");
        assert!(checker(&dir).verify_one(&app).is_none());
    }

    #[test]
    fn unknown_token_is_unresolved() {
        let dir = bin_dir(&["git"]);
        let app = Application::new("Ghost", "nonexistent-pkg-xyz");
        assert!(checker(&dir).verify_one(&app).is_none());
    }

    #[test]
    fn every_token_needs_a_hit() {
        let dir = bin_dir(&["node"]);
        let app = Application::new("Node", "nodejs npm");
        assert!(checker(&dir).verify_one(&app).is_none());

        let dir = bin_dir(&["node", "npm"]);
        assert!(checker(&dir).verify_one(&app).unwrap().installed);
    }

    #[test]
    fn user_heuristics_apply() {
        let dir = bin_dir(&["rg"]);
        let mut overrides = BTreeMap::new();
        overrides.insert("ripgrep".to_string(), vec!["rg".to_string()]);
        let checker = QuickVerificationChecker::new(
            SearchPath::new(vec![dir.path().to_path_buf()]),
            HeuristicTable::builtin().with_overrides(&overrides),
        );
        let app = Application::new("ripgrep", "ripgrep");
        assert_eq!(
            checker.verify_one(&app).unwrap().source,
            VerdictSource::Heuristic { weak: false }
        );
    }

    #[test]
    fn verify_splits_outcome() {
        let dir = bin_dir(&["git", "gcc"]);
        let git = Application::new("Git", "git").with_executables(["git"]);
        let ghost = Application::new("Ghost", "nonexistent-pkg-xyz");
        let build = Application::new("Build tools", "build-essential");

        let outcome = checker(&dir).verify(&[&git, &ghost, &build]);

        assert_eq!(outcome.final_count(), 1);
        assert!(outcome.resolved["Git"].installed);
        assert!(outcome.resolved["Build tools"].is_tentative());
        assert!(!outcome.resolved.contains_key("Ghost"));
        let forwarded: Vec<_> = outcome.unresolved.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(forwarded, vec!["Ghost", "Build tools"]);
    }
}
