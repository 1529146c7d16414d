//! Catalog data model: applications, suites and derived suite status.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single installable item.
///
/// `package` holds one or more whitespace-separated package-manager tokens;
/// the application counts as installed only when every token is present.
/// `installed` is a cache of the last detection pass and is never consulted
/// by the detection engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    /// Unique display name.
    pub name: String,

    /// Package-manager tokens, e.g. `"nodejs npm"`.
    pub package: String,

    /// Candidate binaries; when non-empty they decide the verdict.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executables: Vec<String>,

    /// Package manager to verify against instead of the active one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Result of the last detection pass applied by the caller.
    #[serde(skip)]
    pub installed: bool,
}

impl Application {
    /// Create an application with no executables configured.
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            executables: Vec::new(),
            manager: None,
            description: String::new(),
            category: String::new(),
            installed: false,
        }
    }

    /// Builder-style setter for configured executables.
    pub fn with_executables<I, S>(mut self, executables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.executables = executables.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style setter for a per-item package manager.
    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = Some(manager.into());
        self
    }

    /// The package tokens, split on whitespace.
    pub fn package_tokens(&self) -> Vec<&str> {
        self.package.split_whitespace().collect()
    }

    /// Whether the catalog author declared executables for this item.
    pub fn has_executables(&self) -> bool {
        self.executables.iter().any(|e| !e.trim().is_empty())
    }
}

/// A named group of applications whose status is always derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationSuite {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Ordered components.
    #[serde(default)]
    pub components: Vec<Application>,
}

impl ApplicationSuite {
    /// Create a suite from its components.
    pub fn new(name: impl Into<String>, components: Vec<Application>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category: String::new(),
            components,
        }
    }

    /// Compute the suite status from a result map.
    ///
    /// Components missing from `results` count as not installed.
    pub fn status_from(&self, results: &HashMap<String, bool>) -> SuiteStatus {
        let installed = self
            .components
            .iter()
            .filter(|c| results.get(&c.name).copied().unwrap_or(false))
            .count();
        SuiteStatus::from_counts(installed, self.components.len())
    }

    /// Compute the suite status from the components' cached `installed` flags.
    pub fn status(&self) -> SuiteStatus {
        let installed = self.components.iter().filter(|c| c.installed).count();
        SuiteStatus::from_counts(installed, self.components.len())
    }

    /// Components not installed according to their cached flags.
    pub fn uninstalled_components(&self) -> Vec<&Application> {
        self.components.iter().filter(|c| !c.installed).collect()
    }

    /// Components installed according to their cached flags.
    pub fn installed_components(&self) -> Vec<&Application> {
        self.components.iter().filter(|c| c.installed).collect()
    }
}

/// Tri-state suite status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteStatus {
    /// No component installed.
    None,
    /// Some but not all components installed.
    Partial,
    /// Every component installed.
    All,
}

impl SuiteStatus {
    /// Derive the status from an installed count.
    ///
    /// An empty suite has nothing installed and reports `None`.
    pub fn from_counts(installed: usize, total: usize) -> Self {
        if installed == 0 {
            SuiteStatus::None
        } else if installed >= total {
            SuiteStatus::All
        } else {
            SuiteStatus::Partial
        }
    }

    /// Whether at least one component is installed.
    pub fn any_installed(&self) -> bool {
        !matches!(self, SuiteStatus::None)
    }
}

impl fmt::Display for SuiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SuiteStatus::None => "none",
            SuiteStatus::Partial => "partial",
            SuiteStatus::All => "all",
        };
        f.write_str(label)
    }
}

/// One entry of an ordered, mixed catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftwareItem {
    Application(Application),
    Suite(ApplicationSuite),
}

impl SoftwareItem {
    /// Display name of the item.
    pub fn name(&self) -> &str {
        match self {
            SoftwareItem::Application(app) => &app.name,
            SoftwareItem::Suite(suite) => &suite.name,
        }
    }

    /// Leaf applications of this item, in order.
    pub fn leaves(&self) -> &[Application] {
        match self {
            SoftwareItem::Application(app) => std::slice::from_ref(app),
            SoftwareItem::Suite(suite) => &suite.components,
        }
    }
}

impl From<Application> for SoftwareItem {
    fn from(app: Application) -> Self {
        SoftwareItem::Application(app)
    }
}

impl From<ApplicationSuite> for SoftwareItem {
    fn from(suite: ApplicationSuite) -> Self {
        SoftwareItem::Suite(suite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite_of(n: usize) -> ApplicationSuite {
        let components = (0..n)
            .map(|i| Application::new(format!("c{}", i), format!("pkg{}", i)))
            .collect();
        ApplicationSuite::new("suite", components)
    }

    fn results(installed: &[&str]) -> HashMap<String, bool> {
        installed.iter().map(|n| (n.to_string(), true)).collect()
    }

    #[test]
    fn package_tokens_split_on_whitespace() {
        let app = Application::new("Node", "  nodejs   npm ");
        assert_eq!(app.package_tokens(), vec!["nodejs", "npm"]);
    }

    #[test]
    fn blank_executables_do_not_count() {
        let app = Application::new("x", "x").with_executables(["", "  "]);
        assert!(!app.has_executables());
        let app = Application::new("x", "x").with_executables(["x"]);
        assert!(app.has_executables());
    }

    #[test]
    fn suite_with_nothing_installed_is_none() {
        let suite = suite_of(3);
        assert_eq!(suite.status_from(&results(&[])), SuiteStatus::None);
    }

    #[test]
    fn suite_with_everything_installed_is_all() {
        let suite = suite_of(3);
        assert_eq!(
            suite.status_from(&results(&["c0", "c1", "c2"])),
            SuiteStatus::All
        );
    }

    #[test]
    fn suite_with_some_installed_is_partial() {
        let suite = suite_of(3);
        assert_eq!(suite.status_from(&results(&["c0"])), SuiteStatus::Partial);
        assert_eq!(
            suite.status_from(&results(&["c0", "c2"])),
            SuiteStatus::Partial
        );
    }

    #[test]
    fn explicit_false_counts_as_not_installed() {
        let suite = suite_of(2);
        let mut map = results(&["c0"]);
        map.insert("c1".to_string(), false);
        assert_eq!(suite.status_from(&map), SuiteStatus::Partial);
    }

    #[test]
    fn empty_suite_is_none() {
        let suite = suite_of(0);
        assert_eq!(suite.status_from(&results(&[])), SuiteStatus::None);
    }

    #[test]
    fn cached_status_uses_component_flags() {
        let mut suite = suite_of(2);
        suite.components[1].installed = true;
        assert_eq!(suite.status(), SuiteStatus::Partial);
        assert_eq!(suite.installed_components().len(), 1);
        assert_eq!(suite.uninstalled_components()[0].name, "c0");
    }

    #[test]
    fn software_item_leaves() {
        let app: SoftwareItem = Application::new("Git", "git").into();
        assert_eq!(app.leaves().len(), 1);
        assert_eq!(app.name(), "Git");

        let suite: SoftwareItem = suite_of(3).into();
        assert_eq!(suite.leaves().len(), 3);
        assert_eq!(suite.name(), "suite");
    }

    #[test]
    fn suite_status_display() {
        assert_eq!(SuiteStatus::None.to_string(), "none");
        assert_eq!(SuiteStatus::Partial.to_string(), "partial");
        assert_eq!(SuiteStatus::All.to_string(), "all");
        assert!(SuiteStatus::Partial.any_installed());
        assert!(!SuiteStatus::None.any_installed());
    }
}
