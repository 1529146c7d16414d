//! Check command implementation.
//!
//! The `pkgsense check` command loads a catalog, runs one detection pass on
//! a worker thread and reports which items are installed.

use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, SoftwareItem, DEFAULT_CATALOG_FILE};
use crate::cli::args::CheckArgs;
use crate::config::DetectionSettings;
use crate::detection::{DetectionReport, TwoLayerPackageChecker};
use crate::error::{PkgsenseError, Result};
use crate::ui::{PkgsenseTheme, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// Exit code when the catalog cannot be used.
const EXIT_BAD_CATALOG: i32 = 2;

/// The check command implementation.
pub struct CheckCommand {
    working_dir: PathBuf,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(working_dir: &Path, args: CheckArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            args,
        }
    }

    /// Catalog path, relative paths resolved against the working directory.
    pub fn catalog_path(&self) -> PathBuf {
        let path = self
            .args
            .catalog
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_FILE));
        if path.is_absolute() {
            path
        } else {
            self.working_dir.join(path)
        }
    }

    /// Catalog settings with command-line overrides applied.
    fn effective_settings(&self, catalog: &Catalog) -> Result<DetectionSettings> {
        let mut settings = catalog.settings.clone();
        if let Some(manager) = &self.args.manager {
            settings.package_manager = Some(manager.clone());
        }
        if let Some(timeout) = self.args.timeout {
            settings.timeout_secs = timeout;
        }
        if self.args.probe_version_managers {
            settings.probe_version_managers = true;
        }
        settings.validate()?;
        Ok(settings)
    }

    fn render_table(&self, catalog: &Catalog, report: &DetectionReport) -> String {
        let theme = PkgsenseTheme::detect();
        let mut table = Table::new(&["Software", "Package", "Status"]);

        for item in &catalog.items {
            match item {
                SoftwareItem::Application(app) => table.add_row(vec![
                    app.name.clone(),
                    app.package.clone(),
                    theme.format_installed(app.installed),
                ]),
                SoftwareItem::Suite(suite) => {
                    let status = report
                        .suite_status(&suite.name)
                        .unwrap_or_else(|| suite.status());
                    table.add_row(vec![
                        theme.highlight.apply_to(&suite.name).to_string(),
                        theme
                            .dim
                            .apply_to(format!(
                                "{}/{} components",
                                suite.installed_components().len(),
                                suite.components.len()
                            ))
                            .to_string(),
                        theme.format_suite_status(status),
                    ]);
                    for component in &suite.components {
                        table.add_row(vec![
                            format!("  └ {}", component.name),
                            component.package.clone(),
                            theme.format_installed(component.installed),
                        ]);
                    }
                }
            }
        }

        table.render()
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = self.catalog_path();
        let mut catalog = match Catalog::load(&path) {
            Ok(catalog) => catalog,
            Err(e @ PkgsenseError::CatalogNotFound { .. }) => {
                ui.error(&format!("{}", e));
                ui.message(&format!(
                    "Create {} or pass a catalog path: pkgsense check <CATALOG>",
                    DEFAULT_CATALOG_FILE
                ));
                return Ok(CommandResult::failure(EXIT_BAD_CATALOG));
            }
            Err(
                e @ (PkgsenseError::CatalogParseError { .. }
                | PkgsenseError::CatalogValidationError { .. }),
            ) => {
                ui.error(&format!("{}", e));
                return Ok(CommandResult::failure(EXIT_BAD_CATALOG));
            }
            Err(e) => return Err(e),
        };

        let settings = match self.effective_settings(&catalog) {
            Ok(settings) => settings,
            Err(e) => {
                ui.error(&format!("{}", e));
                return Ok(CommandResult::failure(EXIT_BAD_CATALOG));
            }
        };

        let checker = TwoLayerPackageChecker::from_settings(&settings);
        let leaf_count = catalog.leaves().count();

        if !self.args.json {
            ui.show_header(&format!("Checking {}", path.display()));
        }

        let mut spinner = ui.start_spinner(&format!(
            "Checking {} applications via {}...",
            leaf_count,
            checker.active_manager().unwrap_or("filesystem only")
        ));
        let report = match checker.spawn(catalog.items.clone()).and_then(|h| h.wait()) {
            Ok(report) => {
                spinner.finish_clear();
                report
            }
            Err(e) => {
                spinner.finish_error("Detection failed");
                return Err(e);
            }
        };

        catalog.apply_results(&report.results);

        if self.args.json {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| PkgsenseError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        ui.message(&self.render_table(&catalog, &report));
        ui.message("");

        for warning in &report.warnings {
            ui.warning(&warning.to_string());
        }

        let theme = PkgsenseTheme::detect();
        if ui.output_mode().shows_details() {
            ui.message(&theme.dim.apply_to(report.stats.to_string()).to_string());
        }
        ui.success(&format!(
            "{} of {} applications installed",
            report.installed_count(),
            report.results.len()
        ));

        Ok(CommandResult::success())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn args(catalog: &str) -> CheckArgs {
        CheckArgs {
            catalog: Some(PathBuf::from(catalog)),
            ..Default::default()
        }
    }

    /// Project dir with a `bin/` holding fake `git` and a catalog that
    /// resolves everything from executables.
    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("git"), "#!/bin/sh\n").unwrap();
        fs::set_permissions(bin.join("git"), fs::Permissions::from_mode(0o755)).unwrap();

        let catalog = format!(
            r#"
settings:
  package_manager: pacman
  extra_paths: ["{}"]
software:
  - {{ name: Git, package: git, executables: [git] }}
  - {{ name: Ghost, package: ghost, executables: [ghost-bin-xyz] }}
  - name: Tools
    components:
      - {{ name: Git again, package: git, executables: [git] }}
      - {{ name: Nothing, package: nothing, executables: [nothing-xyz] }}
"#,
            bin.display()
        );
        fs::write(temp.path().join("pkgsense.yml"), catalog).unwrap();
        temp
    }

    #[test]
    fn catalog_path_defaults_to_working_dir() {
        let cmd = CheckCommand::new(Path::new("/work"), CheckArgs::default());
        assert_eq!(cmd.catalog_path(), PathBuf::from("/work/pkgsense.yml"));

        let cmd = CheckCommand::new(Path::new("/work"), args("/etc/tools.yml"));
        assert_eq!(cmd.catalog_path(), PathBuf::from("/etc/tools.yml"));
    }

    #[test]
    fn missing_catalog_exits_2() {
        let temp = TempDir::new().unwrap();
        let cmd = CheckCommand::new(temp.path(), CheckArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("Catalog not found"));
    }

    #[test]
    fn invalid_catalog_exits_2() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.yml"), "software: [").unwrap();
        let cmd = CheckCommand::new(temp.path(), args("bad.yml"));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("Failed to parse catalog"));
    }

    #[test]
    fn zero_timeout_flag_exits_2() {
        let temp = setup();
        let cmd = CheckCommand::new(
            temp.path(),
            CheckArgs {
                timeout: Some(0),
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("timeout_secs"));
    }

    #[test]
    fn reports_table_and_summary() {
        let temp = setup();
        let cmd = CheckCommand::new(temp.path(), CheckArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        let table = &ui.messages()[0];
        assert!(table.contains("Git"));
        assert!(table.contains("✓ installed"));
        assert!(table.contains("✗ missing"));
        assert!(table.contains("partial"));
        assert!(ui.has_success("2 of 4 applications installed"));
        assert!(ui.warnings().is_empty());
        assert_eq!(ui.spinners().len(), 1);
    }

    #[test]
    fn json_output_is_the_report() {
        let temp = setup();
        let cmd = CheckCommand::new(
            temp.path(),
            CheckArgs {
                json: true,
                ..Default::default()
            },
        );
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let json: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(json["results"]["Git"], true);
        assert_eq!(json["results"]["Ghost"], false);
        assert_eq!(json["suites"]["Tools"], "partial");
        assert_eq!(json["stats"]["l2_hit_rate"], 100.0);
        assert!(ui.headers().is_empty());
    }
}
