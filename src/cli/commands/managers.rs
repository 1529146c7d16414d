//! Managers command implementation.
//!
//! The `pkgsense managers` command lists the supported package managers,
//! the listing command each one runs, and which one this host uses.

use crate::detection::{PackageManagerKind, SearchPath};
use crate::error::Result;
use crate::ui::{PkgsenseTheme, Table, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The managers command implementation.
pub struct ManagersCommand {
    search_path: SearchPath,
}

impl ManagersCommand {
    /// Create a managers command looking at the process `PATH`.
    pub fn new() -> Self {
        Self::with_search_path(SearchPath::from_env())
    }

    pub fn with_search_path(search_path: SearchPath) -> Self {
        Self { search_path }
    }
}

impl Default for ManagersCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for ManagersCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let theme = PkgsenseTheme::detect();
        let detected = PackageManagerKind::detect(&self.search_path);

        ui.show_header("Supported package managers");

        let mut table = Table::new(&["ID", "Name", "Listing command", ""]);
        for kind in PackageManagerKind::all() {
            let marker = if Some(*kind) == detected {
                theme.success.apply_to("● detected").to_string()
            } else {
                String::new()
            };
            table.add_row(vec![
                kind.id().to_string(),
                kind.display_name().to_string(),
                theme.command.apply_to(kind.listing_command_line()).to_string(),
                marker,
            ]);
        }
        ui.message(&table.render());

        match detected {
            Some(kind) => ui.success(&format!("This host uses {}", kind.display_name())),
            None => ui.warning("No supported package manager found on PATH"),
        }

        Ok(CommandResult::success())
    }
}
