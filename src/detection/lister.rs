//! Running a manager's listing command.

use crate::detection::adapter::PackageManagerKind;
use crate::error::{PkgsenseError, Result};
use crate::shell::{execute, CancelToken, CommandOptions};
use std::time::Duration;

/// Produces the raw listing output for a package manager.
///
/// Implementations must be callable from several threads at once; Layer 3
/// lists distinct managers concurrently.
pub trait PackageLister: Send + Sync {
    /// Run the listing for `manager` and return its stdout.
    fn list_installed(
        &self,
        manager: PackageManagerKind,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<String>;
}

/// Lists packages by running the real listing command.
#[derive(Debug, Clone, Default)]
pub struct CommandLister;

impl CommandLister {
    pub fn new() -> Self {
        Self
    }
}

impl PackageLister for CommandLister {
    fn list_installed(
        &self,
        manager: PackageManagerKind,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> Result<String> {
        let (program, args) = manager.listing_command();
        let command = manager.listing_command_line();

        let mut options = CommandOptions {
            timeout: Some(timeout),
            cancel: Some(cancel.clone()),
            ..Default::default()
        };
        options.env.insert("LC_ALL".to_string(), "C".to_string());

        tracing::debug!("Running `{}`", command);
        let result = execute(program, args, &options).map_err(|e| match e {
            PkgsenseError::Io(io) => PkgsenseError::ListingFailed {
                manager: manager.id().to_string(),
                command: command.clone(),
                code: None,
                message: io.to_string(),
            },
            other => other,
        })?;

        if result.timed_out {
            return Err(PkgsenseError::ListingTimedOut {
                manager: manager.id().to_string(),
                command,
                timeout_secs: timeout.as_secs(),
            });
        }

        if !result.success {
            let stderr = result.stderr.trim();
            return Err(PkgsenseError::ListingFailed {
                manager: manager.id().to_string(),
                command,
                code: result.exit_code,
                message: if stderr.is_empty() {
                    "no error output".to_string()
                } else {
                    stderr.lines().last().unwrap_or(stderr).to_string()
                },
            });
        }

        tracing::debug!(
            "`{}` finished in {:?} ({} bytes)",
            command,
            result.duration,
            result.stdout.len()
        );
        Ok(result.stdout)
    }
}
