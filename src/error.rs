//! Error types for pkgsense operations.
//!
//! This module defines [`PkgsenseError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Catalog and configuration problems are returned to the caller as errors
//! - Package-manager listing failures never abort a detection pass; the batch
//!   checker turns them into warnings and degrades the affected items to
//!   "not installed"
//! - Use `anyhow::Error` (via `PkgsenseError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pkgsense operations.
#[derive(Debug, Error)]
pub enum PkgsenseError {
    /// The package manager identifier is not one we know how to query.
    #[error("Unsupported package manager: {manager}")]
    UnknownPackageManager { manager: String },

    /// The listing command could not be spawned or exited unsuccessfully.
    #[error("Listing command `{command}` for {manager} failed (exit code {code:?}): {message}")]
    ListingFailed {
        manager: String,
        command: String,
        code: Option<i32>,
        message: String,
    },

    /// The listing command did not finish before its deadline.
    #[error("Listing command `{command}` for {manager} timed out after {timeout_secs}s")]
    ListingTimedOut {
        manager: String,
        command: String,
        timeout_secs: u64,
    },

    /// The detection pass was abandoned by the caller.
    #[error("Detection pass was cancelled")]
    Cancelled,

    /// Catalog file not found at expected location.
    #[error("Catalog not found: {path}")]
    CatalogNotFound { path: PathBuf },

    /// Failed to parse the catalog file.
    #[error("Failed to parse catalog at {path}: {message}")]
    CatalogParseError { path: PathBuf, message: String },

    /// Catalog parsed but contains invalid entries.
    #[error("Invalid catalog: {message}")]
    CatalogValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for pkgsense operations.
pub type Result<T> = std::result::Result<T, PkgsenseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_package_manager_displays_name() {
        let err = PkgsenseError::UnknownPackageManager {
            manager: "portage".into(),
        };
        assert!(err.to_string().contains("portage"));
    }

    #[test]
    fn listing_failed_displays_command_and_code() {
        let err = PkgsenseError::ListingFailed {
            manager: "apt".into(),
            command: "dpkg -l".into(),
            code: Some(2),
            message: "dpkg: error".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("dpkg -l"));
        assert!(msg.contains("apt"));
        assert!(msg.contains("2"));
        assert!(msg.contains("dpkg: error"));
    }

    #[test]
    fn listing_timed_out_displays_timeout() {
        let err = PkgsenseError::ListingTimedOut {
            manager: "brew".into(),
            command: "brew list".into(),
            timeout_secs: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("brew list"));
        assert!(msg.contains("30s"));
    }

    #[test]
    fn catalog_parse_error_displays_path_and_message() {
        let err = PkgsenseError::CatalogParseError {
            path: PathBuf::from("/catalog.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/catalog.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: PkgsenseError = io_err.into();
        assert!(matches!(err, PkgsenseError::Io(_)));
    }
}
