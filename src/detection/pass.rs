//! Handle to a detection pass running on a worker thread.

use crate::detection::report::DetectionReport;
use crate::error::{PkgsenseError, Result};
use crate::shell::CancelToken;
use std::thread::JoinHandle;

/// A pass started with [`TwoLayerPackageChecker::spawn`].
///
/// Cancelling kills any running listing command; the pass then finishes
/// promptly and [`wait`](PassHandle::wait) reports [`PkgsenseError::Cancelled`].
///
/// [`TwoLayerPackageChecker::spawn`]: crate::detection::TwoLayerPackageChecker::spawn
#[derive(Debug)]
pub struct PassHandle {
    handle: JoinHandle<DetectionReport>,
    cancel: CancelToken,
}

impl PassHandle {
    pub(crate) fn new(handle: JoinHandle<DetectionReport>, cancel: CancelToken) -> Self {
        Self { handle, cancel }
    }

    /// Abandon the pass.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Whether the worker has finished, without blocking.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Block until the pass finishes.
    pub fn wait(self) -> Result<DetectionReport> {
        let report = self.handle.join().map_err(|_| {
            PkgsenseError::Other(anyhow::anyhow!("detection worker panicked"))
        })?;

        if self.cancel.is_cancelled() {
            return Err(PkgsenseError::Cancelled);
        }
        Ok(report)
    }
}
