//! Scan-to-delete cycle with a single operation in flight.
//!
//! The engine keeps the candidates of the most recent scan until they are
//! deleted or replaced by the next scan. Starting a scan or deletion while
//! another one is running is rejected with [`CleanupError::Busy`].

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cleaner::{self, DeletionOutcome};
use crate::common::errors::CleanupError;
use crate::scanner::{self, ScanRequest, ScanResults};

#[derive(Debug, Default)]
pub struct Engine {
    busy: AtomicBool,
    last_scan: Mutex<Option<ScanResults>>,
}

/// Clears the busy flag when the operation ends, including on error
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan and keep the results for a later [`Engine::delete_last_scan`].
    ///
    /// Previous results are dropped first, so a failed scan leaves nothing
    /// to delete.
    pub fn scan(&self, request: &ScanRequest) -> Result<ScanResults, CleanupError> {
        let _guard = self.begin()?;
        self.slot().take();

        let results = scanner::scan(request)?;
        *self.slot() = Some(results.clone());
        Ok(results)
    }

    /// Results of the last successful scan, if not yet deleted
    pub fn last_scan(&self) -> Option<ScanResults> {
        self.slot().clone()
    }

    /// Delete every candidate from the last scan. There is no undo.
    pub fn delete_last_scan(&self) -> Result<DeletionOutcome, CleanupError> {
        self.delete_last_scan_with(|path| std::fs::remove_file(path))
    }

    /// Like [`Engine::delete_last_scan`] with a custom removal step
    pub fn delete_last_scan_with<F>(&self, remove: F) -> Result<DeletionOutcome, CleanupError>
    where
        F: FnMut(&Path) -> std::io::Result<()>,
    {
        let _guard = self.begin()?;
        let results = self
            .slot()
            .take()
            .ok_or_else(|| CleanupError::Configuration {
                message: "Nothing to delete: run a scan first".to_string(),
            })?;

        Ok(cleaner::delete_all_with(&results.candidates, remove))
    }

    fn begin(&self) -> Result<BusyGuard<'_>, CleanupError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CleanupError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    fn slot(&self) -> MutexGuard<'_, Option<ScanResults>> {
        self.last_scan.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Application;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Frame.sdb"), b"model").unwrap();
        std::fs::write(dir.path().join("Frame.OUT"), b"12345").unwrap();
        std::fs::write(dir.path().join("Frame.Y00"), b"123").unwrap();
        dir
    }

    #[test]
    fn test_delete_without_scan_is_rejected() {
        let engine = Engine::new();
        let err = engine.delete_last_scan().unwrap_err();
        assert!(matches!(err, CleanupError::Configuration { .. }));
    }

    #[test]
    fn test_scan_then_delete_consumes_results() {
        let dir = project();
        let engine = Engine::new();
        let results = engine
            .scan(&ScanRequest::new(dir.path(), [Application::Sap2000]))
            .unwrap();
        assert_eq!(results.candidates.len(), 2);
        assert!(engine.last_scan().is_some());

        let outcome = engine.delete_last_scan().unwrap();
        assert_eq!(outcome.deleted, 2);
        assert_eq!(outcome.bytes_freed, 8);
        assert!(engine.last_scan().is_none());
        assert!(dir.path().join("Frame.sdb").exists());
    }

    #[test]
    fn test_failed_scan_discards_previous_results() {
        let dir = project();
        let engine = Engine::new();
        engine
            .scan(&ScanRequest::new(dir.path(), [Application::Sap2000]))
            .unwrap();

        let missing = dir.path().join("missing");
        assert!(engine
            .scan(&ScanRequest::new(missing, [Application::Sap2000]))
            .is_err());
        assert!(engine.last_scan().is_none());
    }

    #[test]
    fn test_second_operation_while_busy_is_rejected() {
        let dir = project();
        let engine = Engine::new();
        let request = ScanRequest::new(dir.path(), [Application::Sap2000]);
        engine.scan(&request).unwrap();

        let mut nested = None;
        let outcome = engine
            .delete_last_scan_with(|_| {
                nested = Some(engine.scan(&request));
                Ok(())
            })
            .unwrap();

        assert_eq!(outcome.deleted, 2);
        assert!(matches!(nested, Some(Err(CleanupError::Busy))));
        // Flag is released once the deletion returns
        assert!(engine.scan(&request).is_ok());
    }
}
