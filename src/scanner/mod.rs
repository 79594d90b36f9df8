pub mod candidates;
pub mod walker;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use crate::common::errors::CleanupError;
use crate::registry::{self, Application};

pub use candidates::CandidateFile;

/// What to scan and for which applications
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub root: PathBuf,
    pub applications: BTreeSet<Application>,
    pub recursive: bool,
}

impl ScanRequest {
    pub fn new(
        root: impl Into<PathBuf>,
        applications: impl IntoIterator<Item = Application>,
    ) -> Self {
        Self {
            root: root.into(),
            applications: applications.into_iter().collect(),
            recursive: true,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }
}

/// Complete scan results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResults {
    /// Directory that was scanned
    pub root: PathBuf,

    /// When the scan was performed
    pub timestamp: DateTime<Utc>,

    /// How long the scan took in seconds
    pub duration_secs: f64,

    /// Model files that drove the search
    pub primary_files: Vec<PathBuf>,

    /// Junk files found, in display order
    pub candidates: Vec<CandidateFile>,

    /// Sum of candidate sizes in bytes
    pub total_bytes: u64,
}

impl ScanResults {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            timestamp: Utc::now(),
            duration_secs: 0.0,
            primary_files: Vec::new(),
            candidates: Vec::new(),
            total_bytes: 0,
        }
    }

    /// Recalculate the byte total from candidates
    pub fn recalculate(&mut self) {
        self.total_bytes = candidates::total_size(&self.candidates);
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Run one scan: find primary files, then their existing junk siblings.
///
/// The selection is checked before the root, so an empty selection is a
/// configuration error even when the path is also bad. No partial results
/// are returned on error.
pub fn scan(request: &ScanRequest) -> Result<ScanResults, CleanupError> {
    let start = Instant::now();

    let profiles = registry::profiles_for(&request.applications)?;
    walker::check_root(&request.root)?;

    let primary_exts = registry::primary_extensions(&profiles);
    let junk_exts = registry::junk_union(&profiles);
    tracing::debug!(
        "scanning {} for {:?} ({} junk extensions)",
        request.root.display(),
        primary_exts,
        junk_exts.len()
    );

    let mut results = ScanResults::new(request.root.clone());
    results.primary_files = walker::find_files(&request.root, &primary_exts, request.recursive)?;
    results.candidates = candidates::derive_candidates(&results.primary_files, &junk_exts)?;
    results.recalculate();
    results.duration_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        "found {} candidates ({} bytes) next to {} model files",
        results.candidates.len(),
        results.total_bytes,
        results.primary_files.len()
    );

    Ok(results)
}
