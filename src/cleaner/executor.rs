use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::scanner::CandidateFile;

/// Report from a deletion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionOutcome {
    pub attempted: usize,
    pub deleted: usize,
    pub failed: usize,
    /// Recorded sizes of the files actually removed
    pub bytes_freed: u64,
    pub failures: Vec<DeletionFailure>,
}

/// A file that could not be removed, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub error: String,
}

impl DeletionOutcome {
    /// True when every attempted file was removed
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Permanently delete every candidate. There is no undo.
///
/// The caller is responsible for asking the user first.
pub fn delete_all(candidates: &[CandidateFile]) -> DeletionOutcome {
    delete_all_with(candidates, |path| std::fs::remove_file(path))
}

/// Delete candidates in order using `remove` for each file.
///
/// A failure is recorded and the batch moves on; nothing is retried. Sizes
/// come from the scan snapshot since a removed file can no longer be
/// measured, and only successful removals count towards `bytes_freed`.
pub fn delete_all_with<F>(candidates: &[CandidateFile], mut remove: F) -> DeletionOutcome
where
    F: FnMut(&Path) -> std::io::Result<()>,
{
    let mut outcome = DeletionOutcome {
        attempted: candidates.len(),
        ..Default::default()
    };

    for candidate in candidates {
        match remove(&candidate.path) {
            Ok(()) => {
                outcome.deleted += 1;
                outcome.bytes_freed += candidate.size_bytes;
            }
            Err(e) => {
                tracing::warn!("failed to delete {}: {}", candidate.path.display(), e);
                outcome.failed += 1;
                outcome.failures.push(DeletionFailure {
                    path: candidate.path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "deleted {} of {} files ({} bytes freed)",
        outcome.deleted,
        outcome.attempted,
        outcome.bytes_freed
    );

    outcome
}
