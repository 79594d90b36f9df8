use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::walker;
use crate::common::errors::CleanupError;
use crate::registry::normalize_extension;

/// A junk file found next to a primary file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Files of one directory keyed by lowercased file name.
///
/// A case-sensitive filesystem can hold `A.out` and `A.OUT` side by side,
/// so one key may map to several paths (in file-name order).
type SiblingIndex = HashMap<String, Vec<PathBuf>>;

/// Probe each primary file's siblings for every junk extension.
///
/// For a primary file `dir/Model.sdb` and extension `out` the candidate is
/// `dir/Model.out`. Names compare case-insensitively, the way the Windows
/// filesystems these models live on behave; the reported path is the one
/// found on disk. Output order is primary file first, then extension.
///
/// Primary files with no directory component are skipped. Duplicates are
/// kept: two primaries sharing a base name each report the same sibling.
pub fn derive_candidates<S: AsRef<str>>(
    primary_files: &[PathBuf],
    junk_extensions: &[S],
) -> Result<Vec<CandidateFile>, CleanupError> {
    let extensions: Vec<String> = junk_extensions
        .iter()
        .map(|e| normalize_extension(e.as_ref()))
        .collect();

    let mut indexes: HashMap<PathBuf, SiblingIndex> = HashMap::new();
    let mut candidates = Vec::new();

    for primary in primary_files {
        let Some(dir) = primary.parent().filter(|d| !d.as_os_str().is_empty()) else {
            tracing::debug!("skipping {}: no directory component", primary.display());
            continue;
        };
        let Some(stem) = walker::base_name_of(primary) else {
            continue;
        };

        if !indexes.contains_key(dir) {
            indexes.insert(dir.to_path_buf(), index_dir(dir)?);
        }
        let siblings = &indexes[dir];

        for ext in &extensions {
            let key = format!("{}.{}", stem, ext);
            for path in siblings.get(&key).into_iter().flatten() {
                if let Some(size_bytes) = regular_file_size(path) {
                    tracing::debug!("candidate {} ({} bytes)", path.display(), size_bytes);
                    candidates.push(CandidateFile {
                        path: path.clone(),
                        size_bytes,
                    });
                }
            }
        }
    }

    Ok(candidates)
}

/// Sum of candidate sizes
pub fn total_size(candidates: &[CandidateFile]) -> u64 {
    candidates.iter().map(|c| c.size_bytes).sum()
}

fn index_dir(dir: &Path) -> Result<SiblingIndex, CleanupError> {
    let mut index = SiblingIndex::new();
    for path in walker::list_dir(dir)?.files {
        if let Some(name) = path.file_name() {
            index
                .entry(name.to_string_lossy().to_lowercase())
                .or_default()
                .push(path);
        }
    }
    Ok(index)
}

fn regular_file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_primary_without_directory_is_skipped() {
        let primaries = vec![PathBuf::from("Model.sdb")];
        let found = derive_candidates(&primaries, &["out"]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_missing_sibling_is_not_a_candidate() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("Model.sdb");
        std::fs::write(&model, b"model").unwrap();

        let found = derive_candidates(&[model], &["out", "log"]).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_sibling_size_is_recorded() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("Model.sdb");
        std::fs::write(&model, b"model").unwrap();
        std::fs::write(dir.path().join("Model.out"), b"0123456789").unwrap();

        let found = derive_candidates(&[model], &["OUT"]).unwrap();
        assert_eq!(
            found,
            vec![CandidateFile {
                path: dir.path().join("Model.out"),
                size_bytes: 10,
            }]
        );
        assert_eq!(total_size(&found), 10);
    }

    #[test]
    fn test_directory_named_like_a_sibling_is_ignored() {
        let dir = TempDir::new().unwrap();
        let model = dir.path().join("Model.sdb");
        std::fs::write(&model, b"model").unwrap();
        std::fs::create_dir(dir.path().join("Model.msh")).unwrap();

        assert!(derive_candidates(&[model], &["msh"]).unwrap().is_empty());
    }

    #[test]
    fn test_order_is_primary_then_extension() {
        let dir = TempDir::new().unwrap();
        for name in ["B.sdb", "A.edb", "B.log", "B.out", "A.log", "A.out"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }
        let primaries = vec![dir.path().join("B.sdb"), dir.path().join("A.edb")];

        let found = derive_candidates(&primaries, &["out", "log"]).unwrap();
        let names: Vec<String> = found
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["B.out", "B.log", "A.out", "A.log"]);
    }

    #[test]
    fn test_extension_only_primary_finds_extension_only_sibling() {
        let dir = TempDir::new().unwrap();
        for name in [".sdb", ".OUT", "Other.OUT"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }

        let found = derive_candidates(&[dir.path().join(".sdb")], &["out"]).unwrap();
        assert_eq!(
            found,
            vec![CandidateFile {
                path: dir.path().join(".OUT"),
                size_bytes: 4,
            }]
        );
    }

    #[test]
    fn test_shared_base_name_reports_duplicates() {
        let dir = TempDir::new().unwrap();
        for name in ["M.sdb", "M.edb", "M.log"] {
            std::fs::write(dir.path().join(name), name).unwrap();
        }
        let primaries = vec![dir.path().join("M.sdb"), dir.path().join("M.edb")];

        let found = derive_candidates(&primaries, &["log"]).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], found[1]);
    }
}
