use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::common::errors::CleanupError;
use crate::registry::normalize_extension;

/// Immediate contents of one directory, each list sorted by file name
#[derive(Debug, Default)]
pub struct DirListing {
    pub files: Vec<PathBuf>,
    pub subdirs: Vec<PathBuf>,
}

/// Make sure `root` exists, is a directory and can be listed
pub fn check_root(root: &Path) -> Result<(), CleanupError> {
    let metadata = std::fs::metadata(root).map_err(|e| CleanupError::path(root, e))?;
    if !metadata.is_dir() {
        return Err(CleanupError::not_a_directory(root));
    }
    std::fs::read_dir(root).map_err(|e| CleanupError::path(root, e))?;
    Ok(())
}

/// List the files and subdirectories directly inside `dir`.
///
/// Symlinks to files count as files. Symlinks to directories are not
/// followed, so a link loop can never be entered.
pub fn list_dir(dir: &Path) -> Result<DirListing, CleanupError> {
    let mut listing = DirListing::default();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
            CleanupError::path(path, e.into())
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            listing.subdirs.push(entry.into_path());
        } else if file_type.is_file() || (file_type.is_symlink() && entry.path().is_file()) {
            listing.files.push(entry.into_path());
        }
    }

    Ok(listing)
}

/// Find every file under `root` whose extension is in `extensions`.
///
/// Extensions compare case-insensitively and may be given with or without
/// the leading dot. Matches directly in a directory come before matches in
/// its subdirectories, and subdirectories are visited in file-name order,
/// so the output is deterministic for a given tree.
///
/// An empty extension set yields an empty result without touching the
/// filesystem. Any directory that cannot be listed fails the whole search.
pub fn find_files<S: AsRef<str>>(
    root: &Path,
    extensions: &[S],
    recursive: bool,
) -> Result<Vec<PathBuf>, CleanupError> {
    let wanted: HashSet<String> = extensions
        .iter()
        .map(|e| normalize_extension(e.as_ref()))
        .filter(|e| !e.is_empty())
        .collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    check_root(root)?;

    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        tracing::debug!("listing {}", dir.display());
        let listing = list_dir(&dir)?;

        found.extend(
            listing
                .files
                .into_iter()
                .filter(|path| has_extension(path, &wanted)),
        );

        if recursive {
            // Reversed so the first subdirectory is popped next
            pending.extend(listing.subdirs.into_iter().rev());
        }
    }

    Ok(found)
}

fn has_extension(path: &Path, wanted: &HashSet<String>) -> bool {
    extension_of(path)
        .map(|ext| wanted.contains(&ext))
        .unwrap_or(false)
}

/// Lowercased extension of `path`, without the dot.
///
/// A name that is nothing but an extension (`.sdb`) counts as one, with an
/// empty base name. `Path::extension` treats it as a hidden file instead.
fn extension_of(path: &Path) -> Option<String> {
    match path.extension() {
        Some(ext) => Some(ext.to_string_lossy().to_lowercase()),
        None => bare_extension(path),
    }
}

/// Lowercased file name of `path` without its extension
pub(crate) fn base_name_of(path: &Path) -> Option<String> {
    if bare_extension(path).is_some() {
        return Some(String::new());
    }
    path.file_stem().map(|stem| stem.to_string_lossy().to_lowercase())
}

fn bare_extension(path: &Path) -> Option<String> {
    if path.extension().is_some() {
        return None;
    }
    let name = path.file_name()?.to_string_lossy();
    name.strip_prefix('.')
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_has_extension_ignores_case() {
        let wanted: HashSet<String> = ["sdb".to_string()].into_iter().collect();
        assert!(has_extension(Path::new("/p/Model.SDB"), &wanted));
        assert!(has_extension(Path::new("/p/Model.sdb"), &wanted));
        assert!(!has_extension(Path::new("/p/Model.sdb.bak"), &wanted));
        assert!(!has_extension(Path::new("/p/sdb"), &wanted));
    }

    #[test]
    fn test_name_that_is_only_an_extension() {
        let wanted: HashSet<String> = ["sdb".to_string()].into_iter().collect();
        assert!(has_extension(Path::new("/p/.SDB"), &wanted));
        assert!(!has_extension(Path::new("/p/.sdbx"), &wanted));
        assert_eq!(base_name_of(Path::new("/p/.sdb")).as_deref(), Some(""));
        assert_eq!(base_name_of(Path::new("/p/Frame.SDB")).as_deref(), Some("frame"));
        assert_eq!(base_name_of(Path::new("/p/a.b.sdb")).as_deref(), Some("a.b"));
    }

    #[test]
    fn test_find_files_matches_extension_only_name() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(".sdb"));
        touch(&dir.path().join(".gitignore"));

        let found = find_files(dir.path(), &[".SDB"], false).unwrap();
        assert_eq!(found, vec![dir.path().join(".sdb")]);
    }

    #[test]
    fn test_list_dir_splits_files_and_dirs() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("a.txt"));
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let listing = list_dir(dir.path()).unwrap();
        assert_eq!(
            listing.files,
            vec![dir.path().join("a.txt"), dir.path().join("b.txt")]
        );
        assert_eq!(listing.subdirs, vec![dir.path().join("sub")]);
    }

    #[test]
    fn test_empty_extension_set_returns_nothing() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.sdb"));
        let none: [&str; 0] = [];
        assert!(find_files(dir.path(), &none, true).unwrap().is_empty());
    }

    #[test]
    fn test_check_root_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("model.sdb");
        touch(&file);
        assert!(matches!(check_root(&file), Err(CleanupError::Path { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlinks_are_not_followed() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("real/m.sdb"));
        std::os::unix::fs::symlink(dir.path(), dir.path().join("real/loop")).unwrap();

        let found = find_files(dir.path(), &["sdb"], true).unwrap();
        assert_eq!(found, vec![dir.path().join("real/m.sdb")]);
    }
}
