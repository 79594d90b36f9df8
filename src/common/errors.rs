use std::path::PathBuf;

/// Errors that stop a scan or a deletion run before it starts.
///
/// Per-file deletion problems are not errors at this level: they are
/// tallied into [`crate::cleaner::DeletionOutcome`] and the batch carries on.
/// We use `anyhow` at the top level for CLI error handling,
/// but these typed errors let callers react to each failure kind.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    /// Nothing was selected (no application, or nothing scanned yet)
    #[error("{message}")]
    Configuration { message: String },

    /// Scan root is missing, not a directory, or cannot be listed
    #[error("cannot scan '{}': {source}", .path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another scan or deletion is already running on this engine
    #[error("a scan or deletion is already in progress")]
    Busy,
}

impl CleanupError {
    pub fn no_applications() -> Self {
        CleanupError::Configuration {
            message: "Please select at least one application".to_string(),
        }
    }

    pub fn path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanupError::Path {
            path: path.into(),
            source,
        }
    }

    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory");
        CleanupError::Path { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = CleanupError::no_applications();
        assert_eq!(err.to_string(), "Please select at least one application");
    }

    #[test]
    fn test_path_error_names_path() {
        let err = CleanupError::not_a_directory("/tmp/model.sdb");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/model.sdb"));
        assert!(msg.contains("not a directory"));
    }

    #[test]
    fn test_path_error_keeps_source() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CleanupError::path("/nope", io);
        assert!(err.source().is_some());
    }
}
