//! Errors raised while reading or writing `db.json`
//!
//! Every filesystem failure records which step of the load/save cycle it
//! happened in, so a message reads "cannot replace '…/db.json'" rather than
//! a bare OS error.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Step of the document load/save cycle that touched the filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    /// Reading `db.json` on open
    Read,
    /// Creating the data directory
    CreateDir,
    /// Writing the temp file next to `db.json`
    Write,
    /// fsync of the temp file
    Sync,
    /// Renaming the temp file over `db.json`
    Replace,
    /// Copying an unreadable document aside
    Backup,
}

impl fmt::Display for IoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoStage::Read => "read",
            IoStage::CreateDir => "create directory",
            IoStage::Write => "write",
            IoStage::Sync => "flush",
            IoStage::Replace => "replace",
            IoStage::Backup => "back up to",
        })
    }
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot {stage} '{path}': permission denied")]
    PermissionDenied {
        stage: IoStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot {stage} '{path}': no space left on device")]
    NoSpace {
        stage: IoStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot {stage} '{path}': {source}")]
    Io {
        stage: IoStage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `db.json` exists but is not a kanboard document
    #[error("'{path}' is not a valid kanboard document ({details}); original kept at '{backup_path}'")]
    CorruptDocument {
        path: PathBuf,
        backup_path: PathBuf,
        details: String,
    },

    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Fragments of OS messages that mean the volume is full
const NO_SPACE_HINTS: &[&str] = &["no space left", "disk full", "quota exceeded"];

impl StorageError {
    /// Wrap an I/O failure from `stage` on `path`
    pub fn io(stage: IoStage, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            return StorageError::PermissionDenied {
                stage,
                path,
                source,
            };
        }

        let text = source.to_string().to_lowercase();
        if NO_SPACE_HINTS.iter().any(|hint| text.contains(hint)) {
            StorageError::NoSpace {
                stage,
                path,
                source,
            }
        } else {
            StorageError::Io {
                stage,
                path,
                source,
            }
        }
    }

    /// The load/save step that failed, for filesystem errors
    pub fn stage(&self) -> Option<IoStage> {
        match self {
            StorageError::PermissionDenied { stage, .. }
            | StorageError::NoSpace { stage, .. }
            | StorageError::Io { stage, .. } => Some(*stage),
            StorageError::CorruptDocument { .. } | StorageError::Encode(_) => None,
        }
    }

    /// One line telling the operator what to do next
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            StorageError::PermissionDenied { .. } => Some(
                "Make the data directory writable for this user, or point KANBOARD_DATA_DIR elsewhere.",
            ),
            StorageError::NoSpace { .. } => Some("Free up disk space and run the command again."),
            StorageError::CorruptDocument { .. } => {
                Some("Fix or remove db.json; the backup next to it holds the original bytes.")
            }
            StorageError::Io {
                stage: IoStage::CreateDir,
                ..
            } => Some("Check that the parent of the data directory exists."),
            _ => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_keeps_stage() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = StorageError::io(IoStage::Replace, "/data/db.json", source);

        assert!(matches!(err, StorageError::PermissionDenied { .. }));
        assert_eq!(err.stage(), Some(IoStage::Replace));
        assert_eq!(
            err.to_string(),
            "Cannot replace '/data/db.json': permission denied"
        );
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_full_disk_is_detected_from_message() {
        let source = io::Error::new(io::ErrorKind::Other, "No space left on device (os error 28)");
        let err = StorageError::io(IoStage::Write, "/data/db.tmp", source);

        assert!(matches!(err, StorageError::NoSpace { .. }));
        assert!(err.to_string().starts_with("Cannot write '/data/db.tmp'"));
    }

    #[test]
    fn test_other_failures_carry_os_text() {
        let source = io::Error::new(io::ErrorKind::Other, "device busy");
        let err = StorageError::io(IoStage::Read, "/data/db.json", source);

        assert!(matches!(err, StorageError::Io { .. }));
        assert_eq!(err.to_string(), "Cannot read '/data/db.json': device busy");
        assert!(err.recovery_suggestion().is_none());
    }

    #[test]
    fn test_create_dir_failure_has_suggestion() {
        let source = io::Error::new(io::ErrorKind::NotFound, "no such directory");
        let err = StorageError::io(IoStage::CreateDir, "/missing/kanboard", source);

        assert_eq!(err.stage(), Some(IoStage::CreateDir));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_corrupt_document_display() {
        let err = StorageError::CorruptDocument {
            path: PathBuf::from("/data/db.json"),
            backup_path: PathBuf::from("/data/db.json.corrupt.backup"),
            details: "expected value at line 1 column 1".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("not a valid kanboard document"));
        assert!(msg.contains("/data/db.json.corrupt.backup"));
        assert_eq!(err.stage(), None);
    }
}
