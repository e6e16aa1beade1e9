//! Document persistence
//!
//! Handles saving and loading the JSON document to/from the filesystem.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/kanboard/db.json` (configurable via `Config`)

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{IoStage, StorageError, StorageResult};
use crate::config::Config;
use crate::document::Document;

/// Persistence layer for the document file
pub struct JsonPersistence {
    config: Config,
}

impl JsonPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Check if a document exists on disk
    pub fn exists(&self) -> bool {
        self.config.document_path().exists()
    }

    /// Save a document to disk using atomic write
    pub fn save(&self, doc: &Document) -> StorageResult<()> {
        let bytes = doc.to_vec()?;
        let target_path = self.config.document_path();

        atomic_write(&target_path, &bytes)?;
        debug!("Saved document to {:?} ({} bytes)", target_path, bytes.len());

        Ok(())
    }

    /// Load a document from disk
    ///
    /// Returns `None` if the document file doesn't exist. A file that exists
    /// but does not parse is copied aside and reported as corrupt.
    pub fn load(&self) -> StorageResult<Option<Document>> {
        let path = self.config.document_path();

        if !path.exists() {
            return Ok(None);
        }

        let bytes =
            fs::read(&path).map_err(|e| StorageError::io(IoStage::Read, path.clone(), e))?;

        match Document::from_slice(&bytes) {
            Ok(doc) => Ok(Some(doc)),
            Err(e) => {
                let backup_path = backup_path_for(&path);
                warn!("Document {:?} does not parse, backing up to {:?}", path, backup_path);
                fs::copy(&path, &backup_path)
                    .map_err(|e| StorageError::io(IoStage::Backup, backup_path.clone(), e))?;
                Err(StorageError::CorruptDocument {
                    path,
                    backup_path,
                    details: e.to_string(),
                })
            }
        }
    }

    /// Load an existing document or create a new one
    ///
    /// If a document exists on disk, it is loaded and returned.
    /// Otherwise, a new empty document is created, saved, and returned.
    pub fn load_or_create(&self) -> StorageResult<Document> {
        if let Some(doc) = self.load()? {
            return Ok(doc);
        }

        let doc = Document::new();
        self.save(&doc)?;
        Ok(doc)
    }

    /// Size of the document file in bytes, if it exists
    pub fn document_size(&self) -> Option<u64> {
        fs::metadata(self.config.document_path())
            .ok()
            .map(|m| m.len())
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".corrupt.backup");
    PathBuf::from(name)
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(IoStage::CreateDir, parent, e))?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .map_err(|e| StorageError::io(IoStage::Write, temp_path.clone(), e))?;

    file.write_all(data)
        .map_err(|e| StorageError::io(IoStage::Write, temp_path.clone(), e))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::io(IoStage::Sync, temp_path.clone(), e))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::io(IoStage::Replace, path, e))?;

    Ok(())
}
