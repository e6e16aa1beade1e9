//! Document store
//!
//! The `Store` owns the in-memory [`Document`] and writes it back to disk
//! after every mutation. It knows nothing about boards or accounts beyond
//! which collection a record type lives in; validation rules belong to the
//! managers built on top of it.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open_with_config(Config::load()?)?;
//!
//! store.append(Board::new("Sprint 1", "u1"))?;
//! let boards: Vec<Board> = store.filter(|b: &Board| b.user_id == "u1");
//! let removed = store.remove_where(|b: &Board| b.id == id)?;
//! ```

use tracing::debug;

use crate::config::Config;
use crate::document::{Collection, Document, Record};
use crate::storage::{JsonPersistence, StorageResult};

/// Persisted collection store
pub struct Store {
    doc: Document,
    persistence: JsonPersistence,
    config: Config,
}

impl Store {
    /// Open the store with a specific configuration
    ///
    /// On first run the document file is created with empty collections.
    pub fn open_with_config(config: Config) -> StorageResult<Self> {
        let persistence = JsonPersistence::new(config.clone());
        let doc = persistence.load_or_create()?;

        debug!(
            "Opened document {:?}: {} boards, {} lists, {} cards",
            config.document_path(),
            doc.len(Collection::Boards),
            doc.len(Collection::Lists),
            doc.len(Collection::Cards)
        );

        Ok(Self {
            doc,
            persistence,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read-only view of the whole document
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Every record in the collection, in insertion order
    pub fn get<R: Record>(&self) -> Vec<R> {
        R::slot(&self.doc).clone()
    }

    /// Records matching `predicate`, in insertion order
    pub fn filter<R, P>(&self, predicate: P) -> Vec<R>
    where
        R: Record,
        P: Fn(&R) -> bool,
    {
        R::slot(&self.doc)
            .iter()
            .filter(|&r| predicate(r))
            .cloned()
            .collect()
    }

    /// Whether any record matches `predicate`
    pub fn any<R, P>(&self, predicate: P) -> bool
    where
        R: Record,
        P: Fn(&R) -> bool,
    {
        R::slot(&self.doc).iter().any(predicate)
    }

    /// Number of records in the collection
    pub fn count<R: Record>(&self) -> usize {
        R::slot(&self.doc).len()
    }

    /// Append a record and persist.
    ///
    /// If the write fails the record is dropped from memory again, so the
    /// in-memory document never runs ahead of the file.
    pub fn append<R: Record>(&mut self, record: R) -> StorageResult<()> {
        R::slot_mut(&mut self.doc).push(record);

        if let Err(e) = self.persistence.save(&self.doc) {
            R::slot_mut(&mut self.doc).pop();
            return Err(e);
        }

        debug!("Appended record to {}", R::COLLECTION);
        Ok(())
    }

    /// Remove every record matching `predicate` and persist.
    ///
    /// Returns how many records were removed. Nothing is written when no
    /// record matched.
    pub fn remove_where<R, P>(&mut self, predicate: P) -> StorageResult<usize>
    where
        R: Record,
        P: Fn(&R) -> bool,
    {
        let slot = R::slot_mut(&mut self.doc);
        let before = slot.clone();
        slot.retain(|r| !predicate(r));
        let removed = before.len() - slot.len();

        if removed == 0 {
            return Ok(0);
        }

        if let Err(e) = self.persistence.save(&self.doc) {
            *R::slot_mut(&mut self.doc) = before;
            return Err(e);
        }

        debug!("Removed {} record(s) from {}", removed, R::COLLECTION);
        Ok(removed)
    }

    /// Size of the document file in bytes
    pub fn document_size(&self) -> u64 {
        self.persistence.document_size().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Board, List};
    use crate::storage::{IoStage, StorageError};
    use std::fs;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config::with_data_dir(temp_dir.path())
    }

    /// Replace db.json with a non-empty directory so the next save cannot
    /// rename over it
    fn block_document(config: &Config) {
        let path = config.document_path();
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), b"x").unwrap();
    }

    #[test]
    fn test_open_creates_document() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let store = Store::open_with_config(config.clone()).unwrap();

        assert!(config.document_path().exists());
        assert!(store.document().is_empty());
        assert!(store.document_size() > 0);
    }

    #[test]
    fn test_append_and_get_preserve_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        store.append(Board::new("one", "u1")).unwrap();
        store.append(Board::new("two", "u1")).unwrap();
        store.append(Board::new("three", "u1")).unwrap();

        let names: Vec<String> = store.get::<Board>().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_filter_by_field() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        store.append(List::new("Todo", "b1")).unwrap();
        store.append(List::new("Other", "b2")).unwrap();
        store.append(List::new("Done", "b1")).unwrap();

        let lists = store.filter(|l: &List| l.board_id == "b1");
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].name, "Todo");
        assert_eq!(lists[1].name, "Done");
        assert!(store.any(|l: &List| l.board_id == "b2"));
        assert!(!store.any(|l: &List| l.board_id == "b3"));
    }

    #[test]
    fn test_remove_where_counts() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let keep = Board::new("keep", "u1");
        let gone = Board::new("gone", "u1");
        store.append(keep.clone()).unwrap();
        store.append(gone.clone()).unwrap();

        assert_eq!(store.remove_where(|b: &Board| b.id == gone.id).unwrap(), 1);
        assert_eq!(store.remove_where(|b: &Board| b.id == gone.id).unwrap(), 0);
        assert_eq!(store.get::<Board>(), vec![keep]);
    }

    #[test]
    fn test_append_rolls_back_when_save_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();
        block_document(&config);

        let err = store.append(Board::new("lost", "u1")).unwrap_err();

        assert!(matches!(err, StorageError::Io { stage: IoStage::Replace, .. }));
        assert_eq!(store.count::<Board>(), 0);
    }

    #[test]
    fn test_remove_where_restores_when_save_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();
        let board = Board::new("kept", "u1");
        store.append(board.clone()).unwrap();
        block_document(&config);

        assert!(store.remove_where(|b: &Board| b.id == board.id).is_err());
        assert_eq!(store.get::<Board>(), vec![board]);
    }

    #[test]
    fn test_collections_are_independent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        store.append(Account::new("sid", "123")).unwrap();
        store.append(Board::new("A", "sid")).unwrap();

        assert_eq!(store.count::<Account>(), 1);
        assert_eq!(store.count::<Board>(), 1);
        assert_eq!(store.count::<List>(), 0);
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let board = Board::new("Persistent", "u1");
        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store.append(board.clone()).unwrap();
            store.append(List::new("Todo", &board.id)).unwrap();
        }

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            assert_eq!(store.get::<Board>(), vec![board.clone()]);
            assert_eq!(store.count::<List>(), 1);
            store.remove_where(|b: &Board| b.id == board.id).unwrap();
        }

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.count::<Board>(), 0);
        assert_eq!(store.count::<List>(), 1);
    }
}
