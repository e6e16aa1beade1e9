//! Storage layer
//!
//! Handles persistence of the JSON document.
//!
//! ## Architecture
//!
//! - **Document**: typed collections held in memory, the source of truth
//! - **db.json**: the document serialized in full after every mutation
//!
//! Writes go through a temp file and a rename, so the file on disk is always
//! either the previous or the next complete document.

pub mod error;
pub mod persistence;

pub use error::{IoStage, StorageError, StorageResult};
pub use persistence::JsonPersistence;
