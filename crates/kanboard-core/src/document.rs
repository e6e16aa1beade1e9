//! The persisted document
//!
//! One JSON object holding every collection the service knows about:
//!
//! ```json
//! { "accounts": [], "boards": [], "lists": [], "cards": [], "tokens": [] }
//! ```
//!
//! Each collection is an ordered sequence; order is insertion order. Records
//! are typed at the boundary: the whole document is deserialized into
//! [`Document`] on load, so a malformed record fails the load instead of
//! leaking into a query.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{Account, Board, Card, List, Token};

/// Names of the collections in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Accounts,
    Boards,
    Lists,
    Cards,
    Tokens,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Accounts,
        Collection::Boards,
        Collection::Lists,
        Collection::Cards,
        Collection::Tokens,
    ];

    /// Key of the collection in the document file
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Accounts => "accounts",
            Collection::Boards => "boards",
            Collection::Lists => "lists",
            Collection::Cards => "cards",
            Collection::Tokens => "tokens",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// All collections, in their on-disk shape.
///
/// Missing keys load as empty collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Document {
    pub accounts: Vec<Account>,
    pub boards: Vec<Board>,
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
    /// Reserved; nothing writes here
    pub tokens: Vec<Token>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in a collection
    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Accounts => self.accounts.len(),
            Collection::Boards => self.boards.len(),
            Collection::Lists => self.lists.len(),
            Collection::Cards => self.cards.len(),
            Collection::Tokens => self.tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Collection::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Decode a document from JSON bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Encode the document as pretty-printed JSON
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// A record type stored in exactly one collection of the [`Document`]
pub trait Record: Clone + Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn slot(doc: &Document) -> &Vec<Self>;

    fn slot_mut(doc: &mut Document) -> &mut Vec<Self>;
}

impl Record for Account {
    const COLLECTION: Collection = Collection::Accounts;

    fn slot(doc: &Document) -> &Vec<Self> {
        &doc.accounts
    }

    fn slot_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.accounts
    }
}

impl Record for Board {
    const COLLECTION: Collection = Collection::Boards;

    fn slot(doc: &Document) -> &Vec<Self> {
        &doc.boards
    }

    fn slot_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.boards
    }
}

impl Record for List {
    const COLLECTION: Collection = Collection::Lists;

    fn slot(doc: &Document) -> &Vec<Self> {
        &doc.lists
    }

    fn slot_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.lists
    }
}

impl Record for Card {
    const COLLECTION: Collection = Collection::Cards;

    fn slot(doc: &Document) -> &Vec<Self> {
        &doc.cards
    }

    fn slot_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.cards
    }
}

impl Record for Token {
    const COLLECTION: Collection = Collection::Tokens;

    fn slot(doc: &Document) -> &Vec<Self> {
        &doc.tokens
    }

    fn slot_mut(doc: &mut Document) -> &mut Vec<Self> {
        &mut doc.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_empty() {
        let doc = Document::new();
        assert!(doc.is_empty());
        for collection in Collection::ALL {
            assert_eq!(doc.len(collection), 0);
        }
    }

    #[test]
    fn test_encoding_has_all_collections() {
        let bytes = Document::new().to_vec().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        for collection in Collection::ALL {
            assert!(value[collection.name()].is_array(), "missing {}", collection);
        }
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let doc = Document::from_slice(br#"{"accounts":[{"username":"sid","password":"123"}]}"#)
            .unwrap();
        assert_eq!(doc.accounts.len(), 1);
        assert!(doc.boards.is_empty());
        assert!(doc.tokens.is_empty());
    }

    #[test]
    fn test_malformed_record_is_rejected() {
        // A board without a name does not fit the typed collection
        let result = Document::from_slice(br#"{"boards":[{"id":"b1","userId":"u1"}]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_slots_route_to_collections() {
        let mut doc = Document::new();
        Board::slot_mut(&mut doc).push(Board::new("A", "u1"));
        List::slot_mut(&mut doc).push(List::new("Todo", "b1"));

        assert_eq!(Board::slot(&doc).len(), 1);
        assert_eq!(doc.len(Collection::Lists), 1);
        assert_eq!(doc.len(Collection::Cards), 0);
        assert_eq!(<Card as Record>::COLLECTION.name(), "cards");
    }
}
