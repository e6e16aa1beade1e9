//! Data models for kanboard
//!
//! Defines the stored records (Account, Board, List, Card) and the transient
//! login Token. Records serialize with camelCase field names and millisecond
//! timestamps, which is the layout of the document file and of the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The three levels of the board hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Board,
    List,
    Card,
}

impl ResourceKind {
    /// Human-readable name used in messages
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Board => "Board",
            ResourceKind::List => "List",
            ResourceKind::Card => "Card",
        }
    }

    /// Wire name of the field that references the parent
    pub fn parent_key(&self) -> &'static str {
        match self {
            ResourceKind::Board => "userId",
            ResourceKind::List => "boardId",
            ResourceKind::Card => "listId",
        }
    }

    /// The stored parent kind, if the parent is a stored record.
    ///
    /// Boards are scoped by a free-form user id that is never checked.
    pub fn parent(&self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Board => None,
            ResourceKind::List => Some(ResourceKind::Board),
            ResourceKind::Card => Some(ResourceKind::List),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A record that lives somewhere in the board hierarchy
pub trait Resource {
    const KIND: ResourceKind;

    /// Unique identifier
    fn id(&self) -> &str;

    /// Value of the parent-reference field
    fn parent_id(&self) -> &str;
}

/// A login account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact match on both halves of the credential
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// A board owned (loosely) by a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// When this board was created
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Free-form scoping key
    pub user_id: String,
}

impl Board {
    /// Create a new board with a fresh id and the current time
    pub fn new(name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now_millis(),
            user_id: user_id.into(),
        }
    }
}

impl Resource for Board {
    const KIND: ResourceKind = ResourceKind::Board;

    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> &str {
        &self.user_id
    }
}

/// A list on a board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: String,
    pub name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub board_id: String,
}

impl List {
    pub fn new(name: impl Into<String>, board_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            created_at: now_millis(),
            board_id: board_id.into(),
        }
    }
}

impl Resource for List {
    const KIND: ResourceKind = ResourceKind::List;

    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> &str {
        &self.board_id
    }
}

/// A card in a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    /// Card content
    pub data: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub list_id: String,
}

impl Card {
    pub fn new(data: impl Into<String>, list_id: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            data: data.into(),
            created_at: now_millis(),
            list_id: list_id.into(),
        }
    }
}

impl Resource for Card {
    const KIND: ResourceKind = ResourceKind::Card;

    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> &str {
        &self.list_id
    }
}

/// Result of a successful login.
///
/// Not persisted and never checked again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub username: String,
    pub token: String,
}

impl Token {
    /// Issue a fresh random token for `username`
    pub fn issue(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: Uuid::new_v4().to_string(),
        }
    }
}

/// Confirmation returned by delete operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub id: String,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time truncated to the millisecond precision the document keeps
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_new() {
        let board = Board::new("Sprint 1", "u1");
        assert_eq!(board.name, "Sprint 1");
        assert_eq!(board.user_id, "u1");
        assert!(Uuid::parse_str(&board.id).is_ok());
        assert_eq!(board.parent_id(), "u1");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = List::new("Todo", "b1");
        let b = List::new("Todo", "b1");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_board_wire_format() {
        let board = Board::new("Sprint 1", "u1");
        let value = serde_json::to_value(&board).unwrap();

        assert_eq!(value["userId"], "u1");
        assert_eq!(value["name"], "Sprint 1");
        assert_eq!(value["createdAt"], board.created_at.timestamp_millis());
        assert!(value.get("user_id").is_none());
    }

    #[test]
    fn test_card_survives_reparse() {
        let card = Card::new("write docs", "l1");
        let json = serde_json::to_string(&card).unwrap();
        let parsed: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, card);
    }

    #[test]
    fn test_list_parses_camel_case_layout() {
        let json = r#"{"id":"x","boardId":"b","name":"Doing","createdAt":1546300800000}"#;
        let list: List = serde_json::from_str(json).unwrap();
        assert_eq!(list.board_id, "b");
        assert_eq!(list.created_at.timestamp(), 1_546_300_800);
    }

    #[test]
    fn test_resource_kind_parents() {
        assert_eq!(ResourceKind::Board.parent(), None);
        assert_eq!(ResourceKind::List.parent(), Some(ResourceKind::Board));
        assert_eq!(ResourceKind::Card.parent(), Some(ResourceKind::List));
        assert_eq!(ResourceKind::Card.parent_key(), "listId");
        assert_eq!(format!("{}", ResourceKind::List), "List");
    }

    #[test]
    fn test_account_matches() {
        let account = Account::new("sid", "123");
        assert!(account.matches("sid", "123"));
        assert!(!account.matches("sid", "1234"));
        assert!(!account.matches("Sid", "123"));
    }

    #[test]
    fn test_tokens_differ() {
        let a = Token::issue("sid");
        let b = Token::issue("sid");
        assert_eq!(a.username, "sid");
        assert_ne!(a.token, b.token);
    }
}
