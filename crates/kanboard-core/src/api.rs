//! Named operations and the response envelope
//!
//! A request is a JSON object naming an operation and its arguments:
//!
//! ```json
//! { "operation": "createList", "args": { "name": "Todo", "boardId": "..." } }
//! ```
//!
//! Arguments that are absent become empty strings, so they are reported by
//! the managers as invalid input rather than as a parse failure. Every reply
//! uses the same envelope:
//!
//! ```json
//! { "status": "success", "message": "List created", "data": { ... } }
//! { "status": "error", "code": "NOT_FOUND", "message": "Board does not exist: ..." }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::KanboardError;

/// A request that could not be turned into an operation
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Malformed request: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Argument '{0}' must be a string")]
    NotAString(String),
}

impl RequestError {
    pub fn code(&self) -> &'static str {
        "BAD_REQUEST"
    }
}

/// Raw wire shape before the operation name is resolved
#[derive(Debug, Deserialize)]
struct Envelope {
    operation: String,
    #[serde(default)]
    args: Map<String, Value>,
}

/// One named operation with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Login { username: String, password: String },
    ListBoards { user_id: String },
    ListLists { board_id: String },
    ListCards { list_id: String },
    CreateBoard { name: String, user_id: String },
    DeleteBoard { id: String },
    CreateList { name: String, board_id: String },
    DeleteList { id: String },
    CreateCard { data: String, list_id: String },
    DeleteCard { id: String },
}

impl Request {
    /// Parse a request from JSON text
    pub fn parse(input: &str) -> Result<Self, RequestError> {
        let envelope: Envelope = serde_json::from_str(input)?;
        Self::from_envelope(envelope)
    }

    fn from_envelope(envelope: Envelope) -> Result<Self, RequestError> {
        let args = Args(&envelope.args);

        // The short names are the query names clients already use
        let request = match envelope.operation.as_str() {
            "login" => Request::Login {
                username: args.get("username")?,
                password: args.get("password")?,
            },
            "listBoards" | "boards" => Request::ListBoards {
                user_id: args.get("userId")?,
            },
            "listLists" | "lists" => Request::ListLists {
                board_id: args.get("boardId")?,
            },
            "listCards" | "cards" => Request::ListCards {
                list_id: args.get("listId")?,
            },
            "createBoard" => Request::CreateBoard {
                name: args.get("name")?,
                user_id: args.get("userId")?,
            },
            "deleteBoard" => Request::DeleteBoard {
                id: args.get("id")?,
            },
            "createList" => Request::CreateList {
                name: args.get("name")?,
                board_id: args.get("boardId")?,
            },
            "deleteList" => Request::DeleteList {
                id: args.get("id")?,
            },
            "createCard" => Request::CreateCard {
                data: args.get("data")?,
                list_id: args.get("listId")?,
            },
            "deleteCard" => Request::DeleteCard {
                id: args.get("id")?,
            },
            other => return Err(RequestError::UnknownOperation(other.to_string())),
        };

        Ok(request)
    }

    /// Canonical operation name
    pub fn operation(&self) -> &'static str {
        match self {
            Request::Login { .. } => "login",
            Request::ListBoards { .. } => "listBoards",
            Request::ListLists { .. } => "listLists",
            Request::ListCards { .. } => "listCards",
            Request::CreateBoard { .. } => "createBoard",
            Request::DeleteBoard { .. } => "deleteBoard",
            Request::CreateList { .. } => "createList",
            Request::DeleteList { .. } => "deleteList",
            Request::CreateCard { .. } => "createCard",
            Request::DeleteCard { .. } => "deleteCard",
        }
    }

    /// Whether the operation changes the document
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Request::Login { .. }
                | Request::ListBoards { .. }
                | Request::ListLists { .. }
                | Request::ListCards { .. }
        )
    }
}

struct Args<'a>(&'a Map<String, Value>);

impl Args<'_> {
    /// String argument; absent or null reads as empty
    fn get(&self, key: &str) -> Result<String, RequestError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(RequestError::NotAString(key.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Reply to one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Response {
    pub fn success(message: impl Into<String>, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self {
                status: Status::Success,
                code: None,
                message: message.into(),
                data: Some(data),
            },
            Err(e) => Self::error("INTERNAL_SERVER_ERROR", e.to_string()),
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            code: Some(code.into()),
            message: message.into(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Compact JSON text of the envelope
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| encode_failure(&e.to_string()))
    }
}

/// Error envelope text for a response that could not be serialized
fn encode_failure(message: &str) -> String {
    serde_json::json!({
        "status": "error",
        "code": "INTERNAL_SERVER_ERROR",
        "message": message,
    })
    .to_string()
}

impl From<KanboardError> for Response {
    fn from(err: KanboardError) -> Self {
        Response::error(err.code(), err.to_string())
    }
}

impl From<RequestError> for Response {
    fn from(err: RequestError) -> Self {
        Response::error(err.code(), err.to_string())
    }
}
