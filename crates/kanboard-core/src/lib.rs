//! kanboard core library
//!
//! Boards, lists and cards kept in a single JSON document, plus a minimal
//! credential check.
//!
//! # Architecture
//!
//! - **Store**: typed collections over one persisted document
//! - **HierarchyManager**: Board → List → Card rules (parent must exist on
//!   create, target must exist on delete, no cascade)
//! - **AuthManager**: login and the idempotent default-account seed
//! - **Service**: named requests in, `{status, message, data}` replies out
//!
//! # Quick Start
//!
//! ```text
//! let mut service = Service::open(Config::load()?)?;
//!
//! let board = service.hierarchy().create_board("Sprint 1", "u1")?;
//! let list = service.hierarchy().create_list("Todo", &board.id)?;
//!
//! let reply = service.handle_json(r#"{"operation":"listLists","args":{"boardId":"..."}}"#);
//! ```
//!
//! # Modules
//!
//! - `service`: request dispatch (main entry point)
//! - `api`: request parsing and the response envelope
//! - `hierarchy`: board/list/card operations
//! - `auth`: login and seeding
//! - `store`: collection store over the document
//! - `document`: collections and the `Record` trait
//! - `models`: record types
//! - `storage`: file persistence
//! - `config`: application configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod hierarchy;
pub mod models;
pub mod service;
pub mod storage;
pub mod store;

pub use api::{Request, RequestError, Response, Status};
pub use auth::{AuthManager, SEED_PASSWORD, SEED_USERNAME};
pub use config::Config;
pub use document::{Collection, Document, Record};
pub use error::KanboardError;
pub use hierarchy::HierarchyManager;
pub use models::{Account, Board, Card, Deleted, List, Resource, ResourceKind, Token};
pub use service::Service;
pub use storage::{IoStage, JsonPersistence, StorageError};
pub use store::Store;
