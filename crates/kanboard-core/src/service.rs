//! Entry point tying the store, the managers and the request contract
//!
//! `Service::open` is the one-time startup step: it opens the document and
//! seeds the default account. After that every request runs to completion
//! against the store before the next one starts.

use anyhow::Context;
use tracing::debug;

use crate::api::{Request, Response};
use crate::auth::AuthManager;
use crate::config::Config;
use crate::error::Result;
use crate::hierarchy::HierarchyManager;
use crate::store::Store;

/// A running kanboard backend over one document
pub struct Service {
    store: Store,
}

impl Service {
    /// Open the document described by `config` and run startup seeding
    pub fn open(config: Config) -> anyhow::Result<Self> {
        let store = Store::open_with_config(config).context("Failed to open document store")?;
        Self::from_store(store)
    }

    /// Wrap an open store, seeding the default account if needed
    pub fn from_store(mut store: Store) -> anyhow::Result<Self> {
        AuthManager::new(&mut store)
            .seed_default_account()
            .context("Failed to seed default account")?;
        Ok(Self { store })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn hierarchy(&mut self) -> HierarchyManager<'_> {
        HierarchyManager::new(&mut self.store)
    }

    pub fn auth(&mut self) -> AuthManager<'_> {
        AuthManager::new(&mut self.store)
    }

    /// Run one request and shape its reply
    pub fn handle(&mut self, request: &Request) -> Response {
        debug!(
            operation = request.operation(),
            mutation = request.is_mutation(),
            "Handling request"
        );
        match self.execute(request) {
            Ok(response) => response,
            Err(e) => e.into(),
        }
    }

    /// Parse and run a JSON request
    pub fn handle_json(&mut self, input: &str) -> Response {
        match Request::parse(input) {
            Ok(request) => self.handle(&request),
            Err(e) => e.into(),
        }
    }

    fn execute(&mut self, request: &Request) -> Result<Response> {
        let response = match request {
            Request::Login { username, password } => Response::success(
                "Authenticated successfully",
                self.auth().login(username, password)?,
            ),
            Request::ListBoards { user_id } => {
                Response::success("Boards fetched", self.hierarchy().list_boards(user_id)?)
            }
            Request::ListLists { board_id } => {
                Response::success("Lists fetched", self.hierarchy().list_lists(board_id)?)
            }
            Request::ListCards { list_id } => {
                Response::success("Cards fetched", self.hierarchy().list_cards(list_id)?)
            }
            Request::CreateBoard { name, user_id } => Response::success(
                "Board created",
                self.hierarchy().create_board(name, user_id)?,
            ),
            Request::DeleteBoard { id } => {
                Response::success("Board deleted", self.hierarchy().delete_board(id)?)
            }
            Request::CreateList { name, board_id } => Response::success(
                "List created",
                self.hierarchy().create_list(name, board_id)?,
            ),
            Request::DeleteList { id } => {
                Response::success("List deleted", self.hierarchy().delete_list(id)?)
            }
            Request::CreateCard { data, list_id } => Response::success(
                "Card created",
                self.hierarchy().create_card(data, list_id)?,
            ),
            Request::DeleteCard { id } => {
                Response::success("Card deleted", self.hierarchy().delete_card(id)?)
            }
        };

        Ok(response)
    }
}
