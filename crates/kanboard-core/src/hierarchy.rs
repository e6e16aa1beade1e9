//! Board → List → Card hierarchy
//!
//! Rules enforced here:
//! - required arguments are present and non-empty, checked before the store
//!   is touched
//! - a List needs an existing Board and a Card needs an existing List at the
//!   moment it is created
//! - delete removes the one record with that id and nothing else; children
//!   stay behind and can still be listed by their parent key
//!
//! A Board's `userId` is only a scoping key. It is never checked against the
//! accounts collection.

use tracing::debug;

use crate::document::Record;
use crate::error::{KanboardError, Result};
use crate::models::{Board, Card, Deleted, List, Resource, ResourceKind};
use crate::store::Store;

/// Create, list and delete operations over the hierarchy
pub struct HierarchyManager<'a> {
    store: &'a mut Store,
}

impl<'a> HierarchyManager<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }

    // ==================== Generic ====================

    /// Every `R` whose parent reference equals `parent_id`, in insertion order.
    ///
    /// The parent itself is not looked up; an unknown parent yields an empty
    /// list.
    pub fn list_children<R>(&self, parent_id: &str) -> Result<Vec<R>>
    where
        R: Record + Resource,
    {
        require(&[(R::KIND.parent_key(), parent_id)])?;
        Ok(self.store.filter(|r: &R| r.parent_id() == parent_id))
    }

    /// Store a freshly built record after checking its parent exists
    pub fn create<R>(&mut self, record: R) -> Result<R>
    where
        R: Record + Resource,
    {
        require(&[
            ("id", record.id()),
            (R::KIND.parent_key(), record.parent_id()),
        ])?;

        if let Some(parent) = R::KIND.parent() {
            if !self.exists(parent, record.parent_id()) {
                return Err(KanboardError::not_found(parent, record.parent_id()));
            }
        }

        self.store.append(record.clone())?;
        debug!("Created {} {}", R::KIND, record.id());
        Ok(record)
    }

    /// Remove the `R` with this id
    pub fn delete<R>(&mut self, id: &str) -> Result<Deleted>
    where
        R: Record + Resource,
    {
        require(&[("id", id)])?;

        let removed = self.store.remove_where(|r: &R| r.id() == id)?;
        if removed == 0 {
            return Err(KanboardError::not_found(R::KIND, id));
        }

        debug!("Deleted {} {}", R::KIND, id);
        Ok(Deleted { id: id.to_string() })
    }

    /// Whether a record of `kind` with this id is stored
    pub fn exists(&self, kind: ResourceKind, id: &str) -> bool {
        match kind {
            ResourceKind::Board => self.store.any(|b: &Board| b.id == id),
            ResourceKind::List => self.store.any(|l: &List| l.id == id),
            ResourceKind::Card => self.store.any(|c: &Card| c.id == id),
        }
    }

    // ==================== Boards ====================

    pub fn list_boards(&self, user_id: &str) -> Result<Vec<Board>> {
        self.list_children(user_id)
    }

    pub fn create_board(&mut self, name: &str, user_id: &str) -> Result<Board> {
        require(&[("userId", user_id), ("name", name)])?;
        self.create(Board::new(name, user_id))
    }

    pub fn delete_board(&mut self, id: &str) -> Result<Deleted> {
        self.delete::<Board>(id)
    }

    // ==================== Lists ====================

    pub fn list_lists(&self, board_id: &str) -> Result<Vec<List>> {
        self.list_children(board_id)
    }

    pub fn create_list(&mut self, name: &str, board_id: &str) -> Result<List> {
        require(&[("boardId", board_id), ("name", name)])?;
        self.create(List::new(name, board_id))
    }

    pub fn delete_list(&mut self, id: &str) -> Result<Deleted> {
        self.delete::<List>(id)
    }

    // ==================== Cards ====================

    pub fn list_cards(&self, list_id: &str) -> Result<Vec<Card>> {
        self.list_children(list_id)
    }

    pub fn create_card(&mut self, data: &str, list_id: &str) -> Result<Card> {
        require(&[("listId", list_id), ("data", data)])?;
        self.create(Card::new(data, list_id))
    }

    pub fn delete_card(&mut self, id: &str) -> Result<Deleted> {
        self.delete::<Card>(id)
    }
}

/// Fail with `InvalidArgument` naming every empty field
fn require(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(KanboardError::invalid_argument(format!(
            "No {} in request",
            missing.join(" or ")
        )))
    }
}
