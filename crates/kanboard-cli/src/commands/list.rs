//! List command handlers
//!
//! Lists are children of boards.

use anyhow::{Context, Result};

use kanboard_core::Service;

use crate::output::Output;
use crate::prompt::confirm;

/// Show the lists on a board
pub fn list(service: &mut Service, board_id: String, output: &Output) -> Result<()> {
    let lists = service.hierarchy().list_lists(&board_id)?;
    output.print_lists(&lists);
    Ok(())
}

/// Create a list on an existing board
pub fn create(
    service: &mut Service,
    name: String,
    board_id: String,
    output: &Output,
) -> Result<()> {
    let list = service
        .hierarchy()
        .create_list(&name, &board_id)
        .context("Failed to create list")?;

    if !output.is_json() {
        output.success(&format!("Created list: {}", list.id));
    }
    output.print_list(&list);
    Ok(())
}

/// Delete a list. Its cards are left in place.
pub fn delete(service: &mut Service, id: String, yes: bool, output: &Output) -> Result<()> {
    if output.should_prompt() && !yes {
        println!("Delete list: {}", id);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = service
        .hierarchy()
        .delete_list(&id)
        .context("Failed to delete list")?;

    output.print_deleted("list", &deleted);
    Ok(())
}
