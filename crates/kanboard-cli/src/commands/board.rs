//! Board command handlers

use anyhow::{Context, Result};

use kanboard_core::Service;

use crate::output::Output;
use crate::prompt::confirm;

/// List the boards of a user
pub fn list(service: &mut Service, user_id: String, output: &Output) -> Result<()> {
    let boards = service.hierarchy().list_boards(&user_id)?;
    output.print_boards(&boards);
    Ok(())
}

/// Create a new board
pub fn create(service: &mut Service, name: String, user_id: String, output: &Output) -> Result<()> {
    let board = service
        .hierarchy()
        .create_board(&name, &user_id)
        .context("Failed to create board")?;

    if !output.is_json() {
        output.success(&format!("Created board: {}", board.id));
    }
    output.print_board(&board);
    Ok(())
}

/// Delete a board. Its lists are left in place.
pub fn delete(service: &mut Service, id: String, yes: bool, output: &Output) -> Result<()> {
    if output.should_prompt() && !yes {
        println!("Delete board: {}", id);
        println!("Lists on this board are kept and stay listable by board id.");
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = service
        .hierarchy()
        .delete_board(&id)
        .context("Failed to delete board")?;

    output.print_deleted("board", &deleted);
    Ok(())
}
