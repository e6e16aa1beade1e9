//! Card command handlers

use anyhow::{Context, Result};

use kanboard_core::Service;

use crate::output::Output;
use crate::prompt::confirm;

/// Show the cards in a list
pub fn list(service: &mut Service, list_id: String, output: &Output) -> Result<()> {
    let cards = service.hierarchy().list_cards(&list_id)?;
    output.print_cards(&cards);
    Ok(())
}

/// Create a card in an existing list
pub fn create(service: &mut Service, data: String, list_id: String, output: &Output) -> Result<()> {
    let card = service
        .hierarchy()
        .create_card(&data, &list_id)
        .context("Failed to create card")?;

    if !output.is_json() {
        output.success(&format!("Created card: {}", card.id));
    }
    output.print_card(&card);
    Ok(())
}

pub fn delete(service: &mut Service, id: String, yes: bool, output: &Output) -> Result<()> {
    if output.should_prompt() && !yes {
        println!("Delete card: {}", id);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let deleted = service
        .hierarchy()
        .delete_card(&id)
        .context("Failed to delete card")?;

    output.print_deleted("card", &deleted);
    Ok(())
}
