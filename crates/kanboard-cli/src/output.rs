//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use kanboard_core::{Board, Card, Deleted, List, Response, Token};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single board
    pub fn print_board(&self, board: &Board) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", board.id);
                println!("Name:    {}", board.name);
                println!("User:    {}", board.user_id);
                println!("Created: {}", board.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(board),
            OutputFormat::Quiet => println!("{}", board.id),
        }
    }

    /// Print a list of boards
    pub fn print_boards(&self, boards: &[Board]) {
        match self.format {
            OutputFormat::Human => {
                if boards.is_empty() {
                    println!("No boards found.");
                    return;
                }
                for board in boards {
                    println!(
                        "{} | {} | {}",
                        board.id,
                        truncate(&board.name, 40),
                        board.created_at.format("%Y-%m-%d")
                    );
                }
                println!("\n{} board(s)", boards.len());
            }
            OutputFormat::Json => print_json(boards),
            OutputFormat::Quiet => {
                for board in boards {
                    println!("{}", board.id);
                }
            }
        }
    }

    /// Print a single list
    pub fn print_list(&self, list: &List) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", list.id);
                println!("Name:    {}", list.name);
                println!("Board:   {}", list.board_id);
                println!("Created: {}", list.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(list),
            OutputFormat::Quiet => println!("{}", list.id),
        }
    }

    /// Print the lists of a board
    pub fn print_lists(&self, lists: &[List]) {
        match self.format {
            OutputFormat::Human => {
                if lists.is_empty() {
                    println!("No lists found.");
                    return;
                }
                for list in lists {
                    println!("{} | {}", list.id, truncate(&list.name, 50));
                }
                println!("\n{} list(s)", lists.len());
            }
            OutputFormat::Json => print_json(lists),
            OutputFormat::Quiet => {
                for list in lists {
                    println!("{}", list.id);
                }
            }
        }
    }

    /// Print a single card
    pub fn print_card(&self, card: &Card) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", card.id);
                println!("List:    {}", card.list_id);
                println!("Created: {}", card.created_at.format("%Y-%m-%d %H:%M"));
                println!();
                println!("{}", card.data);
            }
            OutputFormat::Json => print_json(card),
            OutputFormat::Quiet => println!("{}", card.id),
        }
    }

    /// Print the cards of a list
    pub fn print_cards(&self, cards: &[Card]) {
        match self.format {
            OutputFormat::Human => {
                if cards.is_empty() {
                    println!("No cards found.");
                    return;
                }
                for card in cards {
                    println!("{} | {}", card.id, truncate_line(&card.data, 50));
                }
                println!("\n{} card(s)", cards.len());
            }
            OutputFormat::Json => print_json(cards),
            OutputFormat::Quiet => {
                for card in cards {
                    println!("{}", card.id);
                }
            }
        }
    }

    /// Print an issued login token
    pub fn print_token(&self, token: &Token) {
        match self.format {
            OutputFormat::Human => {
                println!("✓ Authenticated as {}", token.username);
                println!("Token: {}", token.token);
            }
            OutputFormat::Json => print_json(token),
            OutputFormat::Quiet => println!("{}", token.token),
        }
    }

    /// Print a delete confirmation
    pub fn print_deleted(&self, what: &str, deleted: &Deleted) {
        match self.format {
            OutputFormat::Human => println!("✓ Deleted {}: {}", what, deleted.id),
            OutputFormat::Json => print_json(deleted),
            OutputFormat::Quiet => println!("{}", deleted.id),
        }
    }

    /// Print a raw API response envelope
    pub fn print_response(&self, response: &Response) {
        match self.format {
            OutputFormat::Human | OutputFormat::Json => print_json(response),
            OutputFormat::Quiet => {
                if let Some(ref data) = response.data {
                    println!("{}", data);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode output: {}", e),
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Truncate to first line and max length
fn truncate_line(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or("");
    truncate(first_line, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ünïcödé text", 6), "ünï...");
    }

    #[test]
    fn test_truncate_line() {
        assert_eq!(truncate_line("single line", 20), "single line");
        assert_eq!(truncate_line("line one\nline two", 20), "line one");
        assert_eq!(
            truncate_line("very long single line here", 10),
            "very lo..."
        );
    }

    #[test]
    fn test_should_prompt_only_for_humans() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
        assert!(Output::new(OutputFormat::Json).is_json());
    }
}
