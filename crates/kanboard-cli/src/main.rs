//! kanboard CLI
//!
//! Command-line interface and WebSocket server for kanboard boards, lists
//! and cards.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kanboard_core::{Config, Service, StorageError};

mod commands;
mod output;
mod prompt;
mod server;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "kanboard")]
#[command(about = "kanboard - boards, lists and cards over a local document store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the WebSocket API server
    Serve {
        /// Address to bind (defaults to listen_addr from config)
        #[arg(short, long)]
        listen: Option<String>,
    },
    /// Check credentials and print a token
    Login { username: String, password: String },
    /// Manage boards
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },
    /// Manage lists on a board
    List {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Manage cards in a list
    Card {
        #[command(subcommand)]
        command: CardCommands,
    },
    /// Run one raw JSON request, e.g. '{"operation":"boards","args":{"userId":"u1"}}'
    Call { request: String },
    /// Show document location and record counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum BoardCommands {
    /// List the boards of a user
    #[command(alias = "ls")]
    List { user_id: String },
    /// Create a board
    #[command(alias = "add")]
    Create { name: String, user_id: String },
    /// Delete a board (its lists are kept)
    #[command(alias = "rm")]
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ListCommands {
    /// Show the lists on a board
    #[command(alias = "ls")]
    List { board_id: String },
    /// Create a list on a board
    #[command(alias = "add")]
    Create { name: String, board_id: String },
    /// Delete a list (its cards are kept)
    #[command(alias = "rm")]
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CardCommands {
    /// Show the cards in a list
    #[command(alias = "ls")]
    List { list_id: String },
    /// Create a card in a list
    #[command(alias = "add")]
    Create { data: String, list_id: String },
    /// Delete a card
    #[command(alias = "rm")]
    Delete {
        id: String,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, listen_addr, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands must work even when the data directory is unusable
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(config_path, &output),
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, config_path, &output)
            }
        };
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    init_logging(&config);

    let mut service = match Service::open(config.clone()) {
        Ok(service) => service,
        Err(e) => {
            if let Some(hint) = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<StorageError>())
                .and_then(StorageError::recovery_suggestion)
            {
                eprintln!("hint: {}", hint);
            }
            return Err(e);
        }
    };

    match cli.command {
        Commands::Serve { listen } => {
            let addr = listen.unwrap_or_else(|| config.listen_addr.clone());
            server::serve(service, &addr).await
        }
        Commands::Login { username, password } => {
            commands::login::login(&mut service, username, password, &output)
        }
        Commands::Board { command } => handle_board_command(command, &mut service, &output),
        Commands::List { command } => handle_list_command(command, &mut service, &output),
        Commands::Card { command } => handle_card_command(command, &mut service, &output),
        Commands::Call { request } => commands::call::call(&mut service, request, &output),
        Commands::Status => commands::status::show(&service, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_board_command(
    command: BoardCommands,
    service: &mut Service,
    output: &Output,
) -> Result<()> {
    match command {
        BoardCommands::List { user_id } => commands::board::list(service, user_id, output),
        BoardCommands::Create { name, user_id } => {
            commands::board::create(service, name, user_id, output)
        }
        BoardCommands::Delete { id, yes } => commands::board::delete(service, id, yes, output),
    }
}

fn handle_list_command(command: ListCommands, service: &mut Service, output: &Output) -> Result<()> {
    match command {
        ListCommands::List { board_id } => commands::list::list(service, board_id, output),
        ListCommands::Create { name, board_id } => {
            commands::list::create(service, name, board_id, output)
        }
        ListCommands::Delete { id, yes } => commands::list::delete(service, id, yes, output),
    }
}

fn handle_card_command(command: CardCommands, service: &mut Service, output: &Output) -> Result<()> {
    match command {
        CardCommands::List { list_id } => commands::card::list(service, list_id, output),
        CardCommands::Create { data, list_id } => {
            commands::card::create(service, data, list_id, output)
        }
        CardCommands::Delete { id, yes } => commands::card::delete(service, id, yes, output),
    }
}

/// Log to stderr so stdout stays clean for --json and --quiet.
///
/// RUST_LOG wins over the configured level.
fn init_logging(config: &Config) {
    let level = &config.log_level;
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("kanboard_core={},kanboard_cli={}", level, level))
    });

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_board_create() {
        let cli = Cli::try_parse_from(["kanboard", "--json", "board", "create", "Sprint 1", "u1"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Board {
                command: BoardCommands::Create { name, user_id },
            } => {
                assert_eq!(name, "Sprint 1");
                assert_eq!(user_id, "u1");
            }
            _ => panic!("expected board create"),
        }
    }

    #[test]
    fn test_parse_delete_alias_with_yes() {
        let cli = Cli::try_parse_from(["kanboard", "card", "rm", "c1", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Card {
                command: CardCommands::Delete { yes: true, .. }
            }
        ));
    }

    #[test]
    fn test_parse_serve_listen() {
        let cli = Cli::try_parse_from(["kanboard", "serve", "--listen", "0.0.0.0:9000"]).unwrap();
        match cli.command {
            Commands::Serve { listen } => assert_eq!(listen.as_deref(), Some("0.0.0.0:9000")),
            _ => panic!("expected serve"),
        }
    }
}
