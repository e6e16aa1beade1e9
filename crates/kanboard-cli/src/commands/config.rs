//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use kanboard_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "listen_addr": config.listen_addr,
                    "log_level": config.log_level,
                    "document_path": config.document_path(),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:    {}", config.data_dir.display());
            println!("  listen_addr: {}", config.listen_addr);
            println!("  log_level:   {}", config.log_level);
            println!();
            println!("Document:    {}", config.document_path().display());
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "listen_addr" => {
            value
                .parse::<std::net::SocketAddr>()
                .with_context(|| format!("Invalid listen_addr '{}'. Use host:port.", value))?;
            config.listen_addr = value.to_string();
        }
        "log_level" => {
            let level = value.to_lowercase();
            if !["error", "warn", "info", "debug", "trace"].contains(&level.as_str()) {
                bail!("Invalid log_level '{}'. Use error, warn, info, debug or trace.", value);
            }
            config.log_level = level;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, listen_addr, log_level",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "listen_addr", "0.0.0.0:8080").unwrap();
        apply(&mut config, "log_level", "DEBUG").unwrap();
        apply(&mut config, "data_dir", "/srv/kanboard").unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.data_dir, PathBuf::from("/srv/kanboard"));
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();

        assert!(apply(&mut config, "listen_addr", "not an address").is_err());
        assert!(apply(&mut config, "log_level", "loud").is_err());
        assert!(apply(&mut config, "favorite_color", "blue").is_err());
    }
}
