//! CLI command handlers

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;
use tracing::debug;

use super::configure::{offer_configuration, run_configure};
use super::output;
use crate::config::ConfigManager;
use crate::dashboard;
use crate::plex::{LibrarySection, PlexClient};
use crate::storage::{LibraryStore, StorageClient};
use crate::utils::mask_token;

/// Handle the `configure` command
pub async fn configure(url: Option<String>, token: Option<String>) -> Result<()> {
    let config = ConfigManager::new()?;
    run_configure(&config, url, token).await?;
    Ok(())
}

/// A client for a server that answers, offering configuration otherwise
async fn connected_client(config: &ConfigManager) -> Result<Option<PlexClient>> {
    if let Some(credentials) = config.credentials()? {
        match PlexClient::new(&credentials.server_url, &credentials.token) {
            Ok(client) => {
                if client.test_connection().await {
                    return Ok(Some(client));
                }
                output::warning("Could not connect to the Plex server");
            }
            Err(e) => debug!("Stored server url is unusable: {:#}", e),
        }
    }

    let Some(credentials) = offer_configuration(config).await? else {
        return Ok(None);
    };
    let client = PlexClient::new(&credentials.server_url, &credentials.token)?;
    if client.test_connection().await {
        Ok(Some(client))
    } else {
        Ok(None)
    }
}

/// `Ok(None)` when the user picks "Cancel"
fn select_library(libraries: &[LibrarySection]) -> Result<Option<&LibrarySection>> {
    let items: Vec<&str> = std::iter::once("Cancel")
        .chain(libraries.iter().map(|l| l.title.as_str()))
        .collect();

    let choice = Select::new()
        .with_prompt("Select a library to scan")
        .items(&items)
        .default(0)
        .max_length(10)
        .interact()?;

    Ok(choice.checked_sub(1).and_then(|i| libraries.get(i)))
}

/// Handle the `scan` command
pub async fn scan(key: Option<String>) -> Result<()> {
    output::info("Scanning for libraries...");

    let config = ConfigManager::new()?;
    let Some(client) = connected_client(&config).await? else {
        return Ok(());
    };

    let libraries = client.get_libraries().await?;
    if libraries.is_empty() {
        output::warning("No movie or show libraries found");
        return Ok(());
    }

    let section = match key {
        Some(key) => match libraries.iter().find(|l| l.key == key) {
            Some(section) => section,
            None => {
                output::error(format!("Library not found: {}", key));
                return Ok(());
            }
        },
        None => match select_library(&libraries)? {
            Some(section) => section,
            None => {
                output::info("Scan cancelled");
                return Ok(());
            }
        },
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Scanning {}...", section.title));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = client.scan_library(section).await;
    spinner.finish_and_clear();
    let result = result?;

    let storage = StorageClient::new(config.root());
    let path = storage.save_library(&section.key, &result).await?;

    output::info(format!("Found {} items", result.data.len()));
    output::success(format!(
        "{}: {} across {} files",
        result.library_name, result.human_bytes, result.files
    ));
    output::info(format!("Saved to {}", path.display()));
    Ok(())
}

/// Handle the `test` command
pub async fn test() -> Result<()> {
    output::info("Testing hactar configuration and Plex API connection...\n");

    let config = ConfigManager::new()?;
    match config.load() {
        Ok(_) => {
            output::success("Configuration loaded successfully");
            output::info(format!("Config directory: {}", config.root().display()));
            let storage = StorageClient::new(config.root());
            output::info(format!("Storage directory: {}", storage.dir().display()));
        }
        Err(e) => {
            output::error("Failed to load configuration");
            output::debug(format!("Error: {:#}", e));
        }
    }

    let credentials = match config.credentials() {
        Ok(Some(credentials)) => credentials,
        Ok(None) => {
            if config.is_configured().unwrap_or(false) {
                output::warning("Token found but no server URL");
            } else {
                output::warning("No credentials found");
            }
            output::info("Run \"hactar configure\" to set up your Plex token");
            return Ok(());
        }
        Err(e) => {
            output::error("Failed to access credentials");
            output::debug(format!("Error: {:#}", e));
            return Ok(());
        }
    };
    output::success("Credentials found");
    output::info(format!(
        "Token: {}\n    Server URL: {}",
        mask_token(&credentials.token),
        credentials.server_url
    ));

    let client = match PlexClient::new(&credentials.server_url, &credentials.token) {
        Ok(client) => client,
        Err(e) => {
            output::error("Plex API test failed");
            output::debug(format!("Error: {:#}", e));
            return Ok(());
        }
    };

    if client.test_connection().await {
        output::success("Plex API connection successful");
        output::info("Testing library search...");
        match client.get_libraries().await {
            Ok(libraries) => {
                output::success(format!(
                    "Search test successful - Found {} results",
                    libraries.len()
                ));
                let titles: Vec<&str> = libraries.iter().map(|l| l.title.as_str()).collect();
                output::info(format!("Libraries: {}", titles.join(", ")));
            }
            Err(e) => {
                output::warning("Search test failed");
                output::debug(format!("Error: {:#}", e));
            }
        }
    } else {
        output::error("Plex API connection failed");
        output::info("  Please check your token and server url");
    }

    output::results("Test completed!");
    Ok(())
}

/// Handle the `dashboard` command
pub async fn dashboard() -> Result<()> {
    if !console::Term::stdout().is_term() {
        output::error("Dashboard requires a TTY. Please run from a terminal.");
        return Ok(());
    }

    let config = ConfigManager::new()?;
    if connected_client(&config).await?.is_none() {
        return Ok(());
    }

    let storage = StorageClient::new(config.root());
    dashboard::run_dashboard(config, storage).await
}

/// Handle the `help` command
pub fn help(command: Option<String>) {
    super::help::show(command.as_deref());
}

/// Handle the `completion` command
pub fn completion(shell: clap_complete::Shell) {
    let mut cmd = super::Cli::command();
    generate(shell, &mut cmd, "hactar", &mut io::stdout());
}
