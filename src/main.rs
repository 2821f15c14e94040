//! hactar - Explore Plex library storage from the terminal

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod dashboard;
mod plex;
mod storage;
mod utils;

use cli::{Cli, Commands};
use utils::QuietDuringTui;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "hactar=debug,reqwest=debug"
    } else {
        "hactar=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(QuietDuringTui::new(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        ))
        .init();

    match cli.command {
        Some(Commands::Configure { url, token }) => {
            cli::commands::configure(url, token).await?;
        }
        Some(Commands::Scan { key }) => {
            cli::commands::scan(key).await?;
        }
        Some(Commands::Test) => {
            cli::commands::test().await?;
        }
        Some(Commands::Dashboard) => {
            cli::commands::dashboard().await?;
        }
        Some(Commands::Help { command }) => {
            cli::commands::help(command);
        }
        Some(Commands::Completion { shell }) => {
            cli::commands::completion(shell);
        }
        None => {
            cli::commands::help(None);
        }
    }

    Ok(())
}
