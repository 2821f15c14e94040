//! CLI module for hactar

use clap::{Parser, Subcommand};

pub mod commands;
pub mod configure;
pub mod help;
pub mod output;

#[derive(Parser, Debug)]
#[command(name = "hactar", about = "Plex library storage explorer")]
#[command(version, author, disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configure Plex server URL and token
    Configure {
        /// Plex server URL
        #[arg(long, env = "PLEX_URL")]
        url: Option<String>,

        /// Plex token
        #[arg(long, env = "PLEX_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },

    /// Scan a library and cache the results
    Scan {
        /// Library key (prompts for a library when omitted)
        key: Option<String>,
    },

    /// Test the Plex connection and stored credentials
    Test,

    /// Open the interactive storage dashboard
    Dashboard,

    /// Show detailed help
    Help {
        /// Command to get help for
        command: Option<String>,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
