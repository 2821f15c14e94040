//! Detailed help pages for `hactar help [command]`

use colored::Colorize;

use super::output;

pub struct CommandHelp {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub options: &'static [(&'static str, &'static str)],
    pub examples: &'static [&'static str],
}

pub const COMMANDS: &[CommandHelp] = &[
    CommandHelp {
        name: "configure",
        description: "Prompts for Plex Server URL and token, then stores them in ~/.hactar/config.json",
        usage: "hactar configure [options]",
        options: &[
            ("--url <URL>", "Plex server URL (or PLEX_URL)"),
            ("--token <TOKEN>", "Plex token (or PLEX_TOKEN)"),
        ],
        examples: &[
            "hactar configure",
            "hactar configure --url http://localhost:32400 --token <token>",
        ],
    },
    CommandHelp {
        name: "scan",
        description: "Scans a library, caches the results locally for the dashboard",
        usage: "hactar scan [KEY]",
        options: &[("[KEY]", "Library key to scan without prompting")],
        examples: &["hactar scan", "hactar scan 1"],
    },
    CommandHelp {
        name: "test",
        description: "Tests connectivity to the Plex server using stored credentials",
        usage: "hactar test",
        options: &[],
        examples: &["hactar test"],
    },
    CommandHelp {
        name: "dashboard",
        description: "Opens an interactive TUI dashboard showing storage statistics, library breakdowns and an item-by-item table. Requires a TTY",
        usage: "hactar dashboard",
        options: &[],
        examples: &["hactar dashboard"],
    },
    CommandHelp {
        name: "help",
        description: "Displays help information for available commands",
        usage: "hactar help [command]",
        options: &[],
        examples: &["hactar help", "hactar help scan"],
    },
    CommandHelp {
        name: "completion",
        description: "Prints a shell completion script",
        usage: "hactar completion <SHELL>",
        options: &[("<SHELL>", "bash, zsh, fish, elvish or powershell")],
        examples: &["hactar completion zsh > ~/.zfunc/_hactar"],
    },
];

pub fn find(name: &str) -> Option<&'static CommandHelp> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(name.trim()))
}

pub fn show(command: Option<&str>) {
    match command {
        Some(name) => show_command(name),
        None => show_general(),
    }
}

fn show_general() {
    println!("{}", "hactar".blue().bold());
    println!("{}", "Plex Library Management".dimmed());
    println!();

    output::info("Available Commands:");
    for cmd in COMMANDS {
        println!("{}", format!("  {:<12} {}", cmd.name, cmd.description).cyan());
        println!("{}", format!("    Usage: {}", cmd.usage).dimmed());
        println!();
    }

    output::info("Getting Started:");
    println!("  1. Run \"hactar configure\" to set up your Plex token");
    println!("  2. Use \"hactar scan\" to scan your library");
    println!("  3. Open \"hactar dashboard\" to explore storage usage");
    println!();

    output::info("Need help?");
    println!("  • Run \"hactar help <command>\" for command-specific help");
}

fn show_command(name: &str) {
    let Some(help) = find(name) else {
        output::error(format!("Unknown command: {}", name));
        output::info("Run \"hactar help\" to see all available commands");
        return;
    };

    println!("{}", format!("Command: {}", help.name).cyan());
    println!("{}", help.description.dimmed());
    println!();

    println!("{}", "Usage:".yellow());
    println!("  {}", help.usage);
    println!();

    if !help.options.is_empty() {
        println!("{}", "Options:".yellow());
        for (flag, description) in help.options {
            println!("  {:<25} {}", flag, description);
        }
        println!();
    }

    println!("{}", "Examples:".yellow());
    for example in help.examples {
        println!("  {}", example);
    }
    println!();

    output::info("For general help, run: hactar help");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_find_command() {
        assert_eq!(find("scan").map(|c| c.usage), Some("hactar scan [KEY]"));
        assert!(find(" Dashboard ").is_some());
        assert!(find("sync").is_none());
    }

    #[test]
    fn test_every_subcommand_has_a_page() {
        let cli = crate::cli::Cli::command();
        for sub in cli.get_subcommands() {
            assert!(find(sub.get_name()).is_some(), "no help for {}", sub.get_name());
        }
    }
}
