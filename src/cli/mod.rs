//! CLI module - Command-line interface for Reelscout
//!
//! This module provides a structured CLI using clap for argument parsing.

pub mod commands;

use clap::{Parser, Subcommand};

/// Reelscout - movie discovery with debounced search and trending terms
#[derive(Parser)]
#[command(name = "reelscout")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the web API that serves the live search state
    #[command(alias = "-d", alias = "--daemon", alias = "daemon")]
    Serve,

    /// Run one search and record it as trending
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Show the most searched terms
    #[command(alias = "t")]
    Trending {
        /// Number of entries to show
        #[arg(long, short)]
        limit: Option<u64>,
    },

    /// Interactive search: every line read from stdin replaces the query
    #[command(alias = "b")]
    Browse,

    /// Write a default config.toml in the current directory
    Init,
}

impl Commands {
    /// Whether the command can run before the config has been filled in.
    #[must_use]
    pub const fn needs_valid_config(&self) -> bool {
        !matches!(self, Self::Init)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_collects_query_words() {
        let cli = Cli::try_parse_from(["reelscout", "search", "star", "wars"]).unwrap();
        match cli.command {
            Some(Commands::Search { query }) => assert_eq!(query, vec!["star", "wars"]),
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn trending_limit_flag() {
        let cli = Cli::try_parse_from(["reelscout", "trending", "--limit", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Trending { limit: Some(3) })
        ));
    }

    #[test]
    fn init_skips_validation() {
        assert!(!Commands::Init.needs_valid_config());
        assert!(Commands::Browse.needs_valid_config());
    }
}
