//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(about = "Browse the Pokémon catalog from the terminal", long_about = None)]
pub(crate) struct Cli {
    /// Catalog API base URL (overrides POKEDEX_API_URL and settings.toml)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Favorites file (defaults to the user data directory)
    #[arg(long, global = true)]
    pub favorites: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print one page of the catalog
    List {
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Entries per page (overrides POKEDEX_PAGE_SIZE and settings.toml)
        #[arg(short = 's', long)]
        page_size: Option<u32>,
    },

    /// Page through the catalog interactively (n/p/g <page>/q)
    Browse {
        /// Entries per page (overrides POKEDEX_PAGE_SIZE and settings.toml)
        #[arg(short = 's', long)]
        page_size: Option<u32>,
    },

    /// Show the detail view of one entry
    Show {
        /// Numeric id (e.g. 25)
        id: u32,

        /// Language for description and genus (e.g. en, fr, de)
        #[arg(short, long)]
        language: Option<String>,

        /// Also list every move
        #[arg(long)]
        moves: bool,
    },

    /// Search names by substring (interactive when no term is given)
    Search {
        /// Term to look up (at least two characters)
        term: Option<String>,
    },

    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum FavoritesAction {
    /// Add an entry by id
    Add { id: u32 },

    /// Remove an entry by id
    Remove { id: u32 },

    /// List favorites
    List,
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and where they come from
    Show,

    /// Print the settings file path
    Path,

    /// Set one value, e.g. `config set paging.page_size 30`
    Set {
        /// `<section>.<key>`
        key: String,
        value: String,
    },
}
