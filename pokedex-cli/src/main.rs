//! pokedex CLI
//!
//! Command-line front end for the catalog orchestration layer: paged
//! listing, detail view, name search and favorites.

mod cli_types;
mod commands;
mod error;
mod spinner;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction, FavoritesAction};
use commands::AppContext;
use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Normal output goes through `log::info!` with no decoration, so
/// `--quiet` (warn) hides it and `--verbose` (debug) adds timestamps.
/// `RUST_LOG` overrides the level chosen by the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Stdout)
        .format(move |buf, record| match record.level() {
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stdout, |t| t.red()),
                record.args()
            ),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stdout, |t| t.yellow()),
                record.args()
            ),
            Level::Info if !verbose => writeln!(buf, "{}", record.args()),
            level => writeln!(
                buf,
                "[{} {:<5} {}] {}",
                buf.timestamp_millis(),
                level,
                record.target(),
                record.args()
            ),
        });
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Path and set work even when the settings file does not parse.
    match &cli.command {
        Commands::Config {
            action: ConfigAction::Path,
        } => {
            commands::config::run_config_path();
            return Ok(());
        }
        Commands::Config {
            action: ConfigAction::Set { key, value },
        } => return commands::config::run_config_set(key, value),
        _ => {}
    }

    let mut ctx = AppContext::load(cli.api_url, cli.favorites, cli.quiet)?;
    log::debug!("Catalog API: {}", ctx.settings.api.base_url);

    match cli.command {
        Commands::List { page, page_size } => {
            ctx.override_page_size(page_size)?;
            commands::list::run_list(&ctx, page)
        }
        Commands::Browse { page_size } => {
            ctx.override_page_size(page_size)?;
            commands::browse::run_browse(&ctx)
        }
        Commands::Show {
            id,
            language,
            moves,
        } => commands::show::run_show(&ctx, id, language, moves),
        Commands::Search { term } => commands::search::run_search(&ctx, term),
        Commands::Favorites { action } => match action {
            FavoritesAction::Add { id } => commands::favorites::run_favorites_add(&ctx, id),
            FavoritesAction::Remove { id } => commands::favorites::run_favorites_remove(&ctx, id),
            FavoritesAction::List => commands::favorites::run_favorites_list(&ctx),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&ctx),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
            ConfigAction::Set { key, value } => commands::config::run_config_set(&key, &value),
        },
    }
}
