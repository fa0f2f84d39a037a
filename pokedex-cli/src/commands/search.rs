use std::io::BufRead;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use tokio::sync::mpsc;

use pokedex_api::PokeApiClient;
use pokedex_core::CatalogEntry;
use pokedex_lib::{JsonFavorites, SearchCoordinator, SearchView};

use super::{AppContext, print_entry, runtime};
use crate::error::CliError;
use crate::spinner::Spinner;

/// Look up `term` once, or read terms from stdin when none is given.
pub(crate) fn run_search(ctx: &AppContext, term: Option<String>) -> Result<(), CliError> {
    let rt = runtime()?;
    let session = ctx.session()?;
    let favorites = ctx.favorites()?;
    let search = session.search();

    let result = match term {
        Some(term) => rt.block_on(search_once(ctx, &search, &favorites, &term)),
        None => rt.block_on(search_interactive(&search, &favorites)),
    };
    session.shutdown();
    result
}

async fn search_once(
    ctx: &AppContext,
    search: &SearchCoordinator<PokeApiClient>,
    favorites: &JsonFavorites,
    term: &str,
) -> Result<(), CliError> {
    let min_len = search.options().min_term_len;
    if term.trim().chars().count() < min_len {
        return Err(CliError::other(format!(
            "Search terms need at least {min_len} characters"
        )));
    }

    let results = {
        let _spinner = Spinner::start(format!("Searching for '{}'...", term.trim()), ctx.quiet);
        search.search(term).await
    };
    print_results(term.trim(), &results, favorites);
    Ok(())
}

/// Each stdin line is fed to the coordinator as the new input. Lines typed
/// within the debounce window replace each other; only the last one is
/// looked up.
async fn search_interactive(
    search: &SearchCoordinator<PokeApiClient>,
    favorites: &JsonFavorites,
) -> Result<(), CliError> {
    log::info!(
        "{}",
        "Type a name to search, an empty line to quit".if_supports_color(Stdout, |t| t.dimmed())
    );

    let (tx, mut lines) = mpsc::channel::<String>(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    let mut view = search.subscribe();
    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(line) if !line.trim().is_empty() => search.set_input(&line),
                _ => break,
            },
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let current: SearchView = view.borrow_and_update().clone();
                if current.is_searching {
                    log::debug!("Searching for '{}'", current.term);
                } else if current.term.chars().count() >= search.options().min_term_len {
                    print_results(&current.term, &current.results, favorites);
                }
            }
        }
    }
    search.cancel();
    Ok(())
}

fn print_results(term: &str, results: &[CatalogEntry], favorites: &JsonFavorites) {
    if results.is_empty() {
        log::info!(
            "No matches for '{}'",
            term.if_supports_color(Stdout, |t| t.cyan())
        );
        return;
    }
    log::info!(
        "{} match(es) for '{}'",
        results.len(),
        term.if_supports_color(Stdout, |t| t.cyan())
    );
    for entry in results {
        print_entry(entry, favorites);
    }
}
