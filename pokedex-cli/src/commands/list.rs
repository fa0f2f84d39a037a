use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pokedex_api::PokeApiClient;
use pokedex_core::PagedResult;
use pokedex_lib::{CatalogSession, JsonFavorites, Paginator};

use super::{AppContext, print_entry, runtime};
use crate::error::CliError;
use crate::spinner::Spinner;

/// Print one page of the catalog.
pub(crate) fn run_list(ctx: &AppContext, page: u32) -> Result<(), CliError> {
    let rt = runtime()?;
    let session = ctx.session()?;
    let favorites = ctx.favorites()?;

    let result = rt.block_on(list_page(ctx, &session, &favorites, page));
    session.shutdown();
    result
}

async fn list_page(
    ctx: &AppContext,
    session: &CatalogSession<PokeApiClient>,
    favorites: &JsonFavorites,
    page: u32,
) -> Result<(), CliError> {
    let mut paginator = session.paginator();
    paginator.go_to_page(page);
    let result = load_with_spinner(&mut paginator, ctx.quiet).await?;
    print_page(&paginator, &result, favorites);
    Ok(())
}

pub(crate) async fn load_with_spinner(
    paginator: &mut Paginator<PokeApiClient>,
    quiet: bool,
) -> Result<Arc<PagedResult>, CliError> {
    let _spinner = Spinner::start(format!("Loading page {}...", paginator.current_page()), quiet);
    Ok(paginator.load().await?)
}

pub(crate) fn print_page(
    paginator: &Paginator<PokeApiClient>,
    result: &PagedResult,
    favorites: &JsonFavorites,
) {
    let total_pages = result.total_pages(paginator.page_size());
    log::info!(
        "{} {}",
        format!("Page {} of {}", paginator.current_page(), total_pages)
            .if_supports_color(Stdout, |t| t.bold()),
        format!("({} entries)", result.total_count).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!("");

    if result.is_empty() {
        log::info!(
            "  {}",
            "No entries on this page".if_supports_color(Stdout, |t| t.dimmed())
        );
        return;
    }
    for entry in &result.entries {
        print_entry(entry, favorites);
    }
}
