use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pokedex_core::EntityId;
use pokedex_lib::FavoritesStore;

use super::{AppContext, print_entry, runtime};
use crate::error::CliError;
use crate::spinner::Spinner;

/// Look `id` up and add it to the favorites file.
pub(crate) fn run_favorites_add(ctx: &AppContext, id: EntityId) -> Result<(), CliError> {
    let mut favorites = ctx.favorites()?;
    if favorites.contains(id) {
        log::info!("#{:03} is already a favorite", id);
        return Ok(());
    }

    let rt = runtime()?;
    let session = ctx.session()?;
    let entry = {
        let _spinner = Spinner::start(format!("Looking up #{id}..."), ctx.quiet);
        rt.block_on(session.entry(id))
    };
    session.shutdown();
    let entry = entry?;

    favorites.add(entry.clone())?;
    log::info!(
        "{} {} to favorites",
        "Added".if_supports_color(Stdout, |t| t.green()),
        entry.display_name().if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

pub(crate) fn run_favorites_remove(ctx: &AppContext, id: EntityId) -> Result<(), CliError> {
    let mut favorites = ctx.favorites()?;
    if favorites.remove(id)? {
        log::info!(
            "{} #{:03} from favorites",
            "Removed".if_supports_color(Stdout, |t| t.green()),
            id
        );
    } else {
        log::warn!("#{:03} is not a favorite", id);
    }
    Ok(())
}

pub(crate) fn run_favorites_list(ctx: &AppContext) -> Result<(), CliError> {
    let favorites = ctx.favorites()?;
    let entries = favorites.list();
    if entries.is_empty() {
        log::info!(
            "{}",
            "No favorites yet. Add one with `pokedex favorites add <id>`"
                .if_supports_color(Stdout, |t| t.dimmed())
        );
        return Ok(());
    }

    log::info!(
        "{} {}",
        "Favorites".if_supports_color(Stdout, |t| t.bold()),
        format!("({})", entries.len()).if_supports_color(Stdout, |t| t.dimmed()),
    );
    for entry in entries {
        print_entry(entry, &favorites);
    }
    log::debug!("Favorites file: {}", favorites.path().display());
    Ok(())
}
