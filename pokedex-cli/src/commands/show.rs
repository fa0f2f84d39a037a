use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pokedex_api::{EvolutionStage, PokeApiClient};
use pokedex_core::EntityId;
use pokedex_lib::{CatalogSession, DetailComposite, FavoritesStore, JsonFavorites};

use super::{AppContext, favorite_mark, runtime, type_badge, type_badges};
use crate::error::CliError;
use crate::spinner::Spinner;

const STAT_BAR_WIDTH: u32 = 30;
const STAT_BAR_MAX: u32 = 255;

/// Resolve and print the detail view of one entry.
pub(crate) fn run_show(
    ctx: &AppContext,
    id: EntityId,
    language: Option<String>,
    show_moves: bool,
) -> Result<(), CliError> {
    let rt = runtime()?;
    let session = ctx.session()?;
    let favorites = ctx.favorites()?;
    let language = language.unwrap_or_else(|| ctx.settings.detail.language.clone());

    let result = rt.block_on(show_entry(ctx, &session, id));
    session.shutdown();
    let composite = result?;
    print_detail(&composite, &language, show_moves, &favorites);
    Ok(())
}

async fn show_entry(
    ctx: &AppContext,
    session: &CatalogSession<PokeApiClient>,
    id: EntityId,
) -> Result<DetailComposite, CliError> {
    let detail = session.detail();
    let composite = {
        let _spinner = Spinner::start(format!("Loading #{id}..."), ctx.quiet);
        detail.resolve(id).await
    };
    detail.prefetch_next_entity(id);

    // Without the entity record there is nothing to show.
    if composite.entity.is_none() {
        if let Some(err) = composite.error() {
            return Err(err.clone().into());
        }
    }
    for (constituent, err) in composite.errors() {
        log::warn!("Could not load {}: {}", constituent.name(), err);
    }
    Ok(composite)
}

fn print_detail(
    composite: &DetailComposite,
    language: &str,
    show_moves: bool,
    favorites: &JsonFavorites,
) {
    let name = composite.name().unwrap_or("unknown").replace('-', " ");
    log::info!(
        "{} {}{}",
        format!("#{:03}", composite.id).if_supports_color(Stdout, |t| t.dimmed()),
        name.if_supports_color(Stdout, |t| t.bold()),
        favorite_mark(favorites.contains(composite.id)),
    );
    log::info!("  {}", type_badges(&composite.types()));
    if let Some(genus) = composite.genus(language) {
        log::info!("  {}", genus.if_supports_color(Stdout, |t| t.italic()));
    }
    log::info!("");

    if let Some(description) = composite.description(language) {
        log::info!("  {}", description);
        log::info!("");
    }

    if let Some(entity) = &composite.entity {
        log::info!(
            "  Height: {:.1} m   Weight: {:.1} kg",
            f64::from(entity.height) / 10.0,
            f64::from(entity.weight) / 10.0,
        );
    }
    if let Some(habitat) = composite.habitat() {
        log::info!("  Habitat: {}", habitat);
    }
    log::info!("");

    let stats = composite.stats();
    if !stats.is_empty() {
        log::info!("{}", "Base stats".if_supports_color(Stdout, |t| t.bold()));
        for (stat, value) in stats {
            log::info!(
                "  {:<16} {:>3} {}",
                stat,
                value,
                stat_bar(value).if_supports_color(Stdout, |t| t.cyan()),
            );
        }
        log::info!("");
    }

    let abilities = composite.abilities();
    if !abilities.is_empty() {
        let rendered: Vec<String> = abilities
            .into_iter()
            .map(|(ability, hidden)| {
                if hidden {
                    format!("{} {}", ability, "(hidden)".if_supports_color(Stdout, |t| t.dimmed()))
                } else {
                    ability.to_string()
                }
            })
            .collect();
        log::info!("  Abilities: {}", rendered.join(", "));
    }

    let weaknesses = composite.weaknesses();
    if !weaknesses.is_empty() {
        let badges: Vec<String> = weaknesses.iter().map(|w| type_badge(w)).collect();
        log::info!("  Weak to: {}", badges.join(" "));
    }

    let stages = composite.evolution_stages();
    if stages.len() > 1 {
        log::info!("");
        log::info!("{}", "Evolution".if_supports_color(Stdout, |t| t.bold()));
        for stage in &stages {
            log::info!("  {}", evolution_line(stage, composite.name()));
        }
    }

    let moves = composite.moves();
    if show_moves && !moves.is_empty() {
        log::info!("");
        log::info!(
            "{} {}",
            "Moves".if_supports_color(Stdout, |t| t.bold()),
            format!("({})", moves.len()).if_supports_color(Stdout, |t| t.dimmed()),
        );
        for chunk in moves.chunks(4) {
            log::info!("  {}", chunk.join(", "));
        }
    } else if !moves.is_empty() {
        log::info!("  Moves: {} (use --moves to list)", moves.len());
    }

    if composite.is_loading {
        log::info!("");
        log::info!("{}", "Some sections are still loading".if_supports_color(Stdout, |t| t.dimmed()));
    }
}

fn stat_bar(value: u32) -> String {
    let filled = (value.min(STAT_BAR_MAX) * STAT_BAR_WIDTH).div_ceil(STAT_BAR_MAX);
    "\u{2588}".repeat(filled as usize)
}

fn evolution_line(stage: &EvolutionStage, current: Option<&str>) -> String {
    let indent = "  ".repeat(stage.depth);
    let trigger = match (&stage.min_level, &stage.item) {
        (Some(level), _) => format!(" (Lv. {level})"),
        (None, Some(item)) => format!(" ({})", item.replace('-', " ")),
        (None, None) => String::new(),
    };
    let arrow = if stage.depth > 0 { "\u{2192} " } else { "" };
    if current == Some(stage.name.as_str()) {
        format!(
            "{indent}{arrow}{}{trigger}",
            stage.name.if_supports_color(Stdout, |t| t.bold())
        )
    } else {
        format!("{indent}{arrow}{}{trigger}", stage.name)
    }
}
