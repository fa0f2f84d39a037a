pub(crate) mod browse;
pub(crate) mod config;
pub(crate) mod favorites;
pub(crate) mod list;
pub(crate) mod search;
pub(crate) mod show;

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use pokedex_api::PokeApiClient;
use pokedex_core::{CatalogEntry, ElementType, Rgb};
use pokedex_lib::{CatalogSession, FavoritesStore, JsonFavorites, Settings};

use crate::error::CliError;

/// Settings and paths shared by every command that talks to the catalog.
pub(crate) struct AppContext {
    pub settings: Settings,
    pub favorites_path: PathBuf,
    pub quiet: bool,
}

impl AppContext {
    /// Resolve settings: CLI flag > environment > settings file > default.
    pub(crate) fn load(
        api_url: Option<String>,
        favorites: Option<PathBuf>,
        quiet: bool,
    ) -> Result<Self, CliError> {
        let mut settings = Settings::load()?;
        if let Some(url) = api_url {
            settings.api.base_url = url;
        }
        Ok(Self {
            settings,
            favorites_path: favorites.unwrap_or_else(JsonFavorites::default_path),
            quiet,
        })
    }

    pub(crate) fn override_page_size(&mut self, page_size: Option<u32>) -> Result<(), CliError> {
        match page_size {
            Some(0) => Err(CliError::config("page size must be at least 1")),
            Some(size) => {
                self.settings.paging.page_size = size;
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub(crate) fn session(&self) -> Result<CatalogSession<PokeApiClient>, CliError> {
        Ok(CatalogSession::connect(self.settings.clone())?)
    }

    pub(crate) fn favorites(&self) -> Result<JsonFavorites, CliError> {
        Ok(JsonFavorites::open(&self.favorites_path)?)
    }
}

pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))
}

/// Type name in its palette colour.
pub(crate) fn type_badge(name: &str) -> String {
    let Rgb(r, g, b) = ElementType::color_for(name);
    name.if_supports_color(Stdout, |t| t.truecolor(r, g, b))
        .to_string()
}

pub(crate) fn type_badges(types: &[String]) -> String {
    types
        .iter()
        .map(|t| type_badge(t))
        .collect::<Vec<_>>()
        .join(" / ")
}

pub(crate) fn favorite_mark(is_favorite: bool) -> String {
    if is_favorite {
        format!(" {}", "\u{2605}".if_supports_color(Stdout, |t| t.yellow()))
    } else {
        String::new()
    }
}

/// One catalog entry on one line: number, name, types, favorite star.
pub(crate) fn print_entry(entry: &CatalogEntry, favorites: &impl FavoritesStore) {
    log::info!(
        "  {} {:<24} {}{}",
        format!("#{:03}", entry.id).if_supports_color(Stdout, |t| t.dimmed()),
        entry.display_name().if_supports_color(Stdout, |t| t.bold()),
        type_badges(&entry.types),
        favorite_mark(favorites.contains(entry.id)),
    );
}
