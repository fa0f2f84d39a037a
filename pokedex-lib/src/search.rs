//! Incremental free-text search over catalog names.
//!
//! Keystrokes go through a [`Debouncer`]; only a term that survives the
//! quiescence window is looked up. A lookup pulls a bounded listing of
//! candidate names (cached separately), filters it by case-insensitive
//! substring, caps the matches and enriches only those. Lookup failures
//! are logged and reported as an empty result.

use std::sync::Arc;

use futures::future::try_join_all;
use tokio::sync::watch;
use tokio::time::Duration;

use pokedex_api::{CatalogSource, NamedResource, fetch_entry_at};
use pokedex_core::CatalogEntry;

use crate::debounce::Debouncer;
use crate::error::QueryError;
use crate::loader::from_source;
use crate::query_cache::{QueryCache, QueryKey};
use crate::settings::Settings;

/// What a search box shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchView {
    /// Normalized (trimmed, lowercased) term the view belongs to.
    pub term: String,
    pub results: Vec<CatalogEntry>,
    pub is_searching: bool,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub min_term_len: usize,
    pub candidate_limit: u32,
    pub result_cap: usize,
    /// Staleness window of per-term results.
    pub results_stale: Duration,
    /// Staleness window of the candidate name listing.
    pub candidates_stale: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl SearchOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            debounce: settings.debounce(),
            min_term_len: settings.search.min_term_len,
            candidate_limit: settings.search.candidate_limit,
            result_cap: settings.search.result_cap,
            results_stale: settings.listing_stale(),
            candidates_stale: settings.search_stale(),
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

struct Lookup<S: CatalogSource> {
    cache: QueryCache,
    source: Arc<S>,
    options: SearchOptions,
}

impl<S: CatalogSource> Lookup<S> {
    fn is_searchable(&self, term: &str) -> bool {
        term.chars().count() >= self.options.min_term_len
    }

    /// Cached lookup of an already normalized term. Never fails.
    async fn run(&self, term: String) -> Vec<CatalogEntry> {
        if !self.is_searchable(&term) {
            return Vec::new();
        }
        let cache = self.cache.clone();
        let source = self.source.clone();
        let options = self.options.clone();
        let key_term = term.clone();
        let result = self
            .cache
            .fetch(QueryKey::search(&term), self.options.results_stale, move || {
                matching_entries(cache, source, options, key_term)
            })
            .await;
        match result {
            Ok(entries) => entries.as_ref().clone(),
            Err(e) => {
                log::warn!("Search for '{}' failed: {}", term, e);
                Vec::new()
            }
        }
    }
}

async fn matching_entries<S: CatalogSource>(
    cache: QueryCache,
    source: Arc<S>,
    options: SearchOptions,
    term: String,
) -> Result<Vec<CatalogEntry>, QueryError> {
    let limit = options.candidate_limit;
    let candidates = cache
        .fetch(
            QueryKey::search_candidates(limit),
            options.candidates_stale,
            from_source(&source, move |s| async move {
                s.list(0, limit).await.map(|listing| listing.results)
            }),
        )
        .await?;

    let matches: Vec<&NamedResource> = candidates
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&term))
        .take(options.result_cap)
        .collect();
    log::debug!(
        "Search '{}' matched {} of {} candidates",
        term,
        matches.len(),
        candidates.len()
    );

    let entries = try_join_all(
        matches
            .iter()
            .map(|m| fetch_entry_at(source.as_ref(), &m.url)),
    )
    .await?;
    Ok(entries)
}

/// Debounced search state for one input box.
pub struct SearchCoordinator<S: CatalogSource> {
    lookup: Arc<Lookup<S>>,
    debouncer: Debouncer,
    view: Arc<watch::Sender<SearchView>>,
}

impl<S: CatalogSource> SearchCoordinator<S> {
    pub fn new(cache: QueryCache, source: Arc<S>, options: SearchOptions) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            debouncer: Debouncer::new(options.debounce),
            lookup: Arc::new(Lookup {
                cache,
                source,
                options,
            }),
            view: Arc::new(view),
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.lookup.options
    }

    /// Current view.
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Receiver that sees every published view.
    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    /// Feed the raw contents of the input box after a keystroke.
    ///
    /// A term shorter than the minimum length publishes an empty view at
    /// once and cancels any pending lookup. Anything else is looked up once
    /// the input has been quiet for the debounce window.
    pub fn set_input(&self, raw: &str) {
        let term = normalize(raw);
        if !self.lookup.is_searchable(&term) {
            self.debouncer.cancel();
            self.view.send_replace(SearchView {
                term,
                results: Vec::new(),
                is_searching: false,
            });
            return;
        }

        let lookup = self.lookup.clone();
        let view = self.view.clone();
        self.debouncer.schedule(async move {
            view.send_replace(SearchView {
                term: term.clone(),
                results: Vec::new(),
                is_searching: true,
            });
            let results = lookup.run(term.clone()).await;
            view.send_replace(SearchView {
                term,
                results,
                is_searching: false,
            });
        });
    }

    /// Look `raw` up right away, bypassing the debounce.
    pub async fn search(&self, raw: &str) -> Vec<CatalogEntry> {
        self.lookup.run(normalize(raw)).await
    }

    /// Matches among entries already flattened into the search cache by
    /// page loads. No network traffic.
    pub fn local_matches(&self, raw: &str) -> Vec<CatalogEntry> {
        let term = normalize(raw);
        if !self.lookup.is_searchable(&term) {
            return Vec::new();
        }
        let warmed = self
            .lookup
            .cache
            .get::<Vec<CatalogEntry>>(&QueryKey::search_cache());
        warmed
            .data
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.name.to_lowercase().contains(&term))
                    .take(self.lookup.options.result_cap)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Drop a scheduled lookup that has not published yet.
    pub fn cancel(&self) -> bool {
        self.debouncer.cancel()
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
