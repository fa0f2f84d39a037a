//! Page navigation over the catalog listing.
//!
//! The paginator owns the current page number and reads pages through the
//! query cache. After each successful load it prefetches the next page so
//! that advancing is normally a cache hit, and folds every cached page into
//! the flattened search cache.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::time::Duration;

use pokedex_api::{CatalogSource, fetch_page};
use pokedex_core::{CatalogEntry, EntityId, PagedResult};

use crate::error::QueryError;
use crate::loader::from_source;
use crate::query_cache::{CacheEntry, QueryCache, QueryKey};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

pub struct Paginator<S: CatalogSource> {
    cache: QueryCache,
    source: Arc<S>,
    page_size: u32,
    stale_time: Duration,
    current_page: u32,
    last: Option<Arc<PagedResult>>,
}

impl<S: CatalogSource> Paginator<S> {
    /// Start at page 1. A zero `page_size` is treated as 1.
    pub fn new(cache: QueryCache, source: Arc<S>, page_size: u32, stale_time: Duration) -> Self {
        Self {
            cache,
            source,
            page_size: page_size.max(1),
            stale_time,
            current_page: 1,
            last: None,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The most recently loaded page, if any.
    pub fn last_result(&self) -> Option<&Arc<PagedResult>> {
        self.last.as_ref()
    }

    /// `ceil(total_count / page_size)` of the last loaded page.
    pub fn total_pages(&self) -> Option<u32> {
        self.last.as_ref().map(|r| r.total_pages(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        self.last.as_ref().is_some_and(|r| r.next_page.is_some())
    }

    pub fn has_previous(&self) -> bool {
        self.last.as_ref().is_some_and(|r| r.previous_page.is_some())
    }

    /// Move to the last result's next page. Returns false (and stays put)
    /// when there is none.
    pub fn go_to_next(&mut self) -> bool {
        match self.last.as_ref().and_then(|r| r.next_page) {
            Some(next) => {
                self.current_page = next;
                true
            }
            None => false,
        }
    }

    /// Move to the last result's previous page, if it has one.
    pub fn go_to_previous(&mut self) -> bool {
        match self.last.as_ref().and_then(|r| r.previous_page) {
            Some(previous) => {
                self.current_page = previous;
                true
            }
            None => false,
        }
    }

    /// Jump to `page`. Not validated against `total_pages`; an out-of-range
    /// page loads as an empty result. Page 0 loads the first window under
    /// its own key, and its next page is 2.
    pub fn go_to_page(&mut self, page: u32) {
        self.current_page = page;
    }

    /// Cache state of the current page without waiting for it.
    pub fn current_entry(&self) -> CacheEntry<PagedResult> {
        self.cache
            .get(&QueryKey::page(self.current_page, self.page_size))
    }

    /// Load the current page through the cache.
    pub async fn load(&mut self) -> Result<Arc<PagedResult>, QueryError> {
        let page = self.current_page;
        let page_size = self.page_size;
        let result = self
            .cache
            .fetch(
                QueryKey::page(page, page_size),
                self.stale_time,
                from_source(&self.source, move |s| async move {
                    fetch_page(s.as_ref(), page, page_size).await
                }),
            )
            .await?;
        log::debug!(
            "Page {} loaded: {} entries, next {:?}, previous {:?}",
            page,
            result.entries.len(),
            result.next_page,
            result.previous_page
        );

        if let Some(next) = result.next_page {
            self.cache.prefetch(
                QueryKey::page(next, page_size),
                self.stale_time,
                from_source(&self.source, move |s| async move {
                    fetch_page(s.as_ref(), next, page_size).await
                }),
            );
        }
        self.last = Some(result.clone());
        warm_search_cache(&self.cache);
        Ok(result)
    }

    /// Mark every cached page stale so the next `load` refetches.
    pub fn invalidate(&self) {
        self.cache.invalidate_prefix(&["pokemons"]);
    }
}

/// Flatten every cached listing page into the search cache, deduplicated
/// and ordered by id.
fn warm_search_cache(cache: &QueryCache) {
    let pages = cache.entries_with_prefix::<PagedResult>(&["pokemons"]);
    let mut by_id: BTreeMap<EntityId, CatalogEntry> = BTreeMap::new();
    for (_, page) in &pages {
        for entry in &page.entries {
            by_id.entry(entry.id).or_insert_with(|| entry.clone());
        }
    }
    log::debug!(
        "Search cache warmed with {} entries from {} pages",
        by_id.len(),
        pages.len()
    );
    cache.set_data(QueryKey::search_cache(), by_id.into_values().collect::<Vec<_>>());
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
