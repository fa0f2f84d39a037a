use std::sync::Arc;

use pokedex_api::{ApiError, CatalogSource, PokeApiClient};
use pokedex_core::{CatalogEntry, EntityId};

use crate::detail::DetailComposer;
use crate::error::QueryError;
use crate::loader::from_source;
use crate::pagination::Paginator;
use crate::query_cache::{QueryCache, QueryKey};
use crate::search::{SearchCoordinator, SearchOptions};
use crate::settings::Settings;

/// One application session: a catalog source, the settings it was opened
/// with and the query cache every coordinator handed out here shares.
///
/// Call [`shutdown`](Self::shutdown) when done; it cancels background loads.
pub struct CatalogSession<S: CatalogSource> {
    cache: QueryCache,
    source: Arc<S>,
    settings: Settings,
}

impl CatalogSession<PokeApiClient> {
    /// Session against the HTTP catalog API configured in `settings`.
    pub fn connect(settings: Settings) -> Result<Self, ApiError> {
        let client = PokeApiClient::new(settings.api_config())?;
        log::debug!("Catalog session using {}", settings.api.base_url);
        Ok(Self::new(Arc::new(client), settings))
    }
}

impl<S: CatalogSource> CatalogSession<S> {
    pub fn new(source: Arc<S>, settings: Settings) -> Self {
        Self {
            cache: QueryCache::with_gc_time(settings.gc_time()),
            source,
            settings,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn paginator(&self) -> Paginator<S> {
        Paginator::new(
            self.cache.clone(),
            self.source.clone(),
            self.settings.paging.page_size,
            self.settings.listing_stale(),
        )
    }

    pub fn detail(&self) -> DetailComposer<S> {
        DetailComposer::new(
            self.cache.clone(),
            self.source.clone(),
            self.settings.detail_stale(),
        )
    }

    pub fn search(&self) -> SearchCoordinator<S> {
        SearchCoordinator::new(
            self.cache.clone(),
            self.source.clone(),
            SearchOptions::from_settings(&self.settings),
        )
    }

    /// Catalog entry for `id`, built from the cached entity record.
    pub async fn entry(&self, id: EntityId) -> Result<CatalogEntry, QueryError> {
        let record = self
            .cache
            .fetch(
                QueryKey::entity(id),
                self.settings.detail_stale(),
                from_source(&self.source, move |s| async move { s.entity(id).await }),
            )
            .await?;
        let url = self.source_url(id);
        Ok(pokedex_api::entry_from_record(self.source.as_ref(), &record, &url))
    }

    fn source_url(&self, id: EntityId) -> String {
        format!(
            "{}/pokemon/{}/",
            self.settings.api.base_url.trim_end_matches('/'),
            id
        )
    }

    /// Cancel in-flight loads and drop every cached entry.
    pub fn shutdown(&self) {
        log::debug!("Shutting down catalog session ({} cached queries)", self.cache.len());
        self.cache.clear();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
