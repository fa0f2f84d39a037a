//! Caching and coordination layer between the catalog API and its frontends.
//!
//! A [`CatalogSession`] owns one [`QueryCache`] and hands out the three
//! coordinators that read through it: [`Paginator`], [`DetailComposer`] and
//! [`SearchCoordinator`]. Favorites and settings live next to them as plain
//! file-backed stores.

pub mod debounce;
pub mod detail;
pub mod error;
pub mod favorites;
pub mod pagination;
pub mod query_cache;
pub mod search;
pub mod session;
pub mod settings;

mod loader;

#[cfg(test)]
pub(crate) mod test_support;

pub use debounce::Debouncer;
pub use detail::{Constituent, DetailComposer, DetailComposite};
pub use error::{QueryError, StoreError};
pub use favorites::{FavoritesStore, JsonFavorites, MemoryFavorites};
pub use pagination::{DEFAULT_PAGE_SIZE, Paginator};
pub use query_cache::{CacheEntry, QueryCache, QueryKey};
pub use search::{SearchCoordinator, SearchOptions, SearchView};
pub use session::CatalogSession;
pub use settings::{Settings, settings_path};
