//! Domain records shared by the fetcher, the orchestration layer and the CLI.

use serde::{Deserialize, Serialize};

pub mod element;
pub mod util;

pub use element::{ElementType, ElementTypeParseError, Rgb};
pub use util::{artwork_url, clean_flavor_text, id_from_url, total_pages};

/// Numeric identity of a catalog entity (the API's `id`).
pub type EntityId = u32;

/// One creature record as listed by the external catalog.
///
/// Immutable once fetched. `id` is the identity; `name` is unique within a
/// catalog as well, but that is guaranteed by the upstream data and never
/// checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntityId,
    pub name: String,
    pub image_url: String,
    /// Type names in slot order (e.g. `["grass", "poison"]`).
    pub types: Vec<String>,
    /// Resource URL the entry was enriched from.
    pub source_url: String,
}

impl CatalogEntry {
    /// Name with dashes turned into spaces, for display.
    pub fn display_name(&self) -> String {
        self.name.replace('-', " ")
    }

    /// Primary type, if the entry has any.
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

/// One page of the catalog listing, with neighbour pages derived from the
/// listing's `next`/`previous` links.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagedResult {
    pub entries: Vec<CatalogEntry>,
    pub total_count: u32,
    pub next_page: Option<u32>,
    pub previous_page: Option<u32>,
}

impl PagedResult {
    /// Number of pages for `page_size`, i.e. `ceil(total_count / page_size)`.
    pub fn total_pages(&self, page_size: u32) -> u32 {
        total_pages(self.total_count, page_size)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
