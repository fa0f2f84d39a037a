//! Listing and enrichment: turns raw API payloads into catalog records.

use futures::future::try_join_all;

use pokedex_core::{CatalogEntry, PagedResult};

use crate::error::ApiError;
use crate::source::CatalogSource;
use crate::types::EntityRecord;

/// Listing offset for a 1-based page number. Page 0 maps to offset 0.
pub fn page_offset(page: u32, page_size: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Build a catalog entry from an entity record.
pub fn entry_from_record<S: CatalogSource>(
    source: &S,
    record: &EntityRecord,
    source_url: &str,
) -> CatalogEntry {
    CatalogEntry {
        id: record.id,
        name: record.name.clone(),
        image_url: source.artwork_url(record.id),
        types: record.type_names(),
        source_url: source_url.to_string(),
    }
}

/// Fetch the entity behind a listing URL and map it to an entry.
pub async fn fetch_entry_at<S: CatalogSource>(
    source: &S,
    url: &str,
) -> Result<CatalogEntry, ApiError> {
    let record = source.entity_at(url).await?;
    Ok(entry_from_record(source, &record, url))
}

/// Fetch one listing page and enrich every item with its entity record.
///
/// Enrichment requests run concurrently; the first failure fails the whole
/// page. Neighbour pages are present exactly when the listing carries a
/// `next`/`previous` link.
pub async fn fetch_page<S: CatalogSource>(
    source: &S,
    page: u32,
    page_size: u32,
) -> Result<PagedResult, ApiError> {
    let listing = source.list(page_offset(page, page_size), page_size).await?;
    log::debug!(
        "Listing page {} returned {} of {} entries",
        page,
        listing.results.len(),
        listing.count
    );

    let entries = try_join_all(
        listing
            .results
            .iter()
            .map(|item| fetch_entry_at(source, &item.url)),
    )
    .await?;

    // page 0 reads the same window as page 1, so it links like page 1
    let window = page.max(1);
    Ok(PagedResult {
        entries,
        total_count: listing.count,
        next_page: listing.next.as_ref().map(|_| window + 1),
        previous_page: listing.previous.as_ref().map(|_| window - 1),
    })
}

#[cfg(test)]
#[path = "tests/fetch_tests.rs"]
mod tests;
