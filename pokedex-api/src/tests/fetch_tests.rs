use std::sync::atomic::{AtomicUsize, Ordering};

use pokedex_core::{EntityId, id_from_url};

use super::*;
use crate::types::{
    DamageRelations, EvolutionChain, ListingResponse, NamedResource, SpeciesRecord, TypeRelations,
    TypeSlot,
};

/// Catalog of `total` entities named `mon-<id>`, all of type "normal".
struct StubSource {
    total: u32,
    entity_calls: AtomicUsize,
    fail_id: Option<EntityId>,
}

impl StubSource {
    fn new(total: u32) -> Self {
        Self {
            total,
            entity_calls: AtomicUsize::new(0),
            fail_id: None,
        }
    }

    fn record(id: EntityId) -> EntityRecord {
        EntityRecord {
            id,
            name: format!("mon-{id}"),
            height: 0,
            weight: 0,
            types: vec![TypeSlot {
                slot: 1,
                kind: NamedResource {
                    name: "normal".to_string(),
                    url: "https://api.test/type/1/".to_string(),
                },
            }],
            stats: vec![],
            abilities: vec![],
            sprites: Default::default(),
            moves: vec![],
        }
    }
}

impl CatalogSource for StubSource {
    async fn list(&self, offset: u32, limit: u32) -> Result<ListingResponse, ApiError> {
        let end = (offset + limit).min(self.total);
        let results = (offset..end)
            .map(|i| NamedResource {
                name: format!("mon-{}", i + 1),
                url: format!("https://api.test/pokemon/{}/", i + 1),
            })
            .collect();
        Ok(ListingResponse {
            count: self.total,
            next: (end < self.total).then(|| "next".to_string()),
            previous: (offset > 0).then(|| "prev".to_string()),
            results,
        })
    }

    async fn entity(&self, id: EntityId) -> Result<EntityRecord, ApiError> {
        self.entity_calls.fetch_add(1, Ordering::SeqCst);
        if Some(id) == self.fail_id {
            return Err(ApiError::Status {
                status: 500,
                url: format!("pokemon/{id}"),
            });
        }
        Ok(Self::record(id))
    }

    async fn entity_at(&self, url: &str) -> Result<EntityRecord, ApiError> {
        let id = id_from_url(url)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ApiError::InvalidId(url.to_string()))?;
        self.entity(id).await
    }

    async fn species(&self, _id: EntityId) -> Result<SpeciesRecord, ApiError> {
        unimplemented!()
    }

    async fn evolution_chain(&self, _url: &str) -> Result<EvolutionChain, ApiError> {
        unimplemented!()
    }

    async fn type_relations(&self, _url: &str) -> Result<TypeRelations, ApiError> {
        Ok(TypeRelations {
            name: String::new(),
            damage_relations: DamageRelations::default(),
        })
    }

    fn artwork_url(&self, id: EntityId) -> String {
        format!("https://img.test/{id}.png")
    }
}

#[test]
fn page_offset_is_zero_based() {
    assert_eq!(page_offset(1, 20), 0);
    assert_eq!(page_offset(3, 20), 40);
    assert_eq!(page_offset(0, 20), 0);
}

#[tokio::test]
async fn first_page_has_no_previous() {
    let source = StubSource::new(50);
    let page = fetch_page(&source, 1, 20).await.unwrap();
    assert_eq!(page.entries.len(), 20);
    assert_eq!(page.total_count, 50);
    assert_eq!(page.previous_page, None);
    assert_eq!(page.next_page, Some(2));
}

#[tokio::test]
async fn page_zero_links_like_the_first_page() {
    let source = StubSource::new(50);
    let page = fetch_page(&source, 0, 20).await.unwrap();
    assert_eq!(page.entries.len(), 20);
    assert_eq!(page.entries[0].id, 1);
    assert_eq!(page.previous_page, None);
    assert_eq!(page.next_page, Some(2));
}

#[tokio::test]
async fn second_page_points_back_to_first() {
    let source = StubSource::new(50);
    let page = fetch_page(&source, 2, 20).await.unwrap();
    assert_eq!(page.previous_page, Some(1));
    assert_eq!(page.next_page, Some(3));
    assert_eq!(page.entries[0].id, 21);
}

#[tokio::test]
async fn last_page_has_no_next() {
    let source = StubSource::new(50);
    let page = fetch_page(&source, 3, 20).await.unwrap();
    assert_eq!(page.entries.len(), 10);
    assert_eq!(page.next_page, None);
}

#[tokio::test]
async fn entries_are_enriched_from_records() {
    let source = StubSource::new(5);
    let page = fetch_page(&source, 1, 20).await.unwrap();
    let first = &page.entries[0];
    assert_eq!(first.name, "mon-1");
    assert_eq!(first.types, vec!["normal"]);
    assert_eq!(first.image_url, "https://img.test/1.png");
    assert_eq!(first.source_url, "https://api.test/pokemon/1/");
    assert_eq!(source.entity_calls.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn enrichment_failure_fails_the_page() {
    let mut source = StubSource::new(5);
    source.fail_id = Some(3);
    let err = fetch_page(&source, 1, 20).await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn out_of_range_page_is_empty() {
    let source = StubSource::new(5);
    let page = fetch_page(&source, 9, 20).await.unwrap();
    assert!(page.is_empty());
    assert_eq!(page.total_count, 5);
}
