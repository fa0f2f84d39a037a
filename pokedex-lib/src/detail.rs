//! Detail view composition.
//!
//! One entity's detail view is built from up to five cached queries,
//! resolved as two concurrent dependency chains and a merge:
//!
//! - entity record, then the damage relations of its first two types;
//! - species metadata, then the evolution chain it links to;
//! - merge, by reading the settled cache state back with [`DetailComposer::snapshot`].
//!
//! A dependent query is never issued before its prerequisite has data.
//!
//! Because the merge reads cache state rather than arrival order, the
//! composite does not depend on which request finished first.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::Duration;

use pokedex_api::types::EvolutionStage;
use pokedex_api::{ApiError, CatalogSource, EntityRecord, EvolutionChain, SpeciesRecord, TypeRelations};
use pokedex_core::{EntityId, id_from_url};

use crate::error::QueryError;
use crate::loader::from_source;
use crate::query_cache::{CacheEntry, QueryCache, QueryKey};

/// The queries a composite is built from, in error-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constituent {
    Entity,
    Species,
    Evolution,
    Type1,
    Type2,
}

impl Constituent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Species => "species",
            Self::Evolution => "evolution chain",
            Self::Type1 => "first type",
            Self::Type2 => "second type",
        }
    }
}

const TYPE_SLOTS: [Constituent; 2] = [Constituent::Type1, Constituent::Type2];

/// Merged read of every constituent of one entity's detail view.
#[derive(Debug, Clone, Default)]
pub struct DetailComposite {
    pub id: EntityId,
    pub entity: Option<Arc<EntityRecord>>,
    pub species: Option<Arc<SpeciesRecord>>,
    pub evolution_chain: Option<Arc<EvolutionChain>>,
    /// Damage relations in type-slot order, at most two.
    pub type_relations: Vec<Arc<TypeRelations>>,
    /// True while any eligible constituent has not settled.
    pub is_loading: bool,
    errors: Vec<(Constituent, QueryError)>,
}

impl DetailComposite {
    fn absorb<T>(&mut self, which: Constituent, entry: CacheEntry<T>) -> Option<Arc<T>> {
        self.is_loading |= entry.is_pending();
        if let Some(error) = entry.error {
            self.errors.push((which, error));
        }
        entry.data
    }

    /// Highest-priority error (entity, species, evolution, type1, type2).
    pub fn error(&self) -> Option<&QueryError> {
        self.errors.first().map(|(_, e)| e)
    }

    /// Every constituent error, in priority order.
    pub fn errors(&self) -> &[(Constituent, QueryError)] {
        &self.errors
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.entity.as_ref().map(|e| e.name.as_str())
    }

    pub fn types(&self) -> Vec<String> {
        self.entity
            .as_ref()
            .map(|e| e.type_names())
            .unwrap_or_default()
    }

    /// Flavor text in `language`, or the first available one.
    pub fn description(&self, language: &str) -> Option<String> {
        self.species.as_ref()?.description_for(language)
    }

    pub fn genus(&self, language: &str) -> Option<&str> {
        self.species.as_ref()?.genus_for(language)
    }

    pub fn habitat(&self) -> Option<&str> {
        self.species
            .as_ref()?
            .habitat
            .as_ref()
            .map(|h| h.name.as_str())
    }

    pub fn evolution_stages(&self) -> Vec<EvolutionStage> {
        self.evolution_chain
            .as_ref()
            .map(|c| c.stages())
            .unwrap_or_default()
    }

    /// Union of the types every loaded type takes double damage from,
    /// first-seen order.
    pub fn weaknesses(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for relations in &self.type_relations {
            for attacker in &relations.damage_relations.double_damage_from {
                if !out.contains(&attacker.name) {
                    out.push(attacker.name.clone());
                }
            }
        }
        out
    }

    /// `(stat name, base value)` pairs in API order.
    pub fn stats(&self) -> Vec<(&str, u32)> {
        self.entity
            .as_ref()
            .map(|e| {
                e.stats
                    .iter()
                    .map(|s| (s.stat.name.as_str(), s.base_stat))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `(ability name, is hidden)` pairs.
    pub fn abilities(&self) -> Vec<(&str, bool)> {
        self.entity
            .as_ref()
            .map(|e| {
                e.abilities
                    .iter()
                    .map(|a| (a.ability.name.as_str(), a.is_hidden))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn moves(&self) -> Vec<&str> {
        self.entity
            .as_ref()
            .map(|e| e.moves.iter().map(|m| m.move_ref.name.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Type-relation queries an entity makes eligible: `(slot, type url, key)`.
/// A type whose url carries no id yields [`ApiError::InvalidId`] for its slot.
fn type_queries(entity: &EntityRecord) -> Vec<(Constituent, String, Result<QueryKey, QueryError>)> {
    entity
        .leading_types(TYPE_SLOTS.len())
        .zip(TYPE_SLOTS)
        .map(|(kind, slot)| {
            let key = id_from_url(&kind.url)
                .map(QueryKey::type_relations)
                .ok_or_else(|| QueryError::from(ApiError::InvalidId(kind.url.clone())));
            (slot, kind.url.clone(), key)
        })
        .collect()
}

pub struct DetailComposer<S: CatalogSource> {
    cache: QueryCache,
    source: Arc<S>,
    stale_time: Duration,
}

impl<S: CatalogSource> Clone for DetailComposer<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            source: self.source.clone(),
            stale_time: self.stale_time,
        }
    }
}

impl<S: CatalogSource> DetailComposer<S> {
    pub fn new(cache: QueryCache, source: Arc<S>, stale_time: Duration) -> Self {
        Self {
            cache,
            source,
            stale_time,
        }
    }

    /// Resolve every eligible constituent of `id` and return the merged view.
    ///
    /// Never fails as a whole: constituent failures are reported through
    /// [`DetailComposite::errors`].
    pub async fn resolve(&self, id: EntityId) -> DetailComposite {
        let entity_chain = async {
            if let Ok(entity) = self.entity(id).await {
                join_all(
                    type_queries(&entity)
                        .into_iter()
                        .filter_map(|(_, url, key)| Some(self.type_relations(key.ok()?, url))),
                )
                .await;
            }
        };
        let species_chain = async {
            if let Ok(species) = self.species(id).await {
                if let Some(url) = species.evolution_chain_url() {
                    let _ = self.evolution(url).await;
                }
            }
        };
        tokio::join!(entity_chain, species_chain);

        let composite = self.snapshot(id);
        log::debug!(
            "Detail {} resolved: {} errors, loading {}",
            id,
            composite.errors.len(),
            composite.is_loading
        );
        composite
    }

    /// Non-blocking merged read of whatever the cache holds for `id`.
    ///
    /// Entity and species are always required. The evolution chain counts
    /// once species data is present, type relations once entity data is.
    pub fn snapshot(&self, id: EntityId) -> DetailComposite {
        let mut composite = DetailComposite {
            id,
            ..Default::default()
        };
        composite.entity = composite.absorb(Constituent::Entity, self.cache.get(&QueryKey::entity(id)));
        composite.species =
            composite.absorb(Constituent::Species, self.cache.get(&QueryKey::species(id)));

        let chain_key = composite
            .species
            .as_ref()
            .and_then(|s| s.evolution_chain_url())
            .map(QueryKey::evolution);
        if let Some(key) = chain_key {
            composite.evolution_chain =
                composite.absorb(Constituent::Evolution, self.cache.get(&key));
        }

        let type_keys = composite.entity.as_deref().map(type_queries).unwrap_or_default();
        for (slot, _, key) in type_keys {
            let key = match key {
                Ok(key) => key,
                Err(e) => {
                    composite.errors.push((slot, e));
                    continue;
                }
            };
            if let Some(relations) = composite.absorb(slot, self.cache.get(&key)) {
                composite.type_relations.push(relations);
            }
        }
        composite
    }

    /// Warm entity and species of `id + 1` in the background.
    pub fn prefetch_next_entity(&self, id: EntityId) {
        if let Some(next) = id.checked_add(1) {
            self.prefetch(next);
        }
    }

    /// Warm entity and species of `id` in the background.
    pub fn prefetch(&self, id: EntityId) {
        self.cache.prefetch(
            QueryKey::entity(id),
            self.stale_time,
            from_source(&self.source, move |s| async move { s.entity(id).await }),
        );
        self.cache.prefetch(
            QueryKey::species(id),
            self.stale_time,
            from_source(&self.source, move |s| async move { s.species(id).await }),
        );
    }

    async fn entity(&self, id: EntityId) -> Result<Arc<EntityRecord>, QueryError> {
        self.cache
            .fetch(
                QueryKey::entity(id),
                self.stale_time,
                from_source(&self.source, move |s| async move { s.entity(id).await }),
            )
            .await
    }

    async fn species(&self, id: EntityId) -> Result<Arc<SpeciesRecord>, QueryError> {
        self.cache
            .fetch(
                QueryKey::species(id),
                self.stale_time,
                from_source(&self.source, move |s| async move { s.species(id).await }),
            )
            .await
    }

    async fn evolution(&self, url: &str) -> Result<Arc<EvolutionChain>, QueryError> {
        let owned = url.to_string();
        self.cache
            .fetch(
                QueryKey::evolution(url),
                self.stale_time,
                from_source(&self.source, move |s| async move {
                    s.evolution_chain(&owned).await
                }),
            )
            .await
    }

    async fn type_relations(
        &self,
        key: QueryKey,
        url: String,
    ) -> Result<Arc<TypeRelations>, QueryError> {
        self.cache
            .fetch(
                key,
                self.stale_time,
                from_source(&self.source, move |s| async move { s.type_relations(&url).await }),
            )
            .await
    }
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
