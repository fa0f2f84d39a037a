use std::future::Future;

use pokedex_core::EntityId;

use crate::error::ApiError;
use crate::types::{EntityRecord, EvolutionChain, ListingResponse, SpeciesRecord, TypeRelations};

/// Read access to the external catalog.
///
/// [`PokeApiClient`](crate::PokeApiClient) is the production implementation;
/// the orchestration layer is generic over this trait so it can be driven
/// by in-memory sources in tests. Returned futures are `Send` because the
/// query cache runs every load on its own task.
pub trait CatalogSource: Send + Sync + 'static {
    /// One window of the listing endpoint.
    fn list(
        &self,
        offset: u32,
        limit: u32,
    ) -> impl Future<Output = Result<ListingResponse, ApiError>> + Send;

    /// Entity record by numeric id.
    fn entity(&self, id: EntityId) -> impl Future<Output = Result<EntityRecord, ApiError>> + Send;

    /// Entity record by the resource URL a listing item points at.
    fn entity_at(&self, url: &str) -> impl Future<Output = Result<EntityRecord, ApiError>> + Send;

    /// Species metadata by entity id.
    fn species(&self, id: EntityId)
    -> impl Future<Output = Result<SpeciesRecord, ApiError>> + Send;

    /// Evolution chain by the URL embedded in a species record.
    fn evolution_chain(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<EvolutionChain, ApiError>> + Send;

    /// Damage relations by the URL embedded in an entity's type slot.
    fn type_relations(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<TypeRelations, ApiError>> + Send;

    /// Artwork URL for an entity id. Derived, never fetched.
    fn artwork_url(&self, id: EntityId) -> String;
}
