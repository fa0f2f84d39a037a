pub mod client;
pub mod error;
pub mod fetch;
pub mod source;
pub mod types;

pub use client::{ApiConfig, PokeApiClient};
pub use error::ApiError;
pub use fetch::{entry_from_record, fetch_entry_at, fetch_page, page_offset};
pub use source::CatalogSource;
pub use types::{
    EntityRecord, EvolutionChain, EvolutionStage, ListingResponse, NamedResource, SpeciesRecord,
    TypeRelations,
};
