use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use pokedex_core::{EntityId, artwork_url};

use crate::error::ApiError;
use crate::source::CatalogSource;
use crate::types::{EntityRecord, EvolutionChain, ListingResponse, SpeciesRecord, TypeRelations};

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE_URL: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How to reach the catalog API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub artwork_base_url: String,
    pub timeout: Duration,
    /// Minimum spacing between two requests. Zero disables throttling.
    pub min_request_interval: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            artwork_base_url: DEFAULT_ARTWORK_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            min_request_interval: Duration::ZERO,
        }
    }
}

/// HTTP client for the public catalog API.
pub struct PokeApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    last_request: Arc<Mutex<Instant>>,
}

impl PokeApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            last_request: Arc::new(Mutex::new(Instant::now() - config.min_request_interval)),
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Absolute URL for a path below the configured base.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET `url` and decode the JSON body.
    ///
    /// 404 maps to [`ApiError::NotFound`], any other non-2xx status to
    /// [`ApiError::Status`]. Decode failures keep the head of the body for
    /// diagnosis.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        self.throttle().await;
        log::debug!("GET {}", url);

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            let head: String = text.chars().take(200).collect();
            ApiError::Parse(format!("{url}: {e}. Response: {head}"))
        })
    }

    /// Wait until at least `min_request_interval` has passed since the last
    /// request.
    async fn throttle(&self) {
        if self.config.min_request_interval.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.config.min_request_interval {
            tokio::time::sleep(self.config.min_request_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

impl CatalogSource for PokeApiClient {
    async fn list(&self, offset: u32, limit: u32) -> Result<ListingResponse, ApiError> {
        let url = self.url_for(&format!("pokemon?offset={offset}&limit={limit}"));
        self.get_json(&url).await
    }

    async fn entity(&self, id: EntityId) -> Result<EntityRecord, ApiError> {
        let url = self.url_for(&format!("pokemon/{id}"));
        self.get_json(&url).await
    }

    async fn entity_at(&self, url: &str) -> Result<EntityRecord, ApiError> {
        self.get_json(url).await
    }

    async fn species(&self, id: EntityId) -> Result<SpeciesRecord, ApiError> {
        let url = self.url_for(&format!("pokemon-species/{id}"));
        self.get_json(&url).await
    }

    async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, ApiError> {
        self.get_json(url).await
    }

    async fn type_relations(&self, url: &str) -> Result<TypeRelations, ApiError> {
        self.get_json(url).await
    }

    fn artwork_url(&self, id: EntityId) -> String {
        artwork_url(&self.config.artwork_base_url, id)
    }
}
