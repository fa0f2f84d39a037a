//! Application settings (API endpoints, cache windows, paging, search).
//!
//! The settings file is `~/.config/pokedex/settings.toml`. Every field is
//! optional; missing tables and keys fall back to built-in defaults.
//! Environment variables override the file, CLI flags override both.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::time::Duration;
use toml_edit::{DocumentMut, Item, Value};

use pokedex_api::ApiConfig;
use pokedex_api::client::{DEFAULT_ARTWORK_BASE_URL, DEFAULT_BASE_URL};

use crate::error::StoreError;

pub const ENV_API_URL: &str = "POKEDEX_API_URL";
pub const ENV_PAGE_SIZE: &str = "POKEDEX_PAGE_SIZE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub paging: PagingSettings,
    pub search: SearchSettings,
    pub detail: DetailSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub artwork_base_url: String,
    pub timeout_secs: u64,
    /// Minimum spacing between requests, 0 to disable.
    pub min_interval_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            artwork_base_url: DEFAULT_ARTWORK_BASE_URL.to_string(),
            timeout_secs: 30,
            min_interval_ms: 0,
        }
    }
}

/// Staleness windows, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub listing_stale_secs: u64,
    pub detail_stale_secs: u64,
    pub search_stale_secs: u64,
    /// Idle time after which an unused query is dropped.
    pub gc_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            listing_stale_secs: 5 * 60,
            detail_stale_secs: 5 * 60,
            search_stale_secs: 30 * 60,
            gc_secs: 30 * 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagingSettings {
    pub page_size: u32,
}

impl Default for PagingSettings {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
    pub min_term_len: usize,
    /// How many names are pulled from the listing endpoint to filter against.
    pub candidate_limit: u32,
    pub result_cap: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_term_len: 2,
            candidate_limit: 1200,
            result_cap: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailSettings {
    /// Language code for flavor text and genus.
    pub language: String,
}

impl Default for DetailSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

impl Settings {
    /// Settings from the default file with environment overrides applied.
    pub fn load() -> Result<Self, StoreError> {
        let mut settings = Self::load_from(&settings_path())?;
        settings.apply_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Parse the settings file at `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let settings: Self = toml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `POKEDEX_API_URL` / `POKEDEX_PAGE_SIZE` through `lookup`.
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            match raw.trim().parse::<u32>() {
                Ok(size) if size > 0 => self.paging.page_size = size,
                _ => log::warn!("Ignoring {}={:?}: not a positive integer", ENV_PAGE_SIZE, raw),
            }
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.paging.page_size == 0 {
            return Err(StoreError::config("paging.page_size must be at least 1"));
        }
        if self.search.result_cap == 0 {
            return Err(StoreError::config("search.result_cap must be at least 1"));
        }
        if self.search.min_term_len == 0 {
            return Err(StoreError::config("search.min_term_len must be at least 1"));
        }
        Ok(())
    }

    /// Pretty-printed TOML of every field, defaults included.
    pub fn to_toml(&self) -> Result<String, StoreError> {
        toml::to_string_pretty(self).map_err(|e| StoreError::config(e.to_string()))
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api.base_url.clone(),
            artwork_base_url: self.api.artwork_base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            min_request_interval: Duration::from_millis(self.api.min_interval_ms),
        }
    }

    pub fn listing_stale(&self) -> Duration {
        Duration::from_secs(self.cache.listing_stale_secs)
    }

    pub fn detail_stale(&self) -> Duration {
        Duration::from_secs(self.cache.detail_stale_secs)
    }

    pub fn search_stale(&self) -> Duration {
        Duration::from_secs(self.cache.search_stale_secs)
    }

    pub fn gc_time(&self) -> Duration {
        Duration::from_secs(self.cache.gc_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}

/// Canonical path to the settings file: `~/.config/pokedex/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("pokedex").join("settings.toml")
}

/// Set `section.key` in the default settings file.
pub fn save_value(dotted_key: &str, raw: &str) -> Result<(), StoreError> {
    save_value_at(&settings_path(), dotted_key, raw)
}

/// Set `section.key` to `raw` in the settings file at `path`.
///
/// Edits the document in place with `toml_edit`, so comments, key order
/// and unknown tables survive. `raw` is stored as an integer or boolean
/// when it parses as one, as a string otherwise. The result must still
/// deserialize into valid [`Settings`] or nothing is written.
pub fn save_value_at(path: &Path, dotted_key: &str, raw: &str) -> Result<(), StoreError> {
    let (section, key) = dotted_key
        .split_once('.')
        .filter(|(s, k)| !s.is_empty() && !k.is_empty())
        .ok_or_else(|| StoreError::config(format!("Expected <section>.<key>, got '{dotted_key}'")))?;

    let mut doc: DocumentMut = match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .parse()
            .map_err(|e| StoreError::config(format!("{}: {e}", path.display())))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DocumentMut::new(),
        Err(e) => return Err(e.into()),
    };

    let table = doc
        .entry(section)
        .or_insert_with(toml_edit::table)
        .as_table_like_mut()
        .ok_or_else(|| StoreError::config(format!("[{section}] is not a table")))?;
    let new_value = parse_scalar(raw);
    match table.get_mut(key).and_then(Item::as_value_mut) {
        Some(existing) => {
            // Keep the trailing comment and spacing of the old value.
            let decor = existing.decor().clone();
            *existing = new_value;
            *existing.decor_mut() = decor;
        }
        None => {
            table.insert(key, toml_edit::value(new_value));
        }
    }

    let serialized = doc.to_string();
    let parsed: Settings = toml::from_str(&serialized)
        .map_err(|e| StoreError::config(format!("Invalid value for {dotted_key}: {e}")))?;
    parsed.validate()?;

    // Write atomically
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, path)?;
    log::debug!("Set {} = {} in {}", dotted_key, raw, path.display());
    Ok(())
}

fn parse_scalar(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else if let Ok(b) = raw.parse::<bool>() {
        Value::from(b)
    } else {
        Value::from(raw)
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
