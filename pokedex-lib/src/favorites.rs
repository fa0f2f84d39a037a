//! Favorites persistence.
//!
//! Favorites are keyed by entity id. The orchestration layer only goes
//! through [`FavoritesStore`]; it never keeps a copy of its own.

use std::path::{Path, PathBuf};

use pokedex_core::{CatalogEntry, EntityId};

use crate::error::StoreError;

/// Add / remove / membership capability over a favorites collection.
pub trait FavoritesStore {
    /// Add `entry`. Returns false if its id was already present.
    fn add(&mut self, entry: CatalogEntry) -> Result<bool, StoreError>;

    /// Remove the entry with `id`. Returns false if it was not present.
    fn remove(&mut self, id: EntityId) -> Result<bool, StoreError>;

    fn contains(&self, id: EntityId) -> bool;

    /// Favorites in insertion order.
    fn list(&self) -> &[CatalogEntry];

    /// Add when absent, remove when present. Returns whether `entry` is a
    /// favorite afterwards.
    fn toggle(&mut self, entry: CatalogEntry) -> Result<bool, StoreError> {
        if self.contains(entry.id) {
            self.remove(entry.id)?;
            Ok(false)
        } else {
            self.add(entry)?;
            Ok(true)
        }
    }
}

/// In-process favorites, lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavorites {
    entries: Vec<CatalogEntry>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FavoritesStore for MemoryFavorites {
    fn add(&mut self, entry: CatalogEntry) -> Result<bool, StoreError> {
        Ok(insert(&mut self.entries, entry))
    }

    fn remove(&mut self, id: EntityId) -> Result<bool, StoreError> {
        Ok(delete(&mut self.entries, id))
    }

    fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn list(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

fn insert(entries: &mut Vec<CatalogEntry>, entry: CatalogEntry) -> bool {
    if entries.iter().any(|e| e.id == entry.id) {
        return false;
    }
    entries.push(entry);
    true
}

fn delete(entries: &mut Vec<CatalogEntry>, id: EntityId) -> bool {
    let before = entries.len();
    entries.retain(|e| e.id != id);
    entries.len() != before
}

/// Favorites stored as a JSON array, rewritten after every change.
#[derive(Debug)]
pub struct JsonFavorites {
    path: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl JsonFavorites {
    /// Default location: `~/.local/share/pokedex/favorites.json`.
    pub fn default_path() -> PathBuf {
        let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data.join("pokedex").join("favorites.json")
    }

    /// Load favorites from `path`. A missing file is an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Loaded {} favorites from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl FavoritesStore for JsonFavorites {
    fn add(&mut self, entry: CatalogEntry) -> Result<bool, StoreError> {
        let changed = insert(&mut self.entries, entry);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    fn remove(&mut self, id: EntityId) -> Result<bool, StoreError> {
        let changed = delete(&mut self.entries, id);
        if changed {
            self.persist()?;
        }
        Ok(changed)
    }

    fn contains(&self, id: EntityId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn list(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

#[cfg(test)]
#[path = "tests/favorites_tests.rs"]
mod tests;
