//! Watchlist persistence port.
//!
//! The engine is storage-agnostic: anything that can hand back the stored
//! item array and overwrite it wholesale satisfies [`WatchlistStore`]. The
//! whole list is written on every mutation, so a store never needs partial
//! updates. Corruption or I/O trouble is logged and degrades to an empty
//! list rather than aborting the caller; the watchlist is a convenience
//! cache, not a system of record.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adintel_core::SearchEngine;

use crate::types::WatchlistItem;

/// Lenient on-disk shape of one watchlist entry.
///
/// Older revisions of the product stored different field names (`query` vs
/// `brandName`, `country`/`location`/`locationKey` vs `region`), so every
/// field is optional here; `init_watchlist` resolves the fallback chains and
/// re-persists the canonical form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredWatchlistItem {
    pub id: Option<String>,
    pub brand_name: Option<String>,
    pub query: Option<String>,
    pub platform: Option<String>,
    pub engine: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub location_key: Option<String>,
    pub limit: Option<u32>,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_result_count: Option<u64>,
    pub has_new: Option<bool>,
    pub last_message: Option<String>,
}

impl From<&WatchlistItem> for StoredWatchlistItem {
    fn from(item: &WatchlistItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            brand_name: Some(item.brand_name.clone()),
            query: None,
            platform: Some(item.platform.as_str().to_string()),
            engine: item.engine.map(|engine| engine.as_str().to_string()),
            region: Some(item.region.clone()),
            country: None,
            location: None,
            location_key: None,
            limit: Some(item.limit),
            last_checked: item.last_checked,
            last_result_count: item.last_result_count,
            has_new: Some(item.has_new),
            last_message: item.last_message.clone(),
        }
    }
}

/// Parse a stored engine string; unknown values are dropped.
#[must_use]
pub fn parse_engine(value: &str) -> Option<SearchEngine> {
    match value.trim().to_lowercase().as_str() {
        "linkedin_ad_library" => Some(SearchEngine::LinkedinAdLibrary),
        "tiktok_ads_library" => Some(SearchEngine::TiktokAdsLibrary),
        _ => None,
    }
}

/// Durable home of the watchlist.
pub trait WatchlistStore {
    /// Read all stored entries. Implementations log and return an empty list
    /// on corruption or read failure; they never abort initialization.
    fn load(&mut self) -> Vec<StoredWatchlistItem>;

    /// Overwrite the stored list with the canonical in-memory one.
    /// Implementations log write failures; the in-memory list stays the
    /// source of truth for the session either way.
    fn save(&mut self, items: &[WatchlistItem]);
}

/// JSON-file-backed store: the whole list serialized under one path.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WatchlistStore for JsonFileStore {
    fn load(&mut self) -> Vec<StoredWatchlistItem> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read watchlist file");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "watchlist file is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&mut self, items: &[WatchlistItem]) {
        let stored: Vec<StoredWatchlistItem> = items.iter().map(StoredWatchlistItem::from).collect();
        let serialized = match serde_json::to_string_pretty(&stored) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize watchlist");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, serialized) {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to persist watchlist");
        }
    }
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    items: Vec<StoredWatchlistItem>,
    save_count: usize,
}

/// In-memory store for tests and ephemeral embedding.
///
/// Clones share one backing list, so a test can hand a clone to the desk and
/// keep its own handle to observe what was persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw entries, as if a previous session wrote them.
    #[must_use]
    pub fn with_items(items: Vec<StoredWatchlistItem>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryStoreInner {
                items,
                save_count: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The most recently saved list, in stored form.
    #[must_use]
    pub fn items(&self) -> Vec<StoredWatchlistItem> {
        self.lock().items.clone()
    }

    /// Number of `save` calls observed; lets tests assert persistence
    /// happened (or didn't).
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }
}

impl WatchlistStore for MemoryStore {
    fn load(&mut self) -> Vec<StoredWatchlistItem> {
        self.lock().items.clone()
    }

    fn save(&mut self, items: &[WatchlistItem]) {
        let mut inner = self.lock();
        inner.items = items.iter().map(StoredWatchlistItem::from).collect();
        inner.save_count += 1;
    }
}
