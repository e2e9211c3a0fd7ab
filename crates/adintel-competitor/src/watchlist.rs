//! Watchlist engine: persisted brand watches, on-demand refreshes, and the
//! bounded activity log.
//!
//! Refreshes reuse the search normalization path, so an item's stored
//! message is the same user-facing sentence a live search would produce.
//! "Has new" compares the fresh result count with the previous one; a first
//! refresh treats any non-zero count as new.

use chrono::Utc;
use uuid::Uuid;

use adintel_core::{find_location_preset, SearchEngine};

use crate::desk::CompetitorDesk;
use crate::error::CompetitorError;
use crate::normalize::{normalize, GLOBAL_REGION};
use crate::storage::{parse_engine, StoredWatchlistItem};
use crate::types::{Platform, PlatformResponse, SearchQuery, WatchlistActivity, WatchlistItem};

/// Input for a new watchlist entry; unset fields fall back to configured
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct NewWatchlistItem {
    pub brand_name: String,
    pub platform: Option<Platform>,
    pub engine: Option<SearchEngine>,
    pub region: Option<String>,
    pub limit: Option<u32>,
}

impl CompetitorDesk {
    /// Load the persisted watchlist, normalize legacy entries to the
    /// canonical shape, and re-persist the result.
    ///
    /// Entries without a usable brand name are dropped with a warning;
    /// everything else is repaired in place (missing ids get fresh ones,
    /// unknown platforms fall back to Facebook, regions resolve through the
    /// legacy field chain).
    pub fn init_watchlist(&mut self) {
        let stored = self.store.load();
        let mut items = Vec::with_capacity(stored.len());
        for entry in stored {
            match normalize_stored_item(entry, &self.config.default_region, self.config.default_limit)
            {
                Some(item) => items.push(item),
                None => tracing::warn!("dropping stored watchlist entry without a brand name"),
            }
        }
        tracing::debug!(count = items.len(), "watchlist initialized");
        self.state.watchlist = items;
        self.store.save(&self.state.watchlist);
    }

    /// Add a brand to the watchlist and persist the updated list.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Validation`] when the brand name is blank;
    /// nothing is mutated in that case.
    pub fn add_watchlist_item(
        &mut self,
        new: NewWatchlistItem,
    ) -> Result<WatchlistItem, CompetitorError> {
        let brand = new.brand_name.trim();
        if brand.is_empty() {
            return Err(CompetitorError::Validation(
                "brand name is required".to_string(),
            ));
        }

        let item = WatchlistItem {
            id: format!("watch-{}", Uuid::new_v4()),
            brand_name: brand.to_string(),
            platform: new.platform.unwrap_or(Platform::Facebook),
            engine: new.engine,
            region: new
                .region
                .map(|region| region.trim().to_string())
                .filter(|region| !region.is_empty())
                .unwrap_or_else(|| self.config.default_region.clone()),
            limit: new.limit.unwrap_or(self.config.default_limit),
            last_checked: None,
            last_result_count: None,
            has_new: false,
            last_message: None,
        };

        self.state.watchlist.insert(0, item.clone());
        self.store.save(&self.state.watchlist);
        Ok(item)
    }

    /// Remove an item by id and persist. Unknown ids are a no-op.
    pub fn remove_watchlist_item(&mut self, id: &str) {
        let before = self.state.watchlist.len();
        self.state.watchlist.retain(|item| item.id != id);
        if self.state.watchlist.len() != before {
            self.store.save(&self.state.watchlist);
        }
    }

    /// Re-run the item's search, update its snapshot fields, persist, and
    /// log an activity entry.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Validation`] for unknown ids without
    /// logging any activity. Search failures log an error activity, leave
    /// the item's snapshot untouched, and propagate the underlying error.
    pub async fn refresh_watchlist_item(
        &mut self,
        id: &str,
    ) -> Result<PlatformResponse, CompetitorError> {
        let Some(item) = self.state.watchlist.iter().find(|item| item.id == id).cloned() else {
            return Err(CompetitorError::Validation(format!(
                "unknown watchlist item: {id}"
            )));
        };

        self.state.watchlist_refreshing.insert(item.id.clone());
        let query = SearchQuery {
            platform: item.platform,
            brand: item.brand_name.clone(),
            region: item.region.clone(),
            limit: item.limit,
            engine: item.engine,
        };
        let result = self.client.search(&query).await;
        self.state.watchlist_refreshing.remove(&item.id);
        let now = Utc::now();

        match result {
            Ok(payload) => {
                let snapshot = normalize(item.platform, payload, &query, now);
                let count = snapshot.ads.len() as u64;
                let has_new = match item.last_result_count {
                    Some(previous) => count > previous,
                    None => count > 0,
                };

                self.state.update_watchlist_item(&item.id, |entry| {
                    entry.last_checked = Some(snapshot.timestamp);
                    entry.last_result_count = Some(count);
                    entry.has_new = has_new;
                    entry.last_message = Some(snapshot.user_message.clone());
                });
                self.store.save(&self.state.watchlist);

                self.state.push_activity(WatchlistActivity {
                    id: format!("{}-{}", item.id, now.to_rfc3339()),
                    brand_name: item.brand_name.clone(),
                    platform: item.platform,
                    region: item.region.clone(),
                    count,
                    has_new,
                    message: snapshot.user_message.clone(),
                    timestamp: snapshot.timestamp,
                    error: false,
                });
                Ok(snapshot)
            }
            Err(err) => {
                tracing::warn!(item = %item.id, error = %err, "watchlist refresh failed");
                self.state.push_activity(WatchlistActivity {
                    id: format!("{}-{}", item.id, now.to_rfc3339()),
                    brand_name: item.brand_name.clone(),
                    platform: item.platform,
                    region: item.region.clone(),
                    count: item.last_result_count.unwrap_or(0),
                    has_new: false,
                    message: err.to_string(),
                    timestamp: now,
                    error: true,
                });
                Err(err)
            }
        }
    }

    /// Refresh every watchlist item, one at a time in list order. Individual
    /// failures are logged (and already produce error activities) but never
    /// stop the sweep.
    pub async fn refresh_all_watchlist(&mut self) {
        let ids: Vec<String> = self.state.watchlist.iter().map(|item| item.id.clone()).collect();
        for id in ids {
            if let Err(err) = self.refresh_watchlist_item(&id).await {
                tracing::warn!(item = %id, error = %err, "skipping failed watchlist refresh");
            }
        }
    }

    /// Mark one item's results as seen.
    pub fn mark_watchlist_item_seen(&mut self, id: &str) {
        self.state.update_watchlist_item(id, |entry| entry.has_new = false);
        self.store.save(&self.state.watchlist);
    }
}

/// Repair one stored entry into the canonical in-memory shape.
///
/// Returns `None` when no brand name survives trimming. Region resolution
/// walks the legacy chain `region`, `country`, `locationKey`, `location`;
/// generic-platform values are mapped through the engine's location presets
/// so old free-form location strings become a country code (or `GLOBAL`).
#[must_use]
pub fn normalize_stored_item(
    stored: StoredWatchlistItem,
    default_region: &str,
    default_limit: u32,
) -> Option<WatchlistItem> {
    let brand_name = stored
        .brand_name
        .or(stored.query)
        .map(|brand| brand.trim().to_string())
        .filter(|brand| !brand.is_empty())?;

    let platform = stored
        .platform
        .as_deref()
        .and_then(Platform::parse)
        .unwrap_or(Platform::Facebook);
    let engine = stored.engine.as_deref().and_then(parse_engine);

    let region_candidate = [
        stored.region,
        stored.country,
        stored.location_key,
        stored.location,
    ]
    .into_iter()
    .flatten()
    .map(|value| value.trim().to_string())
    .find(|value| !value.is_empty());

    let region = match region_candidate {
        None => default_region.to_string(),
        Some(raw) if platform == Platform::Generic => {
            let preset = find_location_preset(&raw, engine.unwrap_or_default());
            if preset.country.is_empty() {
                GLOBAL_REGION.to_string()
            } else {
                preset.country.to_string()
            }
        }
        Some(raw) => raw,
    };

    let id = stored
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| format!("watch-{}", Uuid::new_v4()));

    Some(WatchlistItem {
        id,
        brand_name,
        platform,
        engine,
        region,
        limit: stored.limit.unwrap_or(default_limit),
        last_checked: stored.last_checked,
        last_result_count: stored.last_result_count,
        has_new: stored.has_new.unwrap_or(false),
        last_message: stored.last_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(brand: Option<&str>) -> StoredWatchlistItem {
        StoredWatchlistItem {
            brand_name: brand.map(str::to_string),
            ..StoredWatchlistItem::default()
        }
    }

    #[test]
    fn entry_without_brand_is_dropped() {
        assert!(normalize_stored_item(stored(None), "US", 5).is_none());
        assert!(normalize_stored_item(stored(Some("   ")), "US", 5).is_none());
    }

    #[test]
    fn legacy_query_field_supplies_the_brand() {
        let entry = StoredWatchlistItem {
            query: Some("  Acme  ".to_string()),
            ..StoredWatchlistItem::default()
        };
        let item = normalize_stored_item(entry, "US", 5).unwrap();
        assert_eq!(item.brand_name, "Acme");
        assert_eq!(item.platform, Platform::Facebook);
        assert_eq!(item.region, "US");
        assert_eq!(item.limit, 5);
        assert!(item.id.starts_with("watch-"));
    }

    #[test]
    fn region_chain_prefers_region_then_country() {
        let entry = StoredWatchlistItem {
            brand_name: Some("Acme".to_string()),
            country: Some("SG".to_string()),
            location: Some("Singapore".to_string()),
            ..StoredWatchlistItem::default()
        };
        let item = normalize_stored_item(entry, "US", 5).unwrap();
        assert_eq!(item.region, "SG");
    }

    #[test]
    fn generic_platform_resolves_region_through_presets() {
        let entry = StoredWatchlistItem {
            brand_name: Some("Acme".to_string()),
            platform: Some("generic".to_string()),
            engine: Some("linkedin_ad_library".to_string()),
            location_key: Some("vn".to_string()),
            ..StoredWatchlistItem::default()
        };
        let item = normalize_stored_item(entry, "US", 5).unwrap();
        assert_eq!(item.region, "VN");
        assert_eq!(item.engine, Some(SearchEngine::LinkedinAdLibrary));
    }

    #[test]
    fn generic_platform_global_preset_maps_to_global_region() {
        let entry = StoredWatchlistItem {
            brand_name: Some("Acme".to_string()),
            platform: Some("generic".to_string()),
            location_key: Some("global".to_string()),
            ..StoredWatchlistItem::default()
        };
        let item = normalize_stored_item(entry, "US", 5).unwrap();
        assert_eq!(item.region, GLOBAL_REGION);
    }

    #[test]
    fn existing_snapshot_fields_survive() {
        let entry = StoredWatchlistItem {
            id: Some("watch-1".to_string()),
            brand_name: Some("Acme".to_string()),
            platform: Some("google".to_string()),
            region: Some("DE".to_string()),
            limit: Some(10),
            last_result_count: Some(3),
            has_new: Some(true),
            last_message: Some("Found 3 ads".to_string()),
            ..StoredWatchlistItem::default()
        };
        let item = normalize_stored_item(entry, "US", 5).unwrap();
        assert_eq!(item.id, "watch-1");
        assert_eq!(item.platform, Platform::Google);
        assert_eq!(item.region, "DE");
        assert_eq!(item.limit, 10);
        assert_eq!(item.last_result_count, Some(3));
        assert!(item.has_new);
    }
}
