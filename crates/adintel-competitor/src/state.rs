//! Explicit state container for the competitor module.
//!
//! All domain state lives here and is mutated only through the methods
//! below; the desk passes the container around by reference, so there is no
//! ambient singleton. Feeds are bounded: the status feed keeps the 5 most
//! recent entries and the watchlist activity log keeps 8, oldest evicted
//! first.

use std::collections::HashSet;

use chrono::Utc;
use serde_json::Value;

use crate::normalize::empty_response;
use crate::types::{
    CompetitorAd, HistoryRecord, Platform, PlatformMap, PlatformResponse, PlatformStatus,
    WatchlistActivity, WatchlistItem,
};

pub const MAX_STATUS_FEED: usize = 5;
pub const MAX_ACTIVITY_FEED: usize = 8;

/// Parameters of the most recent search, kept for the UI to re-run it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSearch {
    pub brand: String,
    pub region: String,
    pub limit: u32,
}

#[derive(Debug)]
pub struct CompetitorState {
    /// Canonical response per platform, replaced wholesale on each search.
    pub platform_responses: PlatformMap<PlatformResponse>,
    /// Flat mirror of the current `Data`-mode ads for list rendering.
    pub search_results: Vec<CompetitorAd>,
    /// Rolling status feed, newest first, capped at [`MAX_STATUS_FEED`].
    pub recent_platform_statuses: Vec<PlatformStatus>,
    /// Ads flagged for deeper analysis, insertion-ordered, no duplicates.
    pub selected_ads: Vec<CompetitorAd>,
    pub search_history: Vec<HistoryRecord>,
    pub brand_suggestions: Vec<String>,

    pub ai_suggestion: Option<Value>,
    pub ai_analysis: Option<Value>,
    pub patterns: Option<Value>,
    pub ab_test_variations: Vec<Value>,

    pub fetching_ads: bool,
    pub analyzing: bool,
    pub loading_history: bool,
    pub loading_suggestions: bool,

    pub search_error: Option<String>,
    pub fetch_error: Option<String>,
    pub analysis_error: Option<String>,

    pub last_search: Option<LastSearch>,

    pub watchlist: Vec<WatchlistItem>,
    /// Refresh log, newest first, capped at [`MAX_ACTIVITY_FEED`].
    pub watchlist_activity: Vec<WatchlistActivity>,
    /// Item ids currently refreshing; lets the UI disable per-item controls.
    /// Does not serialize refreshes.
    pub watchlist_refreshing: HashSet<String>,

    /// Searches currently in flight (any platform).
    in_flight_searches: u32,
    /// Monotonic ticket per platform; a response is applied only if no newer
    /// request was issued for that platform in the meantime.
    issued_tickets: PlatformMap<u64>,
}

impl Default for CompetitorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CompetitorState {
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            platform_responses: PlatformMap::from_fn(|platform| empty_response(platform, now)),
            search_results: Vec::new(),
            recent_platform_statuses: Vec::new(),
            selected_ads: Vec::new(),
            search_history: Vec::new(),
            brand_suggestions: Vec::new(),
            ai_suggestion: None,
            ai_analysis: None,
            patterns: None,
            ab_test_variations: Vec::new(),
            fetching_ads: false,
            analyzing: false,
            loading_history: false,
            loading_suggestions: false,
            search_error: None,
            fetch_error: None,
            analysis_error: None,
            last_search: None,
            watchlist: Vec::new(),
            watchlist_activity: Vec::new(),
            watchlist_refreshing: HashSet::new(),
            in_flight_searches: 0,
            issued_tickets: PlatformMap::default(),
        }
    }

    /// Whether any search is in flight.
    #[must_use]
    pub fn searching(&self) -> bool {
        self.in_flight_searches > 0
    }

    /// Register a new search: clears the previous search error and issues a
    /// ticket for the platform. Must be paired with [`finish_search`].
    ///
    /// [`finish_search`]: CompetitorState::finish_search
    pub fn begin_search(&mut self, platform: Platform) -> u64 {
        self.in_flight_searches += 1;
        self.search_error = None;
        let ticket = self.issued_tickets.get_mut(platform);
        *ticket += 1;
        *ticket
    }

    pub fn finish_search(&mut self) {
        self.in_flight_searches = self.in_flight_searches.saturating_sub(1);
    }

    /// Whether the ticket still corresponds to the newest request issued for
    /// its platform. Stale tickets mean a superseding search has started and
    /// this response must not clobber state.
    #[must_use]
    pub fn ticket_is_current(&self, platform: Platform, ticket: u64) -> bool {
        *self.issued_tickets.get(platform) == ticket
    }

    /// Replace the platform's canonical response and mirror its ads into the
    /// flat result list when (and only when) structured data came back.
    pub fn store_platform_response(&mut self, response: PlatformResponse) {
        if response.success {
            self.search_results = response.ads.clone();
        } else {
            self.search_results.clear();
        }
        let platform = response.platform;
        *self.platform_responses.get_mut(platform) = response;
    }

    pub fn push_status(&mut self, status: PlatformStatus) {
        self.recent_platform_statuses.insert(0, status);
        self.recent_platform_statuses.truncate(MAX_STATUS_FEED);
    }

    pub fn push_activity(&mut self, activity: WatchlistActivity) {
        self.watchlist_activity.insert(0, activity);
        self.watchlist_activity.truncate(MAX_ACTIVITY_FEED);
    }

    /// Toggle selection membership by ad identifier. Returns `true` when the
    /// ad is selected after the call. Ads without an identifier are ignored.
    pub fn toggle_selected(&mut self, ad: &CompetitorAd) -> bool {
        let Some(key) = ad.key() else {
            tracing::debug!("ignoring selection toggle for ad without identifier");
            return false;
        };
        if let Some(pos) = self
            .selected_ads
            .iter()
            .position(|candidate| candidate.key() == Some(key))
        {
            self.selected_ads.remove(pos);
            false
        } else {
            self.selected_ads.push(ad.clone());
            true
        }
    }

    pub fn clear_selected(&mut self) {
        self.selected_ads.clear();
    }

    pub fn clear_ai_results(&mut self) {
        self.ai_suggestion = None;
        self.ai_analysis = None;
        self.patterns = None;
        self.ab_test_variations.clear();
    }

    pub fn clear_errors(&mut self) {
        self.search_error = None;
        self.fetch_error = None;
        self.analysis_error = None;
    }

    #[must_use]
    pub fn is_refreshing(&self, id: &str) -> bool {
        self.watchlist_refreshing.contains(id)
    }

    pub fn update_watchlist_item(&mut self, id: &str, apply: impl FnOnce(&mut WatchlistItem)) {
        if let Some(item) = self.watchlist.iter_mut().find(|item| item.id == id) {
            apply(item);
        }
    }

    /// Reset the transient UI-facing state; the watchlist and its activity
    /// log are left alone.
    pub fn reset(&mut self) {
        self.search_results.clear();
        self.selected_ads.clear();
        self.brand_suggestions.clear();
        self.clear_ai_results();
        self.clear_errors();
        self.last_search = None;
    }
}
