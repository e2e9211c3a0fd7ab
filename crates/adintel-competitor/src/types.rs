//! Domain types for competitor-ad search and watchlist tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use adintel_core::SearchEngine;

/// One external ad-search source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Google,
    Tiktok,
    /// Generic web-search provider selected via a [`SearchEngine`]
    /// discriminator on the search request.
    Generic,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Google => "google",
            Platform::Tiktok => "tiktok",
            Platform::Generic => "generic",
        }
    }

    /// Human label used in derived status messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook & Instagram",
            Platform::Google => "Google Ads & YouTube",
            Platform::Tiktok => "TikTok",
            Platform::Generic => "Web Search",
        }
    }

    /// Case-insensitive parse of a stored platform string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "facebook" => Some(Platform::Facebook),
            "google" => Some(Platform::Google),
            "tiktok" => Some(Platform::Tiktok),
            "generic" => Some(Platform::Generic),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized outcome category of a platform search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Structured ads are present.
    Data,
    /// The call succeeded but returned zero results.
    Empty,
    /// No structured ads, but an embeddable fallback URL is available.
    Iframe,
    /// The call failed or the backend reported a structured failure.
    Error,
}

impl ResponseMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseMode::Data => "data",
            ResponseMode::Empty => "empty",
            ResponseMode::Iframe => "iframe",
            ResponseMode::Error => "error",
        }
    }

    /// Case-insensitive parse of a raw payload mode; unknown values are
    /// treated as absent so inference can take over.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "data" => Some(ResponseMode::Data),
            "empty" => Some(ResponseMode::Empty),
            "iframe" => Some(ResponseMode::Iframe),
            "error" => Some(ResponseMode::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured failure category reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ConfigMissing,
    ValidationError,
    RegionUnsupported,
    NoResults,
    RateLimited,
    QuotaExceeded,
    ProviderError,
    ClientError,
    TemporaryError,
}

impl ErrorCode {
    /// Case-insensitive parse; unknown codes are treated as absent.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "config_missing" => Some(ErrorCode::ConfigMissing),
            "validation_error" => Some(ErrorCode::ValidationError),
            "region_unsupported" => Some(ErrorCode::RegionUnsupported),
            "no_results" => Some(ErrorCode::NoResults),
            "rate_limited" => Some(ErrorCode::RateLimited),
            "quota_exceeded" => Some(ErrorCode::QuotaExceeded),
            "provider_error" => Some(ErrorCode::ProviderError),
            "client_error" => Some(ErrorCode::ClientError),
            "temporary_error" => Some(ErrorCode::TemporaryError),
            _ => None,
        }
    }
}

/// AI provider used for the analysis passthrough endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    Anthropic,
    Gemini,
    HuggingFace,
}

impl AiProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AiProvider::OpenAi => "openai",
            AiProvider::Anthropic => "anthropic",
            AiProvider::Gemini => "gemini",
            AiProvider::HuggingFace => "huggingface",
        }
    }
}

impl Default for AiProvider {
    fn default() -> Self {
        AiProvider::OpenAi
    }
}

/// A competitor ad normalized to the cross-platform field subset.
///
/// Raw platform payloads carry many more fields; everything unknown is
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorAd {
    /// Platform-assigned identifier; selection membership is keyed on this.
    #[serde(alias = "adId")]
    pub ad_library_id: Option<String>,
    pub headline: Option<String>,
    #[serde(alias = "primaryText")]
    pub body_text: Option<String>,
    pub call_to_action: Option<String>,
    pub advertiser_name: Option<String>,
    #[serde(alias = "videoUrl")]
    pub creative_url: Option<String>,
    #[serde(alias = "startDate")]
    pub first_seen: Option<String>,
    #[serde(alias = "endDate")]
    pub last_seen: Option<String>,
    /// Estimated audience/impression range, e.g. `"10K-50K"`.
    #[serde(alias = "estimatedImpressions")]
    pub estimated_audience: Option<String>,
}

impl CompetitorAd {
    /// Selection key. Ads without a platform identifier cannot be selected.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.ad_library_id.as_deref()
    }
}

/// Input to one search, constructed per request.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub platform: Platform,
    pub brand: String,
    pub region: String,
    pub limit: u32,
    /// Engine discriminator for [`Platform::Generic`]; ignored otherwise.
    pub engine: Option<SearchEngine>,
}

impl SearchQuery {
    #[must_use]
    pub fn new(platform: Platform, brand: impl Into<String>) -> Self {
        Self {
            platform,
            brand: brand.into(),
            region: "US".to_string(),
            limit: 5,
            engine: None,
        }
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn engine(mut self, engine: SearchEngine) -> Self {
        self.engine = Some(engine);
        self
    }
}

/// What the backend actually returns from a search endpoint, success or
/// structured failure alike. Every field is optional; normalization fills
/// the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSearchPayload {
    pub ads: Vec<CompetitorAd>,
    #[serde(alias = "total")]
    pub total_results: Option<u64>,
    pub mode: Option<String>,
    pub message: Option<String>,
    pub error_code: Option<String>,
    pub iframe_url: Option<String>,
    pub friendly_suggestion: Option<String>,
    pub fallback_regions: Vec<String>,
    pub retryable: Option<bool>,
    pub success: Option<bool>,
    pub brand_name: Option<String>,
    pub region: Option<String>,
    /// Free-form error string some backend failure envelopes carry.
    pub error: Option<String>,
}

impl RawSearchPayload {
    /// Whether the payload is structured enough to normalize like a success.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        self.mode.is_some() || self.message.is_some()
    }
}

/// Canonical normalized search result, one per platform, replaced (never
/// merged) on each new search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResponse {
    pub platform: Platform,
    pub mode: ResponseMode,
    /// True iff `mode == Data`.
    pub success: bool,
    pub ads: Vec<CompetitorAd>,
    /// May exceed `ads.len()` when the backend paginates.
    pub total_results: u64,
    pub iframe_url: Option<String>,
    /// Machine message from the backend, possibly empty.
    pub message: String,
    /// Derived human-readable status line; never empty.
    pub user_message: String,
    /// Actionable hint, possibly empty.
    pub friendly_suggestion: String,
    pub error_code: Option<ErrorCode>,
    pub fallback_regions: Vec<String>,
    pub brand: Option<String>,
    pub region: Option<String>,
    /// Tri-state: `None` means the backend gave no retry hint.
    pub retryable: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

/// Immutable entry of the rolling search status feed (capped at 5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformStatus {
    pub id: String,
    pub platform: Platform,
    pub platform_label: String,
    pub success: bool,
    pub mode: ResponseMode,
    pub message: String,
    pub user_message: String,
    pub friendly_suggestion: String,
    pub timestamp: DateTime<Utc>,
}

impl PlatformStatus {
    #[must_use]
    pub fn from_response(response: &PlatformResponse) -> Self {
        Self {
            id: format!(
                "{}-{}",
                response.platform,
                response.timestamp.to_rfc3339()
            ),
            platform: response.platform,
            platform_label: response.platform.label().to_string(),
            success: response.success,
            mode: response.mode,
            message: response.message.clone(),
            user_message: response.user_message.clone(),
            friendly_suggestion: response.friendly_suggestion.clone(),
            timestamp: response.timestamp,
        }
    }
}

/// Persisted recurring search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItem {
    pub id: String,
    pub brand_name: String,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<SearchEngine>,
    pub region: String,
    pub limit: u32,
    pub last_checked: Option<DateTime<Utc>>,
    pub last_result_count: Option<u64>,
    pub has_new: bool,
    pub last_message: Option<String>,
}

/// Append-only log entry for one watchlist refresh, success or failure
/// (capped at 8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistActivity {
    pub id: String,
    pub brand_name: String,
    pub platform: Platform,
    pub region: String,
    pub count: u64,
    pub has_new: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub error: bool,
}

/// One row of the server-side search history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRecord {
    pub id: Option<i64>,
    pub brand_name: Option<String>,
    pub platform: Option<String>,
    pub region: Option<String>,
    pub result_count: Option<u64>,
    pub created_at: Option<String>,
}

/// Spring-style page envelope for the history endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryPage {
    pub content: Vec<HistoryRecord>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
}

/// Ads fetched for explicit URLs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchedAds {
    pub ads: Vec<CompetitorAd>,
}

/// Brand-name autocomplete envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandSuggestions {
    pub suggestions: Vec<String>,
}

/// Fixed enum-keyed record with one slot per [`Platform`].
///
/// Replaces the string-keyed dictionaries of the original design: every
/// platform has a slot by construction, so no runtime existence checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformMap<T> {
    pub facebook: T,
    pub google: T,
    pub tiktok: T,
    pub generic: T,
}

impl<T> PlatformMap<T> {
    pub fn from_fn(mut make: impl FnMut(Platform) -> T) -> Self {
        Self {
            facebook: make(Platform::Facebook),
            google: make(Platform::Google),
            tiktok: make(Platform::Tiktok),
            generic: make(Platform::Generic),
        }
    }

    #[must_use]
    pub fn get(&self, platform: Platform) -> &T {
        match platform {
            Platform::Facebook => &self.facebook,
            Platform::Google => &self.google,
            Platform::Tiktok => &self.tiktok,
            Platform::Generic => &self.generic,
        }
    }

    pub fn get_mut(&mut self, platform: Platform) -> &mut T {
        match platform {
            Platform::Facebook => &mut self.facebook,
            Platform::Google => &mut self.google,
            Platform::Tiktok => &mut self.tiktok,
            Platform::Generic => &mut self.generic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_serde_round_trip() {
        let json = serde_json::to_string(&Platform::Tiktok).unwrap();
        assert_eq!(json, "\"tiktok\"");
        let parsed: Platform = serde_json::from_str("\"facebook\"").unwrap();
        assert_eq!(parsed, Platform::Facebook);
    }

    #[test]
    fn mode_parse_is_case_insensitive_and_lenient() {
        assert_eq!(ResponseMode::parse("DATA"), Some(ResponseMode::Data));
        assert_eq!(ResponseMode::parse(" iframe "), Some(ResponseMode::Iframe));
        assert_eq!(ResponseMode::parse("something-else"), None);
    }

    #[test]
    fn error_code_parse_unknown_is_none() {
        assert_eq!(ErrorCode::parse("rate_limited"), Some(ErrorCode::RateLimited));
        assert_eq!(ErrorCode::parse("tea_too_hot"), None);
    }

    #[test]
    fn raw_payload_accepts_sparse_bodies() {
        let payload: RawSearchPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.ads.is_empty());
        assert!(payload.mode.is_none());
        assert!(!payload.is_structured());

        let payload: RawSearchPayload =
            serde_json::from_str(r#"{"mode":"iframe","total":12}"#).unwrap();
        assert!(payload.is_structured());
        assert_eq!(payload.total_results, Some(12));
    }

    #[test]
    fn competitor_ad_accepts_backend_field_names() {
        let ad: CompetitorAd = serde_json::from_str(
            r#"{
                "adId": "123",
                "headline": "Big Sale",
                "primaryText": "Save now",
                "callToAction": "Shop Now",
                "advertiserName": "Acme",
                "startDate": "2024-01-01",
                "unknownField": true
            }"#,
        )
        .unwrap();
        assert_eq!(ad.key(), Some("123"));
        assert_eq!(ad.body_text.as_deref(), Some("Save now"));
        assert_eq!(ad.first_seen.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn platform_map_slots_are_independent() {
        let mut map: PlatformMap<u32> = PlatformMap::default();
        *map.get_mut(Platform::Google) = 7;
        assert_eq!(*map.get(Platform::Google), 7);
        assert_eq!(*map.get(Platform::Facebook), 0);
    }

    #[test]
    fn watchlist_item_round_trips_through_json() {
        let item = WatchlistItem {
            id: "watch-1".to_string(),
            brand_name: "Acme".to_string(),
            platform: Platform::Google,
            engine: None,
            region: "US".to_string(),
            limit: 5,
            last_checked: None,
            last_result_count: Some(3),
            has_new: true,
            last_message: Some("Found 3 ads".to_string()),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: WatchlistItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
