//! HTTP client for the `/competitors` REST boundary.
//!
//! Wraps `reqwest` with typed response deserialization and structured-error
//! extraction: non-2xx bodies that still carry a recognizable search payload
//! are surfaced as [`CompetitorError::Backend`] so the caller can normalize
//! them like successes instead of discarding the detail.

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::{json, Value};

use adintel_core::IntelConfig;

use crate::error::CompetitorError;
use crate::types::{
    AiProvider, BrandSuggestions, CompetitorAd, FetchedAds, HistoryPage, Platform,
    RawSearchPayload, SearchQuery,
};

/// Client for the campaign-management backend's competitor endpoints.
///
/// Use [`CompetitorClient::new`] for production or
/// [`CompetitorClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct CompetitorClient {
    client: Client,
    base_url: String,
}

impl CompetitorClient {
    /// Creates a client from the shared configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &IntelConfig) -> Result<Self, CompetitorError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with an explicit base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CompetitorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/competitors/{path}", self.base_url)
    }

    /// Run one search against the platform-appropriate endpoint.
    ///
    /// Exactly one network round trip; no retries.
    ///
    /// # Errors
    ///
    /// [`CompetitorError::Backend`] when the backend answered non-2xx with a
    /// structured payload, [`CompetitorError::Status`] for other non-2xx
    /// answers, [`CompetitorError::Http`] for transport failures.
    pub async fn search(&self, query: &SearchQuery) -> Result<RawSearchPayload, CompetitorError> {
        let path = match query.platform {
            Platform::Google => "search/google",
            Platform::Tiktok => "search/tiktok",
            Platform::Facebook | Platform::Generic => "search",
        };

        let mut body = json!({
            "brandName": query.brand,
            "region": query.region,
            "limit": query.limit,
        });
        if let (Platform::Generic, Some(engine)) = (query.platform, query.engine) {
            body["engine"] = json!(engine.as_str());
        }

        let response = self.client.post(self.url(path)).json(&body).send().await?;
        read_search_payload(response).await
    }

    /// Fetch specific competitor ads by their public URLs.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Status`] on non-2xx, [`CompetitorError::Http`]
    /// on transport failures.
    pub async fn fetch_by_urls(&self, ad_urls: &[String]) -> Result<FetchedAds, CompetitorError> {
        let response = self
            .client
            .post(self.url("ads/fetch"))
            .json(&json!({ "adUrls": ad_urls }))
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Load one page of server-side search history.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Status`] on non-2xx, [`CompetitorError::Http`]
    /// on transport failures.
    pub async fn history(&self, page: u32, size: u32) -> Result<HistoryPage, CompetitorError> {
        let response = self
            .client
            .get(self.url("history"))
            .query(&[("page", page), ("size", size)])
            .send()
            .await?;
        Ok(ensure_success(response).await?.json().await?)
    }

    /// Brand-name autocomplete.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Status`] on non-2xx, [`CompetitorError::Http`]
    /// on transport failures.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<String>, CompetitorError> {
        let response = self
            .client
            .get(self.url("suggestions"))
            .query(&[("query", query)])
            .send()
            .await?;
        let envelope: BrandSuggestions = ensure_success(response).await?.json().await?;
        Ok(envelope.suggestions)
    }

    /// Generate a rewrite suggestion from one competitor ad plus the user's
    /// own ad. The provider response is opaque JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Status`] on non-2xx, [`CompetitorError::Http`]
    /// on transport failures.
    pub async fn suggest_rewrite(
        &self,
        competitor_ad: &CompetitorAd,
        my_ad: &Value,
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.post_json(
            "comparison/suggest",
            &json!({
                "competitorAd": competitor_ad,
                "myAd": my_ad,
                "aiProvider": provider.as_str(),
            }),
        )
        .await
    }

    /// Analyze a single competitor ad.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Status`] on non-2xx, [`CompetitorError::Http`]
    /// on transport failures.
    pub async fn analyze(
        &self,
        competitor_ad: &CompetitorAd,
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.post_json(
            "analyze",
            &json!({
                "competitorAd": competitor_ad,
                "aiProvider": provider.as_str(),
            }),
        )
        .await
    }

    /// Mine recurring patterns across a set of competitor ads.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Status`] on non-2xx, [`CompetitorError::Http`]
    /// on transport failures.
    pub async fn identify_patterns(
        &self,
        competitor_ads: &[CompetitorAd],
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.post_json(
            "patterns",
            &json!({
                "competitorAds": competitor_ads,
                "aiProvider": provider.as_str(),
            }),
        )
        .await
    }

    /// Generate A/B test variations of the user's ad against a competitor ad.
    ///
    /// # Errors
    ///
    /// Returns [`CompetitorError::Status`] on non-2xx, [`CompetitorError::Http`]
    /// on transport failures.
    pub async fn generate_ab_test(
        &self,
        competitor_ad: &CompetitorAd,
        my_ad: &Value,
        variation_count: u32,
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.post_json(
            "ab-test",
            &json!({
                "competitorAd": competitor_ad,
                "myAd": my_ad,
                "variationCount": variation_count,
                "aiProvider": provider.as_str(),
            }),
        )
        .await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, CompetitorError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Ok(ensure_success(response).await?.json().await?)
    }
}

/// Decode a search response, preserving structured failure payloads.
async fn read_search_payload(response: Response) -> Result<RawSearchPayload, CompetitorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let status_code = status.as_u16();
    let body = response.text().await?;
    if let Ok(payload) = serde_json::from_str::<RawSearchPayload>(&body) {
        if payload.is_structured() {
            return Err(CompetitorError::Backend {
                status: status_code,
                payload,
            });
        }
        // Parsed but not informative; fall through with whatever free-form
        // error text the envelope carried.
        let message = payload
            .error
            .or(payload.message)
            .unwrap_or_else(|| body_snippet(&body));
        return Err(CompetitorError::Status {
            status: status_code,
            message,
        });
    }

    Err(CompetitorError::Status {
        status: status_code,
        message: body_snippet(&body),
    })
}

/// Map non-2xx responses to [`CompetitorError::Status`] with the most useful
/// message the body offers.
async fn ensure_success(response: Response) -> Result<Response, CompetitorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let body = response.text().await?;
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body_snippet(&body));

    Err(CompetitorError::Status {
        status: status_code,
        message,
    })
}

fn body_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    trimmed.chars().take(200).collect()
}
