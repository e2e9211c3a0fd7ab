//! Search orchestration: one network round trip per call, every outcome
//! reduced to a canonical [`PlatformResponse`] before touching state.
//!
//! The interesting part is error handling. A non-2xx answer that still
//! carries a structured payload is normalized exactly like a success, so the
//! UI gets the platform's own explanation (rate limit, iframe fallback)
//! instead of a generic failure. Only transport-level or unstructured
//! failures take the synthesized-fallback path.

use chrono::Utc;

use crate::desk::CompetitorDesk;
use crate::error::CompetitorError;
use crate::normalize::{fallback_response, normalize};
use crate::state::LastSearch;
use crate::types::{PlatformResponse, PlatformStatus, ResponseMode, SearchQuery};

impl CompetitorDesk {
    /// Search one platform for a brand's ads and fold the outcome into state.
    ///
    /// Issues a request ticket before the round trip; if a newer search for
    /// the same platform starts while this one is in flight, the late
    /// response is still returned to the caller but never written to state.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error when the backend could not be
    /// reached or answered without a structured payload. Structured non-2xx
    /// answers are not errors here; they come back as a normalized response.
    pub async fn search_platform_ads(
        &mut self,
        query: SearchQuery,
    ) -> Result<PlatformResponse, CompetitorError> {
        let ticket = self.state.begin_search(query.platform);
        tracing::debug!(
            platform = %query.platform,
            brand = %query.brand,
            region = %query.region,
            "searching platform ads"
        );

        let result = self.client.search(&query).await;
        let now = Utc::now();

        let outcome = match result {
            Ok(payload) => {
                let normalized = normalize(query.platform, payload, &query, now);
                self.apply_search_outcome(ticket, &query, &normalized);
                Ok(normalized)
            }
            Err(CompetitorError::Backend { status, payload }) => {
                tracing::debug!(
                    platform = %query.platform,
                    status,
                    "normalizing structured backend failure"
                );
                let normalized = normalize(query.platform, payload, &query, now);
                self.apply_search_outcome(ticket, &query, &normalized);
                Ok(normalized)
            }
            Err(err) => {
                tracing::warn!(platform = %query.platform, error = %err, "platform search failed");
                let fallback = fallback_response(query.platform, &query, &err.to_string(), now);
                if self.state.ticket_is_current(query.platform, ticket) {
                    self.state.search_error = Some(fallback.user_message.clone());
                    self.state.store_platform_response(fallback.clone());
                    self.state.last_search = Some(LastSearch {
                        brand: query.brand.clone(),
                        region: query.region.clone(),
                        limit: query.limit,
                    });
                    self.state.push_status(PlatformStatus::from_response(&fallback));
                } else {
                    tracing::debug!(platform = %query.platform, "dropping stale search failure");
                }
                Err(err)
            }
        };

        self.state.finish_search();
        outcome
    }

    fn apply_search_outcome(
        &mut self,
        ticket: u64,
        query: &SearchQuery,
        normalized: &PlatformResponse,
    ) {
        if !self.state.ticket_is_current(query.platform, ticket) {
            tracing::debug!(platform = %query.platform, "dropping stale search response");
            return;
        }

        if normalized.mode == ResponseMode::Error {
            self.state.search_error = Some(normalized.user_message.clone());
        }
        self.state.store_platform_response(normalized.clone());
        self.state.last_search = Some(LastSearch {
            brand: query.brand.clone(),
            region: query.region.clone(),
            limit: query.limit,
        });
        self.state.push_status(PlatformStatus::from_response(normalized));
    }
}
