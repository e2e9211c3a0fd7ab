//! Ad selection and the AI analysis passthroughs.
//!
//! The AI operations do not interpret provider output; whatever JSON the
//! backend returns is stored verbatim in the corresponding state slot and
//! handed back to the caller. Only the A/B test call peeks inside, to lift
//! the `variations` array into its own slot.

use serde_json::Value;

use crate::desk::CompetitorDesk;
use crate::error::CompetitorError;
use crate::types::{AiProvider, CompetitorAd};

impl CompetitorDesk {
    /// Toggle an ad in or out of the selection. Returns whether the ad is
    /// selected after the call; ads without an identifier are ignored.
    pub fn toggle_ad_selection(&mut self, ad: &CompetitorAd) -> bool {
        self.state.toggle_selected(ad)
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selected();
    }

    /// Fetch specific ads by their public library URLs and make them the
    /// current selection.
    ///
    /// # Errors
    ///
    /// Propagates client errors after recording them in `fetch_error`; the
    /// previous selection is kept on failure.
    pub async fn fetch_ads_by_urls(
        &mut self,
        ad_urls: &[String],
    ) -> Result<Vec<CompetitorAd>, CompetitorError> {
        self.state.fetching_ads = true;
        self.state.fetch_error = None;

        let result = self.client.fetch_by_urls(ad_urls).await;
        self.state.fetching_ads = false;

        match result {
            Ok(fetched) => {
                self.state.selected_ads = fetched.ads.clone();
                Ok(fetched.ads)
            }
            Err(err) => {
                tracing::warn!(error = %err, "fetching ads by URL failed");
                self.state.fetch_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Generate a rewrite suggestion for the user's ad against one
    /// competitor ad.
    ///
    /// # Errors
    ///
    /// Propagates client errors after recording them in `analysis_error`.
    pub async fn generate_suggestion(
        &mut self,
        competitor_ad: &CompetitorAd,
        my_ad: &Value,
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.state.analyzing = true;
        self.state.analysis_error = None;

        let result = self.client.suggest_rewrite(competitor_ad, my_ad, provider).await;
        self.state.analyzing = false;

        match result {
            Ok(value) => {
                self.state.ai_suggestion = Some(value.clone());
                Ok(value)
            }
            Err(err) => self.record_analysis_error(err, "rewrite suggestion failed"),
        }
    }

    /// Run a single-ad analysis.
    ///
    /// # Errors
    ///
    /// Propagates client errors after recording them in `analysis_error`.
    pub async fn analyze_competitor_ad(
        &mut self,
        competitor_ad: &CompetitorAd,
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.state.analyzing = true;
        self.state.analysis_error = None;

        let result = self.client.analyze(competitor_ad, provider).await;
        self.state.analyzing = false;

        match result {
            Ok(value) => {
                self.state.ai_analysis = Some(value.clone());
                Ok(value)
            }
            Err(err) => self.record_analysis_error(err, "ad analysis failed"),
        }
    }

    /// Mine recurring patterns across the given competitor ads.
    ///
    /// # Errors
    ///
    /// Propagates client errors after recording them in `analysis_error`.
    pub async fn identify_patterns(
        &mut self,
        competitor_ads: &[CompetitorAd],
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.state.analyzing = true;
        self.state.analysis_error = None;

        let result = self.client.identify_patterns(competitor_ads, provider).await;
        self.state.analyzing = false;

        match result {
            Ok(value) => {
                self.state.patterns = Some(value.clone());
                Ok(value)
            }
            Err(err) => self.record_analysis_error(err, "pattern identification failed"),
        }
    }

    /// Generate A/B test variations of the user's ad. The full provider
    /// response is returned; the `variations` array, if present, also lands
    /// in `ab_test_variations`.
    ///
    /// # Errors
    ///
    /// Propagates client errors after recording them in `analysis_error`.
    pub async fn generate_ab_test(
        &mut self,
        competitor_ad: &CompetitorAd,
        my_ad: &Value,
        variation_count: u32,
        provider: AiProvider,
    ) -> Result<Value, CompetitorError> {
        self.state.analyzing = true;
        self.state.analysis_error = None;

        let result = self
            .client
            .generate_ab_test(competitor_ad, my_ad, variation_count, provider)
            .await;
        self.state.analyzing = false;

        match result {
            Ok(value) => {
                self.state.ab_test_variations = value
                    .get("variations")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                Ok(value)
            }
            Err(err) => self.record_analysis_error(err, "A/B test generation failed"),
        }
    }

    fn record_analysis_error(
        &mut self,
        err: CompetitorError,
        context: &str,
    ) -> Result<Value, CompetitorError> {
        tracing::warn!(error = %err, "{context}");
        self.state.analysis_error = Some(err.to_string());
        Err(err)
    }
}
