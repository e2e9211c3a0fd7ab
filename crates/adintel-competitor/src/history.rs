//! Server-side search history and brand autocomplete.

use crate::desk::CompetitorDesk;
use crate::error::CompetitorError;
use crate::types::HistoryPage;

/// Queries shorter than this never hit the network.
const MIN_SUGGESTION_QUERY_LEN: usize = 2;

impl CompetitorDesk {
    /// Load one page of search history into state.
    ///
    /// # Errors
    ///
    /// Propagates client errors; the previously loaded page is kept.
    pub async fn load_search_history(
        &mut self,
        page: u32,
        size: u32,
    ) -> Result<HistoryPage, CompetitorError> {
        self.state.loading_history = true;
        let result = self.client.history(page, size).await;
        self.state.loading_history = false;

        match result {
            Ok(history) => {
                self.state.search_history = history.content.clone();
                Ok(history)
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading search history failed");
                Err(err)
            }
        }
    }

    /// Brand-name autocomplete. Short queries and lookup failures both
    /// resolve to an empty list; suggestions are advisory, so errors are
    /// logged rather than surfaced.
    pub async fn load_brand_suggestions(&mut self, query: &str) -> Vec<String> {
        if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
            self.state.brand_suggestions.clear();
            return Vec::new();
        }

        self.state.loading_suggestions = true;
        let result = self.client.suggestions(query).await;
        self.state.loading_suggestions = false;

        match result {
            Ok(suggestions) => {
                self.state.brand_suggestions = suggestions.clone();
                suggestions
            }
            Err(err) => {
                tracing::warn!(error = %err, "loading brand suggestions failed");
                self.state.brand_suggestions.clear();
                Vec::new()
            }
        }
    }
}
