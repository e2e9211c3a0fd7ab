//! Integration tests for search history, brand suggestions, and the ad
//! fetch/analysis passthroughs, using wiremock HTTP mocks.

use adintel_competitor::{AiProvider, CompetitorAd, CompetitorDesk, MemoryStore};
use adintel_core::IntelConfig;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> IntelConfig {
    IntelConfig {
        api_base_url: base_url.to_string(),
        request_timeout_secs: 5,
        user_agent: "adintel-test".to_string(),
        default_region: "US".to_string(),
        default_limit: 5,
        watchlist_path: std::env::temp_dir().join("adintel-history-tests.json"),
        log_level: "debug".to_string(),
    }
}

fn test_desk(base_url: &str) -> CompetitorDesk {
    CompetitorDesk::with_store(test_config(base_url), Box::new(MemoryStore::new()))
        .expect("desk construction should not fail")
}

#[tokio::test]
async fn history_page_loads_into_state() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "content": [
            { "id": 1, "brandName": "Acme", "platform": "facebook", "resultCount": 5 },
            { "id": 2, "brandName": "Globex", "platform": "google", "resultCount": 0 }
        ],
        "totalElements": 12,
        "totalPages": 2,
        "number": 0,
        "size": 10
    });

    Mock::given(method("GET"))
        .and(path("/competitors/history"))
        .and(query_param("page", "0"))
        .and(query_param("size", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    let page = desk
        .load_search_history(0, 10)
        .await
        .expect("history should load");

    assert_eq!(page.total_elements, 12);
    assert_eq!(page.content.len(), 2);
    assert_eq!(desk.state.search_history.len(), 2);
    assert_eq!(desk.state.search_history[0].brand_name.as_deref(), Some("Acme"));
    assert!(!desk.state.loading_history);
}

#[tokio::test]
async fn history_failure_propagates_and_keeps_previous_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/competitors/history"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "message": "database unavailable" })),
        )
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    let result = desk.load_search_history(0, 10).await;

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(
        message.contains("database unavailable"),
        "expected backend message in error, got: {message}"
    );
    assert!(!desk.state.loading_history);
}

#[tokio::test]
async fn short_suggestion_query_skips_the_network() {
    // No mock mounted: any request would 404 and clear nothing gracefully,
    // but the short-circuit means no request is made at all.
    let server = MockServer::start().await;
    let mut desk = test_desk(&server.uri());
    desk.state.brand_suggestions = vec!["stale".to_string()];

    let suggestions = desk.load_brand_suggestions("a").await;

    assert!(suggestions.is_empty());
    assert!(desk.state.brand_suggestions.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[tokio::test]
async fn suggestions_load_into_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/competitors/suggestions"))
        .and(query_param("query", "ni"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "suggestions": ["Nike", "Nintendo"]
        })))
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    let suggestions = desk.load_brand_suggestions("ni").await;

    assert_eq!(suggestions, vec!["Nike".to_string(), "Nintendo".to_string()]);
    assert_eq!(desk.state.brand_suggestions, suggestions);
    assert!(!desk.state.loading_suggestions);
}

#[tokio::test]
async fn suggestion_failure_resolves_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/competitors/suggestions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    desk.state.brand_suggestions = vec!["stale".to_string()];

    let suggestions = desk.load_brand_suggestions("nike").await;

    assert!(suggestions.is_empty());
    assert!(desk.state.brand_suggestions.is_empty());
}

#[tokio::test]
async fn fetch_by_urls_replaces_the_selection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/competitors/ads/fetch"))
        .and(body_partial_json(serde_json::json!({
            "adUrls": ["https://example.com/ad/1"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ads": [{ "adLibraryId": "fetched-1", "headline": "Fetched" }]
        })))
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    desk.state.selected_ads.push(CompetitorAd {
        ad_library_id: Some("old".to_string()),
        ..CompetitorAd::default()
    });

    let ads = desk
        .fetch_ads_by_urls(&["https://example.com/ad/1".to_string()])
        .await
        .expect("fetch should succeed");

    assert_eq!(ads.len(), 1);
    assert_eq!(desk.state.selected_ads.len(), 1);
    assert_eq!(desk.state.selected_ads[0].key(), Some("fetched-1"));
    assert!(!desk.state.fetching_ads);
    assert!(desk.state.fetch_error.is_none());
}

#[tokio::test]
async fn failed_fetch_keeps_previous_selection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/competitors/ads/fetch"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    desk.state.selected_ads.push(CompetitorAd {
        ad_library_id: Some("old".to_string()),
        ..CompetitorAd::default()
    });

    let result = desk.fetch_ads_by_urls(&["https://example.com/ad/1".to_string()]).await;

    assert!(result.is_err());
    assert_eq!(desk.state.selected_ads.len(), 1);
    assert!(desk.state.fetch_error.is_some());
    assert!(!desk.state.fetching_ads);
}

#[tokio::test]
async fn ab_test_response_populates_the_variations_slot() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/competitors/ab-test"))
        .and(body_partial_json(serde_json::json!({
            "variationCount": 3,
            "aiProvider": "anthropic"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "variations": [
                { "headline": "Variant A" },
                { "headline": "Variant B" },
                { "headline": "Variant C" }
            ],
            "rationale": "tone shifts"
        })))
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    let ad = CompetitorAd {
        ad_library_id: Some("comp-1".to_string()),
        ..CompetitorAd::default()
    };
    let my_ad = serde_json::json!({ "headline": "Mine" });

    let value = desk
        .generate_ab_test(&ad, &my_ad, 3, AiProvider::Anthropic)
        .await
        .expect("ab test should succeed");

    assert_eq!(value["rationale"], "tone shifts");
    assert_eq!(desk.state.ab_test_variations.len(), 3);
    assert!(!desk.state.analyzing);
    assert!(desk.state.analysis_error.is_none());
}

#[tokio::test]
async fn analysis_failure_is_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/competitors/analyze"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "message": "provider quota exhausted" })),
        )
        .mount(&server)
        .await;

    let mut desk = test_desk(&server.uri());
    let ad = CompetitorAd {
        ad_library_id: Some("comp-1".to_string()),
        ..CompetitorAd::default()
    };

    let result = desk.analyze_competitor_ad(&ad, AiProvider::OpenAi).await;

    assert!(result.is_err());
    let recorded = desk.state.analysis_error.as_deref().expect("error recorded");
    assert!(recorded.contains("provider quota exhausted"));
    assert!(!desk.state.analyzing);
    assert!(desk.state.ai_analysis.is_none());
}
