//! Platform payload normalization.
//!
//! Pure functions that turn a raw backend search payload plus the original
//! query into a canonical [`PlatformResponse`]. Every response in the crate
//! is built through [`seal`], so the derived `user_message` is always
//! produced by the same precedence rules and is never empty.

use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::types::{
    CompetitorAd, ErrorCode, Platform, PlatformResponse, RawSearchPayload, ResponseMode,
    SearchQuery,
};

/// Noun phrase used when no brand name was given.
const BRAND_PLACEHOLDER: &str = "this brand";

/// Region sentinel meaning "everywhere"; suppressed from derived messages.
pub const GLOBAL_REGION: &str = "GLOBAL";

/// Embeddable fallback URL for platforms that expose a public browse page.
///
/// Only Google Ads Transparency and TikTok Creative Center have URL
/// templates; the Facebook-style library is structured-API only and the
/// generic provider has no stable browse URL.
#[must_use]
pub fn iframe_fallback_url(platform: Platform, brand: &str, region: &str) -> Option<String> {
    let keyword = utf8_percent_encode(brand, NON_ALPHANUMERIC).to_string();
    match platform {
        Platform::Google => {
            let region = if region.trim().is_empty() { "US" } else { region };
            Some(format!(
                "https://adstransparency.google.com/?region={region}&q={keyword}"
            ))
        }
        Platform::Tiktok => Some(format!(
            "https://ads.tiktok.com/business/creativecenter/inspiration/topads/pc/en?keyword={keyword}"
        )),
        Platform::Facebook | Platform::Generic => None,
    }
}

/// Total inference function for the response mode.
///
/// A mode stated by the payload always wins; otherwise ads imply `Data`,
/// an available embed URL implies `Iframe`, and the remainder is `Empty`.
#[must_use]
pub fn infer_mode(
    payload_mode: Option<ResponseMode>,
    ads_present: bool,
    iframe_available: bool,
) -> ResponseMode {
    if let Some(mode) = payload_mode {
        return mode;
    }
    if ads_present {
        ResponseMode::Data
    } else if iframe_available {
        ResponseMode::Iframe
    } else {
        ResponseMode::Empty
    }
}

/// Everything [`seal`] needs to finish a [`PlatformResponse`].
struct ResponseParts {
    platform: Platform,
    mode: ResponseMode,
    ads: Vec<CompetitorAd>,
    total_results: u64,
    iframe_url: Option<String>,
    message: String,
    friendly_suggestion: String,
    error_code: Option<ErrorCode>,
    fallback_regions: Vec<String>,
    brand: Option<String>,
    region: Option<String>,
    retryable: Option<bool>,
    timestamp: DateTime<Utc>,
}

/// The single construction point for [`PlatformResponse`]: derives `success`
/// from the mode and `user_message` from the precedence rules.
fn seal(parts: ResponseParts) -> PlatformResponse {
    let user_message = build_user_message(&parts);
    PlatformResponse {
        platform: parts.platform,
        mode: parts.mode,
        success: parts.mode == ResponseMode::Data,
        ads: parts.ads,
        total_results: parts.total_results,
        iframe_url: parts.iframe_url,
        message: parts.message,
        user_message,
        friendly_suggestion: parts.friendly_suggestion,
        error_code: parts.error_code,
        fallback_regions: parts.fallback_regions,
        brand: parts.brand,
        region: parts.region,
        retryable: parts.retryable,
        timestamp: parts.timestamp,
    }
}

fn brand_phrase(brand: Option<&str>) -> String {
    match brand.map(str::trim) {
        Some(b) if !b.is_empty() => format!(" for \"{b}\""),
        _ => format!(" for {BRAND_PLACEHOLDER}"),
    }
}

fn region_phrase(region: Option<&str>) -> String {
    match region.map(str::trim) {
        Some(r) if !r.is_empty() && !r.eq_ignore_ascii_case(GLOBAL_REGION) => {
            format!(" in {}", r.to_uppercase())
        }
        _ => String::new(),
    }
}

/// Derive the user-facing status line. First match wins:
///
/// 1. backend message, when the mode is informative (data/empty/iframe);
/// 2. backend message, when the error code is one the backend phrases well;
/// 3. synthesized "found N ads" sentence;
/// 4. synthesized "no ads found" sentence;
/// 5. synthesized "embedded view" sentence;
/// 6. one fixed sentence per error code;
/// 7. the raw message, else a generic per-platform failure sentence.
fn build_user_message(parts: &ResponseParts) -> String {
    let label = parts.platform.label();
    let message = parts.message.trim();
    let brand_part = brand_phrase(parts.brand.as_deref());
    let region_part = region_phrase(parts.region.as_deref());

    if !message.is_empty()
        && matches!(
            parts.mode,
            ResponseMode::Data | ResponseMode::Empty | ResponseMode::Iframe
        )
    {
        return message.to_string();
    }

    if !message.is_empty()
        && matches!(
            parts.error_code,
            Some(
                ErrorCode::ConfigMissing
                    | ErrorCode::ValidationError
                    | ErrorCode::RegionUnsupported
                    | ErrorCode::NoResults
            )
        )
    {
        return message.to_string();
    }

    if parts.mode == ResponseMode::Data && !parts.ads.is_empty() {
        return format!(
            "Found {} ads on {label}{brand_part}{region_part}.",
            parts.ads.len()
        );
    }

    if parts.mode == ResponseMode::Empty || parts.error_code == Some(ErrorCode::NoResults) {
        return format!("No {label} ads found{brand_part}{region_part}.");
    }

    if parts.mode == ResponseMode::Iframe {
        return format!("Showing {label} in embedded view.");
    }

    match parts.error_code {
        Some(ErrorCode::ConfigMissing) => {
            return "This feature is not fully configured yet. Update the API key or contact an administrator.".to_string();
        }
        Some(ErrorCode::RegionUnsupported) => {
            let region = parts.region.as_deref().unwrap_or("");
            return format!(
                "{label} does not support the region {region}. Try a region such as US or SG."
            );
        }
        Some(ErrorCode::RateLimited | ErrorCode::QuotaExceeded) => {
            return format!("{label} is currently rate limited. Try again in a few minutes.");
        }
        Some(ErrorCode::ValidationError) => {
            return format!(
                "Could not search {label} ads because the search input is invalid. Check the keyword or region."
            );
        }
        Some(
            ErrorCode::ProviderError | ErrorCode::ClientError | ErrorCode::TemporaryError,
        ) => {
            return format!(
                "Could not load {label} data right now. Please try again later or use the embedded view."
            );
        }
        _ => {}
    }

    if !message.is_empty() {
        return message.to_string();
    }

    format!("Could not load {label} data. Please try again later or open {label} directly.")
}

/// Placeholder response a platform slot holds before its first search.
#[must_use]
pub fn empty_response(platform: Platform, now: DateTime<Utc>) -> PlatformResponse {
    seal(ResponseParts {
        platform,
        mode: ResponseMode::Empty,
        ads: Vec::new(),
        total_results: 0,
        iframe_url: None,
        message: String::new(),
        friendly_suggestion: String::new(),
        error_code: None,
        fallback_regions: Vec::new(),
        brand: None,
        region: None,
        retryable: None,
        timestamp: now,
    })
}

/// Normalize a Facebook-style ad library payload.
///
/// `Data` iff ads are present; this platform is structured-API only, so no
/// iframe fallback is ever produced.
#[must_use]
pub fn normalize_facebook(
    payload: RawSearchPayload,
    query: &SearchQuery,
    now: DateTime<Utc>,
) -> PlatformResponse {
    let ads = payload.ads;
    #[allow(clippy::cast_possible_truncation)]
    let total_results = payload.total_results.unwrap_or(ads.len() as u64);
    let has_ads = !ads.is_empty();
    let mode = if has_ads {
        ResponseMode::Data
    } else {
        ResponseMode::Empty
    };

    let message = match payload.message.map(|m| m.trim().to_string()) {
        Some(m) if !m.is_empty() => m,
        _ if has_ads => format!("Found {total_results} Facebook ads for {}", query.brand),
        _ => format!("No Facebook ads found for {}.", query.brand),
    };

    let friendly_suggestion = if has_ads {
        String::new()
    } else {
        "Try a different keyword or another region to get more results.".to_string()
    };

    seal(ResponseParts {
        platform: Platform::Facebook,
        mode,
        ads,
        total_results,
        iframe_url: None,
        message,
        friendly_suggestion,
        error_code: payload.error_code.as_deref().and_then(ErrorCode::parse),
        fallback_regions: payload.fallback_regions,
        brand: Some(query.brand.clone()),
        region: Some(query.region.clone()),
        retryable: payload.retryable,
        timestamp: now,
    })
}

/// Normalize a Google/TikTok/generic provider payload.
///
/// The mode is taken from the payload when stated, else inferred; an iframe
/// fallback URL is constructed from the platform template whenever the
/// payload does not carry one.
#[must_use]
pub fn normalize_provider(
    platform: Platform,
    payload: RawSearchPayload,
    query: &SearchQuery,
    now: DateTime<Utc>,
) -> PlatformResponse {
    let label = platform.label();
    let ads = payload.ads;
    let iframe_url = payload
        .iframe_url
        .filter(|url| !url.trim().is_empty())
        .or_else(|| iframe_fallback_url(platform, &query.brand, &query.region));

    let payload_mode = payload.mode.as_deref().and_then(ResponseMode::parse);
    let mode = infer_mode(payload_mode, !ads.is_empty(), iframe_url.is_some());

    #[allow(clippy::cast_possible_truncation)]
    let total_results = payload.total_results.unwrap_or(ads.len() as u64);

    let message = match payload.message.map(|m| m.trim().to_string()) {
        Some(m) if !m.is_empty() => m,
        _ if !ads.is_empty() => format!("Found {} {label} ads", ads.len()),
        _ => format!("No {label} ads found for {}.", query.brand),
    };

    let friendly_suggestion = match payload.friendly_suggestion {
        Some(s) if !s.trim().is_empty() => s,
        _ if mode == ResponseMode::Data => String::new(),
        _ => "You can open the embedded view directly or try another region or keyword."
            .to_string(),
    };

    seal(ResponseParts {
        platform,
        mode,
        ads,
        total_results,
        iframe_url,
        message,
        friendly_suggestion,
        error_code: payload.error_code.as_deref().and_then(ErrorCode::parse),
        fallback_regions: payload.fallback_regions,
        brand: payload.brand_name.or_else(|| Some(query.brand.clone())),
        region: payload.region.or_else(|| Some(query.region.clone())),
        retryable: payload.retryable,
        timestamp: now,
    })
}

/// Dispatch to the platform-appropriate normalizer.
#[must_use]
pub fn normalize(
    platform: Platform,
    payload: RawSearchPayload,
    query: &SearchQuery,
    now: DateTime<Utc>,
) -> PlatformResponse {
    match platform {
        Platform::Facebook => normalize_facebook(payload, query, now),
        Platform::Google | Platform::Tiktok | Platform::Generic => {
            normalize_provider(platform, payload, query, now)
        }
    }
}

/// Synthesize a minimal response for a failure that carried no usable
/// payload: embedded view when the platform has a URL template, else a
/// plain error.
#[must_use]
pub fn fallback_response(
    platform: Platform,
    query: &SearchQuery,
    error_text: &str,
    now: DateTime<Utc>,
) -> PlatformResponse {
    let iframe_url = if platform == Platform::Facebook {
        None
    } else {
        iframe_fallback_url(platform, &query.brand, &query.region)
    };
    let mode = if iframe_url.is_some() {
        ResponseMode::Iframe
    } else {
        ResponseMode::Error
    };
    let friendly_suggestion = if platform == Platform::Facebook {
        "Please try again later or check your connection.".to_string()
    } else {
        "Falling back to the embedded view because the API is unavailable.".to_string()
    };

    seal(ResponseParts {
        platform,
        mode,
        ads: Vec::new(),
        total_results: 0,
        iframe_url,
        message: error_text.to_string(),
        friendly_suggestion,
        error_code: Some(ErrorCode::ClientError),
        fallback_regions: Vec::new(),
        brand: Some(query.brand.clone()),
        region: Some(query.region.clone()),
        retryable: None,
        timestamp: now,
    })
}
