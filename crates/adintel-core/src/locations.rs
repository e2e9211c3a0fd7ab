//! Location presets for the generic ad-search providers.
//!
//! Each search engine exposes its own roster of supported regions. The UI
//! stores either the preset key, the ISO country code, or the full location
//! name; [`find_location_preset`] resolves any of the three back to a preset.

use serde::{Deserialize, Serialize};

/// External search provider behind the generic `/competitors/search` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchEngine {
    LinkedinAdLibrary,
    TiktokAdsLibrary,
}

impl SearchEngine {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchEngine::LinkedinAdLibrary => "linkedin_ad_library",
            SearchEngine::TiktokAdsLibrary => "tiktok_ads_library",
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        SearchEngine::LinkedinAdLibrary
    }
}

impl std::fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable search region for an engine.
///
/// `location` and `country` are empty for the global/all-regions preset.
/// `gl`/`hl` are the Google-style geolocation and interface-language hints
/// some providers accept; engines that ignore them leave them empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationPreset {
    pub key: &'static str,
    pub location: &'static str,
    pub country: &'static str,
    pub gl: &'static str,
    pub hl: &'static str,
    pub label: &'static str,
}

const fn preset(
    key: &'static str,
    location: &'static str,
    country: &'static str,
    gl: &'static str,
    hl: &'static str,
    label: &'static str,
) -> LocationPreset {
    LocationPreset {
        key,
        location,
        country,
        gl,
        hl,
        label,
    }
}

static LINKEDIN_PRESETS: &[LocationPreset] = &[
    preset("global", "", "", "", "", "Global"),
    preset("us", "United States", "US", "us", "en", "United States"),
    preset("gb", "United Kingdom", "GB", "gb", "en", "United Kingdom"),
    preset("vn", "Viet Nam", "VN", "vn", "vi", "Vietnam"),
    preset("au", "Australia", "AU", "au", "en", "Australia"),
    preset("de", "Germany", "DE", "de", "de", "Germany"),
    preset("fr", "France", "FR", "fr", "fr", "France"),
    preset("jp", "Japan", "JP", "jp", "ja", "Japan"),
    preset("sg", "Singapore", "SG", "sg", "en", "Singapore"),
];

static TIKTOK_PRESETS: &[LocationPreset] = &[
    preset("all", "", "all", "", "", "All Regions"),
    preset("at", "Austria", "AT", "", "", "Austria"),
    preset("be", "Belgium", "BE", "", "", "Belgium"),
    preset("bg", "Bulgaria", "BG", "", "", "Bulgaria"),
    preset("hr", "Croatia", "HR", "", "", "Croatia"),
    preset("cy", "Cyprus", "CY", "", "", "Cyprus"),
    preset("cz", "Czech Republic", "CZ", "", "", "Czech Republic"),
    preset("dk", "Denmark", "DK", "", "", "Denmark"),
    preset("ee", "Estonia", "EE", "", "", "Estonia"),
    preset("fi", "Finland", "FI", "", "", "Finland"),
    preset("fr", "France", "FR", "", "", "France"),
    preset("de", "Germany", "DE", "", "", "Germany"),
    preset("gr", "Greece", "GR", "", "", "Greece"),
    preset("hu", "Hungary", "HU", "", "", "Hungary"),
    preset("is", "Iceland", "IS", "", "", "Iceland"),
    preset("ie", "Ireland", "IE", "", "", "Ireland"),
    preset("it", "Italy", "IT", "", "", "Italy"),
    preset("lv", "Latvia", "LV", "", "", "Latvia"),
    preset("li", "Liechtenstein", "LI", "", "", "Liechtenstein"),
    preset("lt", "Lithuania", "LT", "", "", "Lithuania"),
    preset("lu", "Luxembourg", "LU", "", "", "Luxembourg"),
    preset("mt", "Malta", "MT", "", "", "Malta"),
    preset("nl", "Netherlands", "NL", "", "", "Netherlands"),
    preset("no", "Norway", "NO", "", "", "Norway"),
    preset("pl", "Poland", "PL", "", "", "Poland"),
    preset("pt", "Portugal", "PT", "", "", "Portugal"),
    preset("ro", "Romania", "RO", "", "", "Romania"),
    preset("sk", "Slovakia", "SK", "", "", "Slovakia"),
    preset("si", "Slovenia", "SI", "", "", "Slovenia"),
    preset("es", "Spain", "ES", "", "", "Spain"),
    preset("se", "Sweden", "SE", "", "", "Sweden"),
    preset("ch", "Switzerland", "CH", "", "", "Switzerland"),
    preset("tr", "Turkey", "TR", "", "", "Turkey"),
    preset("gb", "United Kingdom", "GB", "", "", "United Kingdom"),
];

/// All presets for the given engine, global/all-regions first.
#[must_use]
pub fn location_presets(engine: SearchEngine) -> &'static [LocationPreset] {
    match engine {
        SearchEngine::LinkedinAdLibrary => LINKEDIN_PRESETS,
        SearchEngine::TiktokAdsLibrary => TIKTOK_PRESETS,
    }
}

/// Resolve a stored value back to a preset.
///
/// Matches case-insensitively against the preset key, then the country code,
/// then the full location name. Unresolvable or empty values fall back to the
/// engine's first (global) preset.
#[must_use]
pub fn find_location_preset(value: &str, engine: SearchEngine) -> &'static LocationPreset {
    let presets = location_presets(engine);
    let needle = value.trim().to_lowercase();
    if needle.is_empty() {
        return &presets[0];
    }
    presets
        .iter()
        .find(|preset| {
            preset.key == needle
                || (!preset.country.is_empty() && preset.country.to_lowercase() == needle)
                || (!preset.location.is_empty() && preset.location.to_lowercase() == needle)
        })
        .unwrap_or(&presets[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_resolves_to_global() {
        let preset = find_location_preset("", SearchEngine::LinkedinAdLibrary);
        assert_eq!(preset.key, "global");
    }

    #[test]
    fn resolves_by_key() {
        let preset = find_location_preset("vn", SearchEngine::LinkedinAdLibrary);
        assert_eq!(preset.country, "VN");
    }

    #[test]
    fn resolves_by_country_code_case_insensitively() {
        let preset = find_location_preset("gb", SearchEngine::TiktokAdsLibrary);
        assert_eq!(preset.location, "United Kingdom");
        let upper = find_location_preset("GB", SearchEngine::TiktokAdsLibrary);
        assert_eq!(upper.key, preset.key);
    }

    #[test]
    fn resolves_by_full_location_name() {
        let preset = find_location_preset("United States", SearchEngine::LinkedinAdLibrary);
        assert_eq!(preset.key, "us");
    }

    #[test]
    fn unknown_value_falls_back_to_first_preset() {
        let preset = find_location_preset("atlantis", SearchEngine::TiktokAdsLibrary);
        assert_eq!(preset.key, "all");
    }

    #[test]
    fn engine_serde_uses_snake_case() {
        let json = serde_json::to_string(&SearchEngine::LinkedinAdLibrary).unwrap();
        assert_eq!(json, "\"linkedin_ad_library\"");
        let parsed: SearchEngine = serde_json::from_str("\"tiktok_ads_library\"").unwrap();
        assert_eq!(parsed, SearchEngine::TiktokAdsLibrary);
    }
}
