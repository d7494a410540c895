//! Market catalog for audience targeting.
//!
//! Markets are identified by a short code (`value`) and a display name
//! (`label`). The estimator keys its harder-access set off the code.

use serde::{Deserialize, Serialize};

/// A selectable target market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub value: String,
    pub label: String,
}

impl Country {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The default set of selectable markets.
pub fn default_countries() -> Vec<Country> {
    [
        ("us", "United States"),
        ("gb", "United Kingdom"),
        ("ca", "Canada"),
        ("au", "Australia"),
        ("de", "Germany"),
        ("fr", "France"),
        ("es", "Spain"),
        ("it", "Italy"),
        ("nl", "Netherlands"),
        ("se", "Sweden"),
        ("dk", "Denmark"),
        ("no", "Norway"),
        ("pl", "Poland"),
        ("pt", "Portugal"),
        ("ie", "Ireland"),
        ("ch", "Switzerland"),
        ("at", "Austria"),
        ("be", "Belgium"),
        ("br", "Brazil"),
        ("mx", "Mexico"),
        ("ar", "Argentina"),
        ("cn", "China"),
        ("jp", "Japan"),
        ("kr", "South Korea"),
        ("in", "India"),
        ("sg", "Singapore"),
        ("nz", "New Zealand"),
        ("za", "South Africa"),
        ("ae", "United Arab Emirates"),
        ("tr", "Turkey"),
    ]
    .into_iter()
    .map(|(value, label)| Country::new(value, label))
    .collect()
}

/// Look up a market by its code.
pub fn find_by_value(value: &str) -> Option<Country> {
    default_countries()
        .into_iter()
        .find(|c| c.value.eq_ignore_ascii_case(value))
}

/// Fuzzy-match free-text market suggestions against the catalog.
///
/// A suggestion matches a market when either its label contains the
/// suggestion or the suggestion contains the label (case-insensitive), or
/// when the suggestion equals the market code. Used when applying
/// contextual-configuration suggestions, so recall beats precision.
pub fn match_suggested(suggested: &[String]) -> Vec<Country> {
    default_countries()
        .into_iter()
        .filter(|country| {
            let label = country.label.to_lowercase();
            suggested.iter().any(|s| {
                let s = s.trim().to_lowercase();
                !s.is_empty()
                    && (label.contains(&s) || s.contains(&label) || s == country.value)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_countries_unique_values() {
        let countries = default_countries();
        let mut values: Vec<&str> = countries.iter().map(|c| c.value.as_str()).collect();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), countries.len());
    }

    #[test]
    fn test_find_by_value() {
        let country = find_by_value("gb").unwrap();
        assert_eq!(country.label, "United Kingdom");
        assert!(find_by_value("zz").is_none());
    }

    #[test]
    fn test_match_suggested_exact_label() {
        let matched = match_suggested(&["Germany".to_string()]);
        assert!(matched.iter().any(|c| c.value == "de"));
    }

    #[test]
    fn test_match_suggested_case_insensitive() {
        let matched = match_suggested(&["japan".to_string()]);
        assert!(matched.iter().any(|c| c.value == "jp"));
    }

    #[test]
    fn test_match_suggested_no_match() {
        let matched = match_suggested(&["Atlantis".to_string()]);
        assert!(matched.is_empty());
    }
}
