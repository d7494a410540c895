//! Project configuration: audience, add-ons, and incidence-rate state.
//!
//! A `SurveyConfiguration` is owned by the active editing session. It is
//! created with defaults when a template is activated and discarded whenever
//! the active template changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::countries::Country;

/// Smallest sample the platform will field.
pub const MIN_SAMPLE_SIZE: u32 = 51;

/// Default sample size for a fresh configuration.
pub const DEFAULT_SAMPLE_SIZE: u32 = 100;

/// Whether a media add-on applies to the whole sample or a chosen subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaPurpose {
    /// The whole (remaining) sample completes the media task.
    Quantitative,
    /// Only a configured number of respondents complete the media task.
    Qualitative,
}

/// Photo-collection add-on settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoConfig {
    pub purpose: MediaPurpose,
    pub num_photos: u32,
    pub description: String,
}

/// Video-collection add-on settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    pub purpose: MediaPurpose,
    pub num_videos: u32,
    pub description: String,
}

/// Tracking cadence for time-series studies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Weekly,
    Fortnightly,
    Monthly,
    Quarterly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Fortnightly => "fortnightly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
        }
    }

    /// Parse a free-text cadence suggestion, falling back to monthly.
    pub fn parse_or_monthly(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Self::Weekly,
            "fortnightly" => Self::Fortnightly,
            "quarterly" => Self::Quarterly,
            _ => Self::Monthly,
        }
    }
}

/// Time-series / tracking add-on settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesConfig {
    pub cadence: Cadence,
    pub num_waves: u32,
    pub start_date: Option<NaiveDate>,
    pub key_metric_focus: Vec<String>,
}

/// What a segmentation study is setting out to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationGoal {
    CreateNew,
    MapExisting,
}

/// Which bases a segmentation is built on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationBases {
    pub audiences: bool,
    pub occasions: bool,
    pub need_states: bool,
    pub jobs_to_be_done: bool,
    pub shopper_missions: bool,
}

/// Segmentation add-on settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationConfig {
    pub segmentation_goal: SegmentationGoal,
    pub segmentation_bases: SegmentationBases,
}

/// The full project configuration attached to the active editing session.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyConfiguration {
    sample_size: u32,
    pub selected_countries: Vec<Country>,
    pub photo_config: Option<PhotoConfig>,
    pub video_config: Option<VideoConfig>,
    pub segmentation_config: Option<SegmentationConfig>,
    pub time_series_config: Option<TimeSeriesConfig>,
    /// Incidence rate estimated by the generation service, 0-100.
    pub estimated_incidence_rate: Option<f64>,
    pub incidence_rate_rationale: String,
    pub incidence_rate_sources: Vec<String>,
}

impl Default for SurveyConfiguration {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            selected_countries: Vec::new(),
            photo_config: None,
            video_config: None,
            segmentation_config: None,
            time_series_config: None,
            estimated_incidence_rate: None,
            incidence_rate_rationale: String::new(),
            incidence_rate_sources: Vec::new(),
        }
    }
}

impl SurveyConfiguration {
    pub fn sample_size(&self) -> u32 {
        self.sample_size
    }

    /// Set the sample size, clamped to the fielding minimum.
    pub fn set_sample_size(&mut self, size: u32) {
        self.sample_size = size.max(MIN_SAMPLE_SIZE);
    }

    /// Set the incidence-rate estimate, clamped to 0-100.
    pub fn set_incidence_rate(&mut self, rate: Option<f64>) {
        self.estimated_incidence_rate = rate.map(|r| r.clamp(0.0, 100.0));
    }

    /// Market labels joined for the generation request, `None` when no
    /// market is selected.
    pub fn market_string(&self) -> Option<String> {
        if self.selected_countries.is_empty() {
            return None;
        }
        Some(
            self.selected_countries
                .iter()
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::find_by_value;

    #[test]
    fn test_sample_size_clamped_to_minimum() {
        let mut config = SurveyConfiguration::default();
        config.set_sample_size(10);
        assert_eq!(config.sample_size(), MIN_SAMPLE_SIZE);
        config.set_sample_size(500);
        assert_eq!(config.sample_size(), 500);
    }

    #[test]
    fn test_incidence_rate_clamped() {
        let mut config = SurveyConfiguration::default();
        config.set_incidence_rate(Some(140.0));
        assert_eq!(config.estimated_incidence_rate, Some(100.0));
        config.set_incidence_rate(Some(-5.0));
        assert_eq!(config.estimated_incidence_rate, Some(0.0));
        config.set_incidence_rate(None);
        assert_eq!(config.estimated_incidence_rate, None);
    }

    #[test]
    fn test_market_string() {
        let mut config = SurveyConfiguration::default();
        assert_eq!(config.market_string(), None);
        config.selected_countries = vec![
            find_by_value("gb").unwrap(),
            find_by_value("de").unwrap(),
        ];
        assert_eq!(
            config.market_string().as_deref(),
            Some("United Kingdom, Germany")
        );
    }

    #[test]
    fn test_cadence_parse_or_monthly() {
        assert_eq!(Cadence::parse_or_monthly("Weekly"), Cadence::Weekly);
        assert_eq!(Cadence::parse_or_monthly("every so often"), Cadence::Monthly);
    }

    #[test]
    fn test_media_purpose_serde() {
        let json = serde_json::to_string(&MediaPurpose::Quantitative).unwrap();
        assert_eq!(json, "\"quantitative\"");
    }
}
