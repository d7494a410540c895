//! Feasibility & cost estimator.
//!
//! Pure arithmetic over the current configuration, recomputed on every
//! change. All inputs are defaulted, so estimation never fails; with nothing
//! configured it degrades to a baseline score.

use crate::project::{MediaPurpose, SurveyConfiguration};

/// Markets that are measurably harder to field in. Kept as data so a
/// deployment can tune the set without touching scoring logic.
pub const DEFAULT_HARDER_ACCESS_MARKETS: &[&str] = &["cn", "jp", "br", "in"];

/// Derived metrics for the current configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    /// 0-100, higher is easier to field.
    pub feasibility_score: f64,
    pub estimated_tokens: u64,
    pub field_time: &'static str,
    pub survey_length: &'static str,
}

/// Coarse feasibility bucket shown next to the score.
pub fn feasibility_level(score: f64) -> &'static str {
    if score > 75.0 {
        "High"
    } else if score > 50.0 {
        "Medium"
    } else {
        "Low"
    }
}

/// Estimator parameterized by the harder-access market set.
#[derive(Debug, Clone)]
pub struct Estimator {
    pub harder_access_markets: Vec<String>,
}

impl Default for Estimator {
    fn default() -> Self {
        Self {
            harder_access_markets: DEFAULT_HARDER_ACCESS_MARKETS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl Estimator {
    pub fn new(harder_access_markets: Vec<String>) -> Self {
        Self {
            harder_access_markets,
        }
    }

    /// Compute all derived metrics for a configuration.
    pub fn estimate(&self, config: &SurveyConfiguration) -> Estimate {
        let feasibility_score = self.feasibility_score(config);
        Estimate {
            feasibility_score,
            estimated_tokens: estimated_tokens(config),
            field_time: field_time(feasibility_score, config.estimated_incidence_rate),
            // Fixed bucket for now: the length model is not yet wired to the
            // question mix.
            survey_length: "8-12 minutes",
        }
    }

    /// `clamp(0, 100, 80 - sizeImpact - countryComplexity - irPenalty)`.
    ///
    /// Size impact falls off as the sample grows; multi-market projects pay
    /// two points per market plus a flat surcharge when any market is in the
    /// harder-access set; an unset incidence rate is assumed at 50%.
    fn feasibility_score(&self, config: &SurveyConfiguration) -> f64 {
        let base = 80.0;

        let size_impact = (50 - (config.sample_size() / 20) as i64).max(0) as f64;

        let mut country_complexity = 0.0;
        if config.selected_countries.len() > 1 {
            country_complexity = config.selected_countries.len() as f64 * 2.0;
        }
        if config
            .selected_countries
            .iter()
            .any(|c| self.harder_access_markets.iter().any(|m| *m == c.value))
        {
            country_complexity += 5.0;
        }

        let ir_penalty = (50.0 - config.estimated_incidence_rate.unwrap_or(50.0)) / 2.0;

        (base - size_impact - country_complexity - ir_penalty).clamp(0.0, 100.0)
    }
}

/// Token cost of fielding the survey.
///
/// The sample is partitioned into video-enabled, photo-enabled (not video),
/// and text-only cohorts. A `quantitative` media purpose claims the whole
/// remaining sample; `qualitative` claims at most its configured respondent
/// count. Cohorts weigh 5/3/1 tokens per respondent.
fn estimated_tokens(config: &SurveyConfiguration) -> u64 {
    let sample = config.sample_size() as u64;

    let mut video_enabled: u64 = 0;
    let mut photo_only: u64 = 0;
    let mut text_only: u64 = sample;

    if let Some(video) = &config.video_config {
        match video.purpose {
            MediaPurpose::Quantitative => {
                video_enabled = sample;
                text_only = 0;
            }
            MediaPurpose::Qualitative => {
                video_enabled = (video.num_videos as u64).min(sample);
                text_only = sample - video_enabled;
            }
        }
    }

    if let Some(photo) = &config.photo_config {
        match photo.purpose {
            MediaPurpose::Quantitative => {
                photo_only = text_only;
                text_only = 0;
            }
            MediaPurpose::Qualitative => {
                let can_do_photo = (photo.num_photos as u64).min(text_only);
                photo_only = can_do_photo;
                text_only -= can_do_photo;
            }
        }
    }

    video_enabled * 5 + photo_only * 3 + text_only
}

/// Field-time bucket from joint thresholds on score and incidence rate.
fn field_time(score: f64, incidence_rate: Option<f64>) -> &'static str {
    let ir = incidence_rate.unwrap_or(0.0);
    if score > 70.0 && ir > 40.0 {
        "3-5 days"
    } else if score > 40.0 && ir > 20.0 {
        "5-7 days"
    } else {
        "7-10+ days"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::countries::find_by_value;
    use crate::project::{PhotoConfig, VideoConfig};

    fn base_config() -> SurveyConfiguration {
        SurveyConfiguration::default()
    }

    fn with_sample(size: u32) -> SurveyConfiguration {
        let mut config = base_config();
        config.set_sample_size(size);
        config
    }

    #[test]
    fn test_baseline_score_with_defaults() {
        // sample 100 -> size impact 45; no markets; IR assumed 50 -> no
        // penalty; 80 - 45 = 35.
        let estimate = Estimator::default().estimate(&base_config());
        assert_eq!(estimate.feasibility_score, 35.0);
    }

    #[test]
    fn test_larger_sample_never_raises_size_impact() {
        // Size impact shrinks with sample, so the score is monotonically
        // non-decreasing in sample size.
        let estimator = Estimator::default();
        let mut last = -1.0;
        for sample in [60, 100, 400, 1000, 5000] {
            let score = estimator.estimate(&with_sample(sample)).feasibility_score;
            assert!(score >= last, "score dropped as sample grew to {sample}");
            last = score;
        }
    }

    #[test]
    fn test_higher_ir_never_lowers_score() {
        let estimator = Estimator::default();
        let mut last = -1.0;
        for ir in [0.0, 10.0, 35.0, 50.0, 80.0, 100.0] {
            let mut config = with_sample(1000);
            config.set_incidence_rate(Some(ir));
            let score = estimator.estimate(&config).feasibility_score;
            assert!(score >= last, "score dropped when IR rose to {ir}");
            last = score;
        }
    }

    #[test]
    fn test_single_market_carries_no_count_complexity() {
        let estimator = Estimator::default();
        let mut config = with_sample(1000);
        config.selected_countries = vec![find_by_value("us").unwrap()];
        let single = estimator.estimate(&config).feasibility_score;

        config.selected_countries.push(find_by_value("gb").unwrap());
        let double = estimator.estimate(&config).feasibility_score;

        // One market: no per-market penalty. Two markets: 2 x 2 points.
        assert_eq!(single - double, 4.0);
    }

    #[test]
    fn test_harder_access_market_surcharge() {
        let estimator = Estimator::default();
        let mut config = with_sample(1000);
        config.selected_countries = vec![find_by_value("us").unwrap()];
        let easy = estimator.estimate(&config).feasibility_score;

        config.selected_countries = vec![find_by_value("cn").unwrap()];
        let hard = estimator.estimate(&config).feasibility_score;

        assert_eq!(easy - hard, 5.0);
    }

    #[test]
    fn test_harder_access_set_is_configurable() {
        let estimator = Estimator::new(vec!["us".to_string()]);
        let mut config = with_sample(1000);
        config.selected_countries = vec![find_by_value("us").unwrap()];
        let score = estimator.estimate(&config).feasibility_score;

        let default_score = Estimator::default().estimate(&config).feasibility_score;
        assert_eq!(default_score - score, 5.0);
    }

    #[test]
    fn test_score_clamped_to_range() {
        let estimator = Estimator::default();

        let mut config = with_sample(51);
        config.set_incidence_rate(Some(0.0));
        config.selected_countries = crate::countries::default_countries();
        let score = estimator.estimate(&config).feasibility_score;
        assert_eq!(score, 0.0);

        let mut config = with_sample(5000);
        config.set_incidence_rate(Some(100.0));
        let score = estimator.estimate(&config).feasibility_score;
        assert!(score <= 100.0);
    }

    #[test]
    fn test_token_accounting_photo_qualitative() {
        // The worked example: sample 100, qualitative photos for 10, no
        // video -> 0*5 + 10*3 + 90*1 = 120.
        let mut config = with_sample(100);
        config.photo_config = Some(PhotoConfig {
            purpose: MediaPurpose::Qualitative,
            num_photos: 10,
            description: String::new(),
        });
        let estimate = Estimator::default().estimate(&config);
        assert_eq!(estimate.estimated_tokens, 120);
    }

    #[test]
    fn test_token_accounting_video_quantitative_claims_all() {
        let mut config = with_sample(100);
        config.video_config = Some(VideoConfig {
            purpose: MediaPurpose::Quantitative,
            num_videos: 10,
            description: String::new(),
        });
        config.photo_config = Some(PhotoConfig {
            purpose: MediaPurpose::Qualitative,
            num_photos: 10,
            description: String::new(),
        });
        let estimate = Estimator::default().estimate(&config);
        // Video claims the whole sample; no text-only pool remains for
        // photos: 100*5.
        assert_eq!(estimate.estimated_tokens, 500);
    }

    #[test]
    fn test_token_accounting_mixed_cohorts() {
        let mut config = with_sample(100);
        config.video_config = Some(VideoConfig {
            purpose: MediaPurpose::Qualitative,
            num_videos: 20,
            description: String::new(),
        });
        config.photo_config = Some(PhotoConfig {
            purpose: MediaPurpose::Quantitative,
            num_photos: 5,
            description: String::new(),
        });
        let estimate = Estimator::default().estimate(&config);
        // 20 video, remaining 80 all photo: 20*5 + 80*3 = 340.
        assert_eq!(estimate.estimated_tokens, 340);
    }

    #[test]
    fn test_text_only_baseline_tokens() {
        let estimate = Estimator::default().estimate(&with_sample(100));
        assert_eq!(estimate.estimated_tokens, 100);
    }

    #[test]
    fn test_field_time_buckets() {
        assert_eq!(field_time(75.0, Some(45.0)), "3-5 days");
        assert_eq!(field_time(75.0, Some(30.0)), "5-7 days");
        assert_eq!(field_time(45.0, Some(30.0)), "5-7 days");
        assert_eq!(field_time(45.0, Some(10.0)), "7-10+ days");
        assert_eq!(field_time(30.0, Some(90.0)), "7-10+ days");
        // Unset IR is treated as 0 for fielding speed.
        assert_eq!(field_time(90.0, None), "7-10+ days");
    }

    #[test]
    fn test_survey_length_is_fixed_bucket() {
        let estimate = Estimator::default().estimate(&with_sample(100));
        assert_eq!(estimate.survey_length, "8-12 minutes");
    }

    #[test]
    fn test_feasibility_level_buckets() {
        assert_eq!(feasibility_level(80.0), "High");
        assert_eq!(feasibility_level(60.0), "Medium");
        assert_eq!(feasibility_level(50.0), "Low");
        assert_eq!(feasibility_level(10.0), "Low");
    }
}
