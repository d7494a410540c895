//! Generation collaborators: the hosted survey-suggestion service and the
//! best-effort contextual-configuration extractor.
//!
//! Both are opaque async functions behind trait seams so tests and offline
//! tooling can substitute stubs. The engine never inspects generated
//! question quality; it only checks structural shape, substituting a fixed
//! fallback document when the response is malformed rather than propagating
//! an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EngineResult;
use crate::survey::SurveySection;

/// Request sent to the survey-suggestion service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// The compiled prompt text.
    pub survey_description: String,
    pub include_photo_questions: bool,
    pub include_video_questions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series_config: Option<TimeSeriesRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_context: Option<String>,
}

/// Time-series settings as the wire contract wants them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesRequest {
    pub cadence: String,
    pub num_waves: u32,
    /// ISO date (YYYY-MM-DD), empty when unset.
    pub start_date: String,
    pub key_metric_focus: Vec<String>,
}

/// Raw service response; every field optional so structural validation is
/// explicit rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGenerationResponse {
    pub survey_title: Option<String>,
    pub survey_introduction: Option<String>,
    pub survey_sections: Option<Vec<SurveySection>>,
    pub estimated_incidence_rate: Option<f64>,
    pub incidence_rate_rationale: Option<String>,
    pub incidence_rate_sources: Option<Vec<String>>,
}

/// A structurally valid survey document.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyDocument {
    pub survey_title: String,
    pub survey_introduction: String,
    pub survey_sections: Vec<SurveySection>,
    pub estimated_incidence_rate: f64,
    pub incidence_rate_rationale: String,
    pub incidence_rate_sources: Vec<String>,
}

impl SurveyDocument {
    /// The fixed document substituted for malformed or empty responses.
    pub fn fallback() -> Self {
        Self {
            survey_title: "Feedback Survey".to_string(),
            survey_introduction:
                "Welcome to our survey. Your input is valuable and will take a few minutes."
                    .to_string(),
            survey_sections: Vec::new(),
            estimated_incidence_rate: 0.0,
            incidence_rate_rationale:
                "Incidence rate could not be estimated due to an unexpected issue.".to_string(),
            incidence_rate_sources: vec!["N/A".to_string()],
        }
    }

    /// Validate a raw response, substituting the fallback when any required
    /// field is missing or blank.
    pub fn from_response(raw: RawGenerationResponse) -> Self {
        let RawGenerationResponse {
            survey_title: Some(survey_title),
            survey_introduction: Some(survey_introduction),
            survey_sections: Some(survey_sections),
            estimated_incidence_rate: Some(estimated_incidence_rate),
            incidence_rate_rationale: Some(incidence_rate_rationale),
            incidence_rate_sources: Some(incidence_rate_sources),
        } = raw
        else {
            warn!("generation_response_malformed");
            return Self::fallback();
        };

        if survey_title.trim().is_empty() || survey_introduction.trim().is_empty() {
            warn!("generation_response_blank_fields");
            return Self::fallback();
        }

        Self {
            survey_title,
            survey_introduction,
            survey_sections,
            estimated_incidence_rate: estimated_incidence_rate.clamp(0.0, 100.0),
            incidence_rate_rationale,
            incidence_rate_sources,
        }
    }

    /// Whether the document carries any generated question.
    pub fn has_questions(&self) -> bool {
        self.survey_sections.iter().any(|s| !s.questions.is_empty())
    }
}

/// Suggestions extracted from free-text project context.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigSuggestions {
    pub suggested_markets: Vec<String>,
    pub suggested_photo: Option<MediaSuggestion>,
    pub suggested_video: Option<MediaSuggestion>,
    pub suggested_time_series: Option<TimeSeriesSuggestion>,
}

/// Suggested description for a photo/video collection task.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MediaSuggestion {
    pub description: String,
}

/// Suggested time-series tracking setup.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSeriesSuggestion {
    pub cadence: String,
    pub num_waves: u32,
    /// YYYY-MM-DD, or "Not specified".
    pub start_date: String,
    pub key_metric_focus: Vec<String>,
}

/// The hosted survey-suggestion collaborator.
#[async_trait]
pub trait SurveyGenerator: Send + Sync {
    async fn suggest_survey_questions(
        &self,
        request: &GenerationRequest,
    ) -> EngineResult<SurveyDocument>;
}

/// The best-effort contextual-configuration collaborator.
#[async_trait]
pub trait ConfigExtractor: Send + Sync {
    async fn extract_contextual_config(
        &self,
        project_context: &str,
    ) -> EngineResult<ConfigSuggestions>;
}

/// HTTP client for both collaborators.
pub struct HttpGenerationClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpGenerationClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(format!("{}/{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }
}

#[async_trait]
impl SurveyGenerator for HttpGenerationClient {
    async fn suggest_survey_questions(
        &self,
        request: &GenerationRequest,
    ) -> EngineResult<SurveyDocument> {
        debug!(
            market = request.selected_market.as_deref().unwrap_or("-"),
            "generation_request_sent"
        );
        let raw: RawGenerationResponse = self
            .request("suggest-survey-questions")
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(SurveyDocument::from_response(raw))
    }
}

#[async_trait]
impl ConfigExtractor for HttpGenerationClient {
    async fn extract_contextual_config(
        &self,
        project_context: &str,
    ) -> EngineResult<ConfigSuggestions> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct ExtractRequest<'a> {
            project_context: &'a str,
        }

        let suggestions: ConfigSuggestions = self
            .request("extract-contextual-config")
            .json(&ExtractRequest { project_context })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(suggestions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_camel_case_and_skips_unset() {
        let request = GenerationRequest {
            survey_description: "prompt".to_string(),
            include_photo_questions: true,
            include_video_questions: false,
            time_series_config: None,
            selected_market: Some("United Kingdom".to_string()),
            project_context: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["surveyDescription"], "prompt");
        assert_eq!(json["includePhotoQuestions"], true);
        assert!(json.get("timeSeriesConfig").is_none());
        assert!(json.get("projectContext").is_none());
        assert_eq!(json["selectedMarket"], "United Kingdom");
    }

    #[test]
    fn test_valid_response_passes_through() {
        let raw: RawGenerationResponse = serde_json::from_str(
            r#"{
                "surveyTitle": "Your Beverage Opinions",
                "surveyIntroduction": "A short survey about your habits.",
                "surveySections": [
                    {"sectionTitle": "Screener: Category usage", "questions": [
                        {"questionText": "How often?", "questionType": "screener",
                         "options": ["Daily (Screen In)", "Never"]}
                    ]}
                ],
                "estimatedIncidenceRate": 35,
                "incidenceRateRationale": "Category reach in the target market.",
                "incidenceRateSources": ["https://example.com/report"]
            }"#,
        )
        .unwrap();

        let doc = SurveyDocument::from_response(raw);
        assert_eq!(doc.survey_title, "Your Beverage Opinions");
        assert_eq!(doc.estimated_incidence_rate, 35.0);
        assert!(doc.has_questions());
    }

    #[test]
    fn test_missing_sections_yields_fallback() {
        let raw: RawGenerationResponse = serde_json::from_str(
            r#"{
                "surveyTitle": "T",
                "surveyIntroduction": "I",
                "estimatedIncidenceRate": 35,
                "incidenceRateRationale": "R",
                "incidenceRateSources": []
            }"#,
        )
        .unwrap();

        let doc = SurveyDocument::from_response(raw);
        assert_eq!(doc.survey_title, "Feedback Survey");
        assert!(doc.survey_sections.is_empty());
        assert_eq!(doc.estimated_incidence_rate, 0.0);
        assert_eq!(doc.incidence_rate_sources, vec!["N/A".to_string()]);
    }

    #[test]
    fn test_blank_title_yields_fallback() {
        let raw = RawGenerationResponse {
            survey_title: Some("  ".to_string()),
            survey_introduction: Some("I".to_string()),
            survey_sections: Some(Vec::new()),
            estimated_incidence_rate: Some(10.0),
            incidence_rate_rationale: Some("R".to_string()),
            incidence_rate_sources: Some(Vec::new()),
        };
        let doc = SurveyDocument::from_response(raw);
        assert_eq!(doc.survey_title, "Feedback Survey");
    }

    #[test]
    fn test_empty_body_yields_fallback() {
        let raw: RawGenerationResponse = serde_json::from_str("{}").unwrap();
        let doc = SurveyDocument::from_response(raw);
        assert_eq!(doc, SurveyDocument::fallback());
    }

    #[test]
    fn test_out_of_range_ir_clamped() {
        let raw = RawGenerationResponse {
            survey_title: Some("T".to_string()),
            survey_introduction: Some("I".to_string()),
            survey_sections: Some(Vec::new()),
            estimated_incidence_rate: Some(250.0),
            incidence_rate_rationale: Some("R".to_string()),
            incidence_rate_sources: Some(Vec::new()),
        };
        let doc = SurveyDocument::from_response(raw);
        assert_eq!(doc.estimated_incidence_rate, 100.0);
    }

    #[test]
    fn test_suggestions_default_to_empty() {
        let suggestions: ConfigSuggestions = serde_json::from_str("{}").unwrap();
        assert!(suggestions.suggested_markets.is_empty());
        assert!(suggestions.suggested_photo.is_none());
        assert!(suggestions.suggested_time_series.is_none());
    }

    #[test]
    fn test_suggestions_parse_camel_case() {
        let suggestions: ConfigSuggestions = serde_json::from_str(
            r#"{
                "suggestedMarkets": ["United Kingdom", "Germany"],
                "suggestedPhoto": {"description": "Photos of their workspace."},
                "suggestedTimeSeries": {
                    "cadence": "monthly", "numWaves": 3,
                    "startDate": "Not specified", "keyMetricFocus": ["satisfaction"]
                }
            }"#,
        )
        .unwrap();
        assert_eq!(suggestions.suggested_markets.len(), 2);
        assert_eq!(
            suggestions.suggested_photo.unwrap().description,
            "Photos of their workspace."
        );
        assert_eq!(suggestions.suggested_time_series.unwrap().num_waves, 3);
    }
}
