//! Local persistence: launch submissions and the user profile.
//!
//! Submissions are written once and never read back by the engine (the
//! downstream pipeline consumes them); the profile is a single JSON object
//! under the `userProfile` key.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::EngineResult;
use crate::project::{
    PhotoConfig, SegmentationConfig, SurveyConfiguration, TimeSeriesConfig, VideoConfig,
};
use crate::survey::{SurveySection, SurveyQuestion};
use crate::templates::AnswerMap;

const PROFILE_KEY: &str = "userProfile";

/// User profile captured before the first launch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub organisation: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_role: Option<String>,
    pub industry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_industry: Option<String>,
}

impl UserProfile {
    /// A profile is usable once it identifies the requester.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Flattened survey content for the submission payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub title: String,
    pub introduction: String,
    pub sections: Vec<SummarySection>,
    pub question_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummarySection {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub questions: Vec<SummaryQuestion>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuestion {
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: crate::survey::QuestionType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl SurveySummary {
    pub fn new(title: &str, introduction: &str, sections: &[SurveySection]) -> Self {
        let question_count = sections.iter().map(SurveySection::question_count).sum();
        Self {
            title: title.to_string(),
            introduction: introduction.to_string(),
            sections: sections.iter().map(summary_section).collect(),
            question_count,
        }
    }
}

fn summary_section(section: &SurveySection) -> SummarySection {
    SummarySection {
        title: section.section_title.clone(),
        description: section.section_description.clone(),
        questions: section.questions.iter().map(summary_question).collect(),
    }
}

fn summary_question(question: &SurveyQuestion) -> SummaryQuestion {
    SummaryQuestion {
        text: question.question_text.clone(),
        question_type: question.question_type,
        options: question.options.clone(),
    }
}

/// Configuration snapshot attached to a submission.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDetails {
    pub solution_type: String,
    pub template: String,
    pub template_configuration: AnswerMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_survey_description: Option<String>,
    pub sample_size: u32,
    pub markets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_ir: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_configuration: Option<PhotoConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_configuration: Option<VideoConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segmentation_configuration: Option<SegmentationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series_configuration: Option<TimeSeriesConfig>,
}

impl ConfigurationDetails {
    pub fn from_configuration(
        solution_type: &str,
        template: &str,
        template_configuration: AnswerMap,
        pulse_survey_description: Option<String>,
        config: &SurveyConfiguration,
    ) -> Self {
        Self {
            solution_type: solution_type.to_string(),
            template: template.to_string(),
            template_configuration,
            pulse_survey_description,
            sample_size: config.sample_size(),
            markets: config
                .selected_countries
                .iter()
                .map(|c| c.label.clone())
                .collect(),
            estimated_ir: config.estimated_incidence_rate,
            photo_configuration: config.photo_config.clone(),
            video_configuration: config.video_config.clone(),
            segmentation_configuration: config.segmentation_config.clone(),
            time_series_configuration: config.time_series_config.clone(),
        }
    }
}

/// The launch payload handed to the document store.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub survey_summary: SurveySummary,
    pub configuration_details: ConfigurationDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<UserProfile>,
    pub submitted_at: DateTime<Utc>,
}

/// Write seam for the document store; the engine only observes
/// success/failure.
pub trait SubmissionStore {
    fn save_submission(&self, payload: &SubmissionPayload) -> EngineResult<i64>;
}

/// SQLite-backed local store for submissions and the user profile.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: &Path) -> EngineResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        debug!(path = %path.display(), "store_opened");
        Ok(store)
    }

    fn init_schema(&self) -> EngineResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS survey_submissions (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 submitted_at TEXT NOT NULL,
                 payload TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS app_state (
                 key TEXT PRIMARY KEY,
                 value TEXT NOT NULL
             );",
        )?;
        Ok(())
    }

    /// Read the stored user profile, `None` on first launch.
    pub fn load_profile(&self) -> EngineResult<Option<UserProfile>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![PROFILE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Persist the user profile.
    pub fn save_profile(&self, profile: &UserProfile) -> EngineResult<()> {
        let json = serde_json::to_string(profile)?;
        self.conn.execute(
            "INSERT INTO app_state (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![PROFILE_KEY, json],
        )?;
        info!("profile_saved");
        Ok(())
    }

    /// Count of stored submissions.
    pub fn submission_count(&self) -> EngineResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM survey_submissions", [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }
}

impl SubmissionStore for LocalStore {
    fn save_submission(&self, payload: &SubmissionPayload) -> EngineResult<i64> {
        let json = serde_json::to_string(payload)?;
        self.conn.execute(
            "INSERT INTO survey_submissions (submitted_at, payload) VALUES (?1, ?2)",
            params![payload.submitted_at.to_rfc3339(), json],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(submission_id = id, "submission_saved");
        Ok(id)
    }
}
