//! Survey document types shared with the generation service.
//!
//! The generation service speaks camelCase JSON; every type here carries the
//! serde renames to match that contract exactly. This module also owns the
//! `(Screen In)` option marker convention used by screener questions.

use serde::{Deserialize, Serialize};

/// Marker appended to a screener option that qualifies a respondent.
pub const SCREEN_IN_MARKER: &str = "(Screen In)";

/// Question types understood by the generation service and the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    Screener,
    ClosedText,
    OpenText,
    Scale,
    Photo,
    Video,
    Stimulus,
}

impl QuestionType {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Screener => "Screener",
            Self::ClosedText => "Closed Text",
            Self::OpenText => "Open Text",
            Self::Scale => "Scale",
            Self::Photo => "Photo",
            Self::Video => "Video",
            Self::Stimulus => "Stimulus",
        }
    }
}

/// A single survey question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyQuestion {
    pub question_text: String,
    pub question_type: QuestionType,
    /// Answer options. Required for closedText/scale/screener questions,
    /// empty for openText/photo/video/stimulus.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl SurveyQuestion {
    pub fn new(text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            question_text: text.into(),
            question_type,
            options: Vec::new(),
        }
    }

    pub fn with_options<S: Into<String>>(
        text: impl Into<String>,
        question_type: QuestionType,
        options: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            question_text: text.into(),
            question_type,
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// A titled group of questions within a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySection {
    pub section_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_description: Option<String>,
    #[serde(default)]
    pub questions: Vec<SurveyQuestion>,
}

impl SurveySection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            section_title: title.into(),
            section_description: None,
            questions: Vec::new(),
        }
    }

    /// Total question count, used for submission summaries.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Whether an option text carries the screen-in marker.
pub fn has_screen_in_marker(option: &str) -> bool {
    option.contains(SCREEN_IN_MARKER)
}

/// Remove the screen-in marker from an option text, trimming the remainder.
pub fn strip_screen_in_marker(option: &str) -> String {
    option.replace(SCREEN_IN_MARKER, "").trim().to_string()
}

/// Set or clear the screen-in marker on an option text.
pub fn with_screen_in_marker(option: &str, screen_in: bool) -> String {
    let base = strip_screen_in_marker(option);
    if screen_in {
        format!("{} {}", base, SCREEN_IN_MARKER)
    } else {
        base
    }
}
