//! Design session controller.
//!
//! Owns everything the active editing session needs: the active template,
//! follow-up answers, the customization cache, the generated survey content,
//! the project configuration, and the re-entrancy gate around generation.
//! All mutations run synchronously on the owning caller; the only async
//! boundaries are the generation, extraction, and store collaborators.
//!
//! Failures never propagate as panics or poison the session: they surface as
//! notices and the in-memory state stays consistent and editable.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cache::{CustomizationCache, CustomizationRecord};
use crate::compiler;
use crate::countries;
use crate::estimator::{Estimate, Estimator};
use crate::generation::{
    ConfigExtractor, ConfigSuggestions, GenerationRequest, SurveyDocument, SurveyGenerator,
    TimeSeriesRequest,
};
use crate::merge::{SelectionState, build_final_sections};
use crate::project::{
    Cadence, MediaPurpose, PhotoConfig, SegmentationConfig, SurveyConfiguration, TimeSeriesConfig,
    VideoConfig,
};
use crate::sections::{FrameworkSection, SectionKind, catalog, find};
use crate::store::{ConfigurationDetails, SubmissionPayload, SubmissionStore, SurveySummary, UserProfile};
use crate::survey::{
    QuestionType, SurveyQuestion, SurveySection, has_screen_in_marker, with_screen_in_marker,
};
use crate::templates::{AnswerMap, Template};

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// A user-visible transient notification (toast analogue).
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: String,
}

impl Notice {
    fn info(title: &str, message: &str) -> Self {
        Self {
            severity: Severity::Info,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    fn error(title: &str, message: &str) -> Self {
        Self {
            severity: Severity::Error,
            title: title.to_string(),
            message: message.to_string(),
        }
    }
}

/// Which product arm the session runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionType {
    /// Quick free-text survey, no template, no framework injection.
    Pulse,
    Explore,
    Test,
}

impl SolutionType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pulse => "pulse",
            Self::Explore => "explore",
            Self::Test => "test",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pulse" => Some(Self::Pulse),
            "explore" => Some(Self::Explore),
            "test" => Some(Self::Test),
            _ => None,
        }
    }
}

/// The active editing session.
pub struct DesignSession {
    solution_type: SolutionType,
    screener_catalog: Vec<FrameworkSection>,
    content_catalog: Vec<FrameworkSection>,
    estimator: Estimator,
    default_sample_size: u32,
    cache: CustomizationCache,

    active_template: Option<Template>,
    follow_up_answers: AnswerMap,
    pulse_description: String,

    customized_screener_sections: Option<Vec<FrameworkSection>>,
    customized_content_sections: Option<Vec<FrameworkSection>>,

    survey_sections: Vec<SurveySection>,
    survey_title: String,
    survey_introduction: String,

    configuration: SurveyConfiguration,
    setup_complete: bool,
    is_generating: bool,
    notices: Vec<Notice>,
}

impl DesignSession {
    pub fn new(solution_type: SolutionType) -> Self {
        Self {
            solution_type,
            screener_catalog: catalog(SectionKind::Screener),
            content_catalog: catalog(SectionKind::Content),
            estimator: Estimator::default(),
            default_sample_size: SurveyConfiguration::default().sample_size(),
            cache: CustomizationCache::new(),
            active_template: None,
            follow_up_answers: AnswerMap::new(),
            pulse_description: String::new(),
            customized_screener_sections: None,
            customized_content_sections: None,
            survey_sections: Vec::new(),
            survey_title: String::new(),
            survey_introduction: String::new(),
            configuration: SurveyConfiguration::default(),
            setup_complete: false,
            is_generating: false,
            notices: Vec::new(),
        }
    }

    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn with_default_sample_size(mut self, sample_size: u32) -> Self {
        self.default_sample_size = sample_size;
        self.configuration.set_sample_size(sample_size);
        self
    }

    // Read accessors

    pub fn solution_type(&self) -> SolutionType {
        self.solution_type
    }

    pub fn active_template(&self) -> Option<&Template> {
        self.active_template.as_ref()
    }

    pub fn survey_sections(&self) -> &[SurveySection] {
        &self.survey_sections
    }

    pub fn survey_title(&self) -> &str {
        &self.survey_title
    }

    pub fn survey_introduction(&self) -> &str {
        &self.survey_introduction
    }

    pub fn configuration(&self) -> &SurveyConfiguration {
        &self.configuration
    }

    pub fn setup_complete(&self) -> bool {
        self.setup_complete
    }

    pub fn is_generating(&self) -> bool {
        self.is_generating
    }

    /// Drain pending user-visible notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Recompute derived feasibility/cost metrics for the current state.
    pub fn estimate(&self) -> Estimate {
        self.estimator.estimate(&self.configuration)
    }

    // Template lifecycle

    /// Switch the active template, or clear it with `None`.
    ///
    /// The outgoing template's state is snapshotted to the cache; the
    /// incoming template restores its last-saved state (or starts empty on a
    /// cache miss). The project configuration is discarded on every switch.
    pub fn activate_template(&mut self, template: Option<Template>) {
        let old_id = self.active_template.as_ref().map(|t| t.id);
        let new_id = template.as_ref().map(|t| t.id);

        self.persist_current();

        let changed = old_id != new_id;
        self.active_template = template;
        if !changed {
            return;
        }

        match new_id.and_then(|id| self.cache.restore(id)).cloned() {
            Some(record) => {
                info!(template_id = new_id.unwrap_or("-"), "customization_restored");
                self.survey_sections = record.generated_sections;
                self.customized_content_sections = record.content_sections;
                self.customized_screener_sections = record.screener_sections;
            }
            None => {
                self.survey_sections = Vec::new();
                self.customized_content_sections = None;
                self.customized_screener_sections = None;
            }
        }

        self.survey_title.clear();
        self.survey_introduction.clear();
        self.follow_up_answers.clear();
        self.setup_complete = self
            .survey_sections
            .iter()
            .any(|s| !s.questions.is_empty());

        self.configuration = SurveyConfiguration::default();
        self.configuration.set_sample_size(self.default_sample_size);
    }

    /// Snapshot the current state under the active template id. No-op when
    /// no template is active.
    fn persist_current(&mut self) {
        let template_id = self.active_template.as_ref().map(|t| t.id);
        self.cache.persist(
            template_id,
            CustomizationRecord {
                generated_sections: self.survey_sections.clone(),
                content_sections: self.customized_content_sections.clone(),
                screener_sections: self.customized_screener_sections.clone(),
            },
        );
    }

    // Section composition

    /// The screener sections currently in effect (customized or defaults).
    pub fn current_screener_sections(&self) -> Vec<FrameworkSection> {
        if let Some(customized) = &self.customized_screener_sections {
            return customized.clone();
        }
        self.active_template
            .as_ref()
            .map(|t| t.default_sections(SectionKind::Screener, &self.screener_catalog))
            .unwrap_or_default()
    }

    /// The content sections currently in effect (customized or defaults).
    /// Customized entries whose titles have left the catalog are dropped.
    pub fn current_content_sections(&self) -> Vec<FrameworkSection> {
        if let Some(customized) = &self.customized_content_sections {
            return customized
                .iter()
                .filter(|s| find(&self.content_catalog, &s.title).is_some())
                .cloned()
                .collect();
        }
        self.active_template
            .as_ref()
            .map(|t| t.default_sections(SectionKind::Content, &self.content_catalog))
            .unwrap_or_default()
    }

    /// The full resolved framework, screeners first.
    pub fn resolved_section_titles(&self) -> Vec<String> {
        self.current_screener_sections()
            .iter()
            .chain(self.current_content_sections().iter())
            .map(|s| s.title.clone())
            .collect()
    }

    /// Seed a selection from the sections currently in effect.
    pub fn selection(&self) -> SelectionState {
        SelectionState::from_sections(
            &self.current_screener_sections(),
            &self.current_content_sections(),
        )
    }

    /// Apply an edited selection: run the merge per kind against the
    /// template's original order and snapshot the result.
    pub fn apply_selection(&mut self, selection: &SelectionState) {
        let original_screeners = self
            .active_template
            .as_ref()
            .map(|t| t.framework_titles(SectionKind::Screener))
            .unwrap_or_default();
        let original_content = self
            .active_template
            .as_ref()
            .map(|t| t.framework_titles(SectionKind::Content))
            .unwrap_or_default();

        self.customized_screener_sections = Some(build_final_sections(
            selection.titles(SectionKind::Screener),
            &original_screeners,
            &self.screener_catalog,
        ));
        self.customized_content_sections = Some(build_final_sections(
            selection.titles(SectionKind::Content),
            &original_content,
            &self.content_catalog,
        ));
        self.persist_current();
    }

    /// Flip one section's inclusion. Returns whether it is now selected.
    pub fn toggle_section(&mut self, title: &str) -> bool {
        let kind = SelectionState::kind_for_title(title);
        let mut selection = self.selection();
        let now_selected = selection.toggle(kind, title);
        debug!(title, selected = now_selected, "section_toggled");
        self.apply_selection(&selection);
        now_selected
    }

    // Follow-up answers and pulse description

    pub fn follow_up_answers(&self) -> &AnswerMap {
        &self.follow_up_answers
    }

    pub fn set_answer(&mut self, id: &str, value: &str) {
        self.follow_up_answers.insert(id.to_string(), value.to_string());
    }

    pub fn set_answers(&mut self, answers: AnswerMap) {
        self.follow_up_answers = answers;
    }

    pub fn set_pulse_description(&mut self, description: &str) {
        self.pulse_description = description.to_string();
    }

    /// Whether the session is ready to generate.
    pub fn ready_to_generate(&self) -> bool {
        match self.solution_type {
            SolutionType::Pulse => !self.pulse_description.trim().is_empty(),
            SolutionType::Explore | SolutionType::Test => self
                .active_template
                .as_ref()
                .is_some_and(|t| t.answers_complete(&self.follow_up_answers)),
        }
    }

    // Configuration setters

    pub fn set_sample_size(&mut self, size: u32) {
        self.configuration.set_sample_size(size);
    }

    pub fn set_selected_countries(&mut self, countries: Vec<crate::countries::Country>) {
        self.configuration.selected_countries = countries;
    }

    pub fn set_photo_config(&mut self, config: Option<PhotoConfig>) {
        self.configuration.photo_config = config;
    }

    pub fn set_video_config(&mut self, config: Option<VideoConfig>) {
        self.configuration.video_config = config;
    }

    pub fn set_segmentation_config(&mut self, config: Option<SegmentationConfig>) {
        self.configuration.segmentation_config = config;
    }

    pub fn set_time_series_config(&mut self, config: Option<TimeSeriesConfig>) {
        self.configuration.time_series_config = config;
    }

    /// Pre-seed the incidence-rate estimate; generation overwrites it.
    pub fn set_incidence_rate(&mut self, rate: Option<f64>) {
        self.configuration.set_incidence_rate(rate);
    }

    // Generation

    /// Compile the generation request text for the current state.
    pub fn compiled_description(&self) -> Option<String> {
        match self.solution_type {
            SolutionType::Pulse => Some(self.pulse_description.clone()),
            SolutionType::Explore | SolutionType::Test => {
                let template = self.active_template.as_ref()?;
                Some(compiler::compile(
                    template,
                    &self.follow_up_answers,
                    &self.resolved_section_titles(),
                ))
            }
        }
    }

    fn build_request(&self, survey_description: String) -> GenerationRequest {
        let project_context = self
            .follow_up_answers
            .get("projectBigQuestion")
            .filter(|q| !q.trim().is_empty())
            .cloned();
        GenerationRequest {
            survey_description,
            include_photo_questions: self.configuration.photo_config.is_some(),
            include_video_questions: self.configuration.video_config.is_some(),
            time_series_config: self.configuration.time_series_config.as_ref().map(|ts| {
                TimeSeriesRequest {
                    cadence: ts.cadence.as_str().to_string(),
                    num_waves: ts.num_waves,
                    start_date: ts
                        .start_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                    key_metric_focus: ts.key_metric_focus.clone(),
                }
            }),
            selected_market: self.configuration.market_string(),
            project_context,
        }
    }

    fn apply_document(&mut self, document: SurveyDocument) {
        self.setup_complete = document.has_questions();
        self.survey_title = document.survey_title;
        self.survey_introduction = document.survey_introduction;
        self.survey_sections = document.survey_sections;
        self.configuration
            .set_incidence_rate(Some(document.estimated_incidence_rate));
        self.configuration.incidence_rate_rationale = document.incidence_rate_rationale;
        self.configuration.incidence_rate_sources = document.incidence_rate_sources;
    }

    /// Run the generation flow: compile, call the service, apply the result,
    /// then best-effort contextual suggestions. Returns whether a survey was
    /// generated. A started request runs to completion; re-entrant calls are
    /// rejected while one is in flight, and a completed setup is not
    /// regenerated.
    pub async fn generate(
        &mut self,
        generator: &dyn SurveyGenerator,
        extractor: Option<&dyn ConfigExtractor>,
    ) -> bool {
        if self.is_generating || self.setup_complete {
            debug!(
                is_generating = self.is_generating,
                setup_complete = self.setup_complete,
                "generation_skipped"
            );
            return false;
        }
        if !self.ready_to_generate() {
            debug!("generation_not_ready");
            return false;
        }
        let Some(description) = self.compiled_description() else {
            return false;
        };

        self.is_generating = true;
        info!(solution_type = self.solution_type.label(), "generation_start");

        let request = self.build_request(description);
        let generated = match generator.suggest_survey_questions(&request).await {
            Ok(document) => {
                self.apply_document(document);
                if self.setup_complete {
                    self.run_contextual_extraction(extractor, request.project_context.as_deref())
                        .await;
                }
                self.setup_complete
            }
            Err(e) => {
                warn!(error = %e, "generation_failed");
                self.notices.push(Notice::error(
                    "Generation Error",
                    "Could not generate survey content. Please try again.",
                ));
                self.setup_complete = false;
                false
            }
        };

        self.is_generating = false;
        info!(generated, "generation_end");
        generated
    }

    /// Best-effort enhancement: never blocks or rolls back the generated
    /// survey; failure is a low-severity notice.
    async fn run_contextual_extraction(
        &mut self,
        extractor: Option<&dyn ConfigExtractor>,
        project_context: Option<&str>,
    ) {
        let (Some(extractor), Some(context)) = (extractor, project_context) else {
            return;
        };
        match extractor.extract_contextual_config(context).await {
            Ok(suggestions) => self.apply_config_suggestions(suggestions),
            Err(e) => {
                warn!(error = %e, "contextual_extraction_failed");
                self.notices.push(Notice::info(
                    "Configuration Suggestion Error",
                    "Could not automatically suggest configurations from project context.",
                ));
            }
        }
    }

    /// Fold extracted suggestions into the configuration, preserving any
    /// values the user already set.
    pub fn apply_config_suggestions(&mut self, suggestions: ConfigSuggestions) {
        let matched = countries::match_suggested(&suggestions.suggested_markets);
        for country in matched {
            if !self
                .configuration
                .selected_countries
                .iter()
                .any(|c| c.value == country.value)
            {
                self.configuration.selected_countries.push(country);
            }
        }

        let default_media_count =
            ((self.configuration.sample_size() as f64 * 0.1).round() as u32).max(1);

        if let Some(photo) = suggestions.suggested_photo {
            let existing = self.configuration.photo_config.take();
            self.configuration.photo_config = Some(PhotoConfig {
                purpose: existing
                    .as_ref()
                    .map(|p| p.purpose)
                    .unwrap_or(MediaPurpose::Qualitative),
                num_photos: existing.map(|p| p.num_photos).unwrap_or(default_media_count),
                description: photo.description,
            });
        }

        if let Some(video) = suggestions.suggested_video {
            let existing = self.configuration.video_config.take();
            self.configuration.video_config = Some(VideoConfig {
                purpose: existing
                    .as_ref()
                    .map(|v| v.purpose)
                    .unwrap_or(MediaPurpose::Qualitative),
                num_videos: existing.map(|v| v.num_videos).unwrap_or(default_media_count),
                description: video.description,
            });
        }

        if let Some(ts) = suggestions.suggested_time_series {
            let start_date = chrono::NaiveDate::parse_from_str(&ts.start_date, "%Y-%m-%d")
                .ok()
                .or_else(|| Some(chrono::Local::now().date_naive()));
            self.configuration.time_series_config = Some(TimeSeriesConfig {
                cadence: Cadence::parse_or_monthly(&ts.cadence),
                num_waves: if ts.num_waves == 0 { 3 } else { ts.num_waves },
                start_date,
                key_metric_focus: ts.key_metric_focus,
            });
        }
    }

    // Generated-content editing. Every mutation snapshots to the cache so a
    // template switch can never lose work.

    pub fn set_survey_title(&mut self, title: &str) {
        self.survey_title = title.to_string();
    }

    pub fn set_survey_introduction(&mut self, introduction: &str) {
        self.survey_introduction = introduction.to_string();
    }

    pub fn rename_section(&mut self, section: usize, title: &str) {
        let Some(s) = self.survey_sections.get_mut(section) else {
            warn!(section, "section_index_out_of_range");
            return;
        };
        s.section_title = title.to_string();
        self.persist_current();
    }

    pub fn set_section_description(&mut self, section: usize, description: Option<String>) {
        let Some(s) = self.survey_sections.get_mut(section) else {
            warn!(section, "section_index_out_of_range");
            return;
        };
        s.section_description = description;
        self.persist_current();
    }

    pub fn edit_question_text(&mut self, section: usize, question: usize, text: &str) {
        let Some(q) = self.question_mut(section, question) else {
            return;
        };
        q.question_text = text.to_string();
        self.persist_current();
    }

    pub fn set_question_type(&mut self, section: usize, question: usize, kind: QuestionType) {
        let Some(q) = self.question_mut(section, question) else {
            return;
        };
        q.question_type = kind;
        self.persist_current();
    }

    /// Edit (or append) an answer option. On screener questions the
    /// screen-in marker survives a text edit.
    pub fn edit_option(&mut self, section: usize, question: usize, option: usize, text: &str) {
        let Some(q) = self.question_mut(section, question) else {
            return;
        };
        let is_screener = q.question_type == QuestionType::Screener;
        if option >= q.options.len() {
            let appended = if is_screener && !has_screen_in_marker(text) {
                text.trim().to_string()
            } else {
                text.to_string()
            };
            q.options.push(appended);
        } else {
            let had_marker = has_screen_in_marker(&q.options[option]);
            q.options[option] = if is_screener && had_marker {
                with_screen_in_marker(text, true)
            } else {
                text.to_string()
            };
        }
        self.persist_current();
    }

    pub fn delete_option(&mut self, section: usize, question: usize, option: usize) {
        let Some(q) = self.question_mut(section, question) else {
            return;
        };
        if option < q.options.len() {
            q.options.remove(option);
        }
        self.persist_current();
    }

    /// Mark or unmark a screener option as qualifying. Ignored for
    /// non-screener questions.
    pub fn toggle_screener_option(
        &mut self,
        section: usize,
        question: usize,
        option: usize,
        screen_in: bool,
    ) {
        let Some(q) = self.question_mut(section, question) else {
            return;
        };
        if q.question_type != QuestionType::Screener || option >= q.options.len() {
            return;
        }
        q.options[option] = with_screen_in_marker(&q.options[option], screen_in);
        self.persist_current();
    }

    pub fn add_section(&mut self) {
        let title = format!("New Section {}", self.survey_sections.len() + 1);
        self.survey_sections.push(SurveySection {
            section_title: title,
            section_description: Some(String::new()),
            questions: Vec::new(),
        });
        self.persist_current();
    }

    pub fn add_question(&mut self, section: usize) {
        let Some(s) = self.survey_sections.get_mut(section) else {
            warn!(section, "section_index_out_of_range");
            return;
        };
        let text = format!("New Question {}", s.questions.len() + 1);
        s.questions
            .push(SurveyQuestion::new(text, QuestionType::OpenText));
        self.persist_current();
    }

    pub fn move_section(&mut self, from: usize, to: usize) {
        if from >= self.survey_sections.len() || to >= self.survey_sections.len() {
            warn!(from, to, "section_reorder_out_of_range");
            return;
        }
        let moved = self.survey_sections.remove(from);
        self.survey_sections.insert(to, moved);
        self.persist_current();
    }

    pub fn move_question(&mut self, section: usize, from: usize, to: usize) {
        let Some(s) = self.survey_sections.get_mut(section) else {
            warn!(section, "section_index_out_of_range");
            return;
        };
        if from >= s.questions.len() || to >= s.questions.len() {
            warn!(from, to, "question_reorder_out_of_range");
            return;
        }
        let moved = s.questions.remove(from);
        s.questions.insert(to, moved);
        self.persist_current();
    }

    fn question_mut(&mut self, section: usize, question: usize) -> Option<&mut SurveyQuestion> {
        let q = self
            .survey_sections
            .get_mut(section)
            .and_then(|s| s.questions.get_mut(question));
        if q.is_none() {
            warn!(section, question, "question_index_out_of_range");
        }
        q
    }

    // Launch

    /// Submit the finished survey to the document store. The in-memory
    /// survey stays intact whether or not the write succeeds.
    pub fn launch(
        &mut self,
        store: &dyn SubmissionStore,
        profile: Option<UserProfile>,
    ) -> Option<i64> {
        let payload = self.build_submission(profile);
        match store.save_submission(&payload) {
            Ok(id) => {
                self.notices.push(Notice::info(
                    "Survey Launch Data Saved!",
                    "Your survey configuration and details have been saved to the database.",
                ));
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "submission_failed");
                self.notices.push(Notice::error(
                    "Launch Error",
                    "Could not save survey data to the database. Please try again.",
                ));
                None
            }
        }
    }

    fn build_submission(&self, profile: Option<UserProfile>) -> SubmissionPayload {
        let template_title = self
            .active_template
            .as_ref()
            .map(|t| t.title)
            .unwrap_or("Pulse");
        SubmissionPayload {
            survey_summary: SurveySummary::new(
                &self.survey_title,
                &self.survey_introduction,
                &self.survey_sections,
            ),
            configuration_details: ConfigurationDetails::from_configuration(
                self.solution_type.label(),
                template_title,
                self.follow_up_answers.clone(),
                (self.solution_type == SolutionType::Pulse)
                    .then(|| self.pulse_description.clone()),
                &self.configuration,
            ),
            user_profile: profile,
            submitted_at: Utc::now(),
        }
    }
}
