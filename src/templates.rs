//! Project template catalog: seed texts, framework order, follow-up specs.
//!
//! Templates are static configuration, loaded once and never mutated at
//! runtime. Seed texts carry two explicit slots resolved by the compiler:
//! `{sectionTitles}` (the section-list declaration) and `{projectContext}`
//! (the optional big-question block). Follow-up labels and placeholders that
//! depend on earlier answers are the `Computed` variant of [`DynamicText`].

use std::collections::HashMap;

use crate::sections::{FrameworkSection, SectionKind, find, is_screener_title};

/// Follow-up answers keyed by question id.
pub type AnswerMap = HashMap<String, String>;

/// Answer lookup that treats missing keys as empty.
pub fn answer<'a>(answers: &'a AnswerMap, id: &str) -> &'a str {
    answers.get(id).map(String::as_str).unwrap_or("")
}

/// Label/placeholder text that is either fixed or derived from prior answers.
#[derive(Debug, Clone, Copy)]
pub enum DynamicText {
    Literal(&'static str),
    Computed(fn(&AnswerMap) -> String),
}

impl DynamicText {
    pub fn resolve(&self, answers: &AnswerMap) -> String {
        match self {
            Self::Literal(text) => (*text).to_string(),
            Self::Computed(f) => f(answers),
        }
    }
}

/// Input widget kind for a follow-up question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpKind {
    Text,
    Textarea,
    Radio,
    Dropdown,
    NumberDropdown,
    FileUpload,
}

/// One choice of a radio/dropdown follow-up.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpOption {
    pub value: String,
    pub label: String,
}

fn opt(value: &str, label: &str) -> FollowUpOption {
    FollowUpOption {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn count_options(from: u32, to: u32) -> Vec<FollowUpOption> {
    (from..=to)
        .map(|n| opt(&n.to_string(), &n.to_string()))
        .collect()
}

/// Visibility condition on a prior answer.
#[derive(Debug, Clone, Copy)]
pub struct ShowIf {
    pub question_id: &'static str,
    pub expected_value: &'static str,
}

/// A follow-up question asked before generation.
#[derive(Debug, Clone)]
pub struct FollowUpQuestion {
    pub id: &'static str,
    pub label: DynamicText,
    pub description: Option<&'static str>,
    pub kind: FollowUpKind,
    pub placeholder: Option<DynamicText>,
    pub required: bool,
    pub options: Vec<FollowUpOption>,
    pub show_if: Option<ShowIf>,
}

impl FollowUpQuestion {
    fn new(id: &'static str, label: DynamicText, kind: FollowUpKind) -> Self {
        Self {
            id,
            label,
            description: None,
            kind,
            placeholder: None,
            required: true,
            options: Vec::new(),
            show_if: None,
        }
    }

    fn radio(id: &'static str, label: &'static str, options: Vec<FollowUpOption>) -> Self {
        Self {
            options,
            ..Self::new(id, DynamicText::Literal(label), FollowUpKind::Radio)
        }
    }

    fn textarea(id: &'static str, label: DynamicText, placeholder: DynamicText) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..Self::new(id, label, FollowUpKind::Textarea)
        }
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    fn shown_if(mut self, question_id: &'static str, expected_value: &'static str) -> Self {
        self.show_if = Some(ShowIf {
            question_id,
            expected_value,
        });
        self
    }

    /// Whether the question applies given the answers so far.
    pub fn is_visible(&self, answers: &AnswerMap) -> bool {
        match &self.show_if {
            Some(cond) => answer(answers, cond.question_id) == cond.expected_value,
            None => true,
        }
    }
}

/// Which arm of the product a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionKind {
    Explore,
    Test,
}

impl SolutionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Explore => "explore",
            Self::Test => "test",
        }
    }
}

/// A project template.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub kind: SolutionKind,
    /// Ordered framework section titles; this order is the merge anchor.
    pub framework_sections: Vec<&'static str>,
    pub follow_up_questions: Vec<FollowUpQuestion>,
    pub seed_text: &'static str,
}

impl Template {
    /// The template's framework titles of one kind, in original order.
    pub fn framework_titles(&self, kind: SectionKind) -> Vec<&'static str> {
        self.framework_sections
            .iter()
            .copied()
            .filter(|t| match kind {
                SectionKind::Screener => is_screener_title(t),
                SectionKind::Content => !is_screener_title(t),
            })
            .collect()
    }

    /// Resolve the template's default sections of one kind against a catalog.
    ///
    /// Titles the catalog does not carry (e.g. the concept-evaluation
    /// placeholders of the test templates) become bare sections so the
    /// template's order is never silently shortened here. Tolerant drops
    /// only apply to user selections during merge.
    pub fn default_sections(
        &self,
        kind: SectionKind,
        catalog: &[FrameworkSection],
    ) -> Vec<FrameworkSection> {
        self.framework_titles(kind)
            .into_iter()
            .map(|title| match find(catalog, title) {
                Some(section) => section.clone(),
                None => FrameworkSection {
                    title: title.to_string(),
                    description: String::new(),
                    example_questions: Vec::new(),
                },
            })
            .collect()
    }

    /// Whether every required, currently-visible follow-up has an answer.
    pub fn answers_complete(&self, answers: &AnswerMap) -> bool {
        self.follow_up_questions
            .iter()
            .filter(|q| q.required && q.is_visible(answers))
            .all(|q| !answer(answers, q.id).trim().is_empty())
    }
}

// Computed follow-up labels and placeholders.

fn describe_label(answers: &AnswerMap, focus_key: &str) -> String {
    let focus = answer(answers, focus_key);
    let focus = if focus.is_empty() { "item" } else { focus };
    format!("Describe your {}", focus.to_lowercase())
}

fn motivation_description_label(answers: &AnswerMap) -> String {
    describe_label(answers, "motivationFocus")
}

fn motivation_description_placeholder(answers: &AnswerMap) -> String {
    match answer(answers, "motivationFocus") {
        "product" => "e.g., Our new mobile app for budget tracking.",
        "brand" => "e.g., Nike is a global leader in athletic footwear and apparel.",
        "service" => "e.g., A new food delivery service and its convenience factors.",
        "category" => "e.g., The organic snack food category and consumer preferences within it.",
        "activity" => "e.g., Learning a new language online and the challenges involved.",
        _ => "e.g., Describe your selection in detail.",
    }
    .to_string()
}

fn usage_description_label(answers: &AnswerMap) -> String {
    describe_label(answers, "usageFocusType")
}

fn usage_description_placeholder(answers: &AnswerMap) -> String {
    match answer(answers, "usageFocusType") {
        "product" => "e.g., Our new mobile gaming app.",
        "brand" => "e.g., Interacting with the Coca-Cola brand.",
        "service" => "e.g., Using a new ride-sharing service for daily commutes.",
        "category" => "e.g., Listening habits within the streaming music category.",
        _ => "e.g., Describe your selection in detail.",
    }
    .to_string()
}

fn shopping_description_label(answers: &AnswerMap) -> String {
    describe_label(answers, "shoppingPatternFocus")
}

fn shopping_description_placeholder(answers: &AnswerMap) -> String {
    match answer(answers, "shoppingPatternFocus") {
        "product" => "e.g., Smart home devices like voice assistants or smart lighting.",
        "service" => "e.g., Online grocery delivery services and their user adoption trends.",
        "category" => "e.g., The sustainable fashion category and how consumers make choices within it.",
        "brand" => "e.g., Shopping for Apple products versus competitor brands.",
        _ => "e.g., Describe your selection in detail.",
    }
    .to_string()
}

fn brand_category_placeholder(answers: &AnswerMap) -> String {
    let brand_input = answer(answers, "brandDescription");
    let brand_input = if brand_input.is_empty() {
        "your brand"
    } else {
        brand_input
    };
    let brand_name = brand_input
        .split_whitespace()
        .next()
        .map(|w| w.replace([',', '.'], ""))
        .filter(|w| !w.is_empty())
        .unwrap_or_else(|| "YourBrand".to_string());
    format!(
        "e.g., If {brand_name} is Nike, the category is athletic footwear and apparel. If {brand_name} is Apple, it's consumer electronics."
    )
}

fn concept_description_placeholder(answers: &AnswerMap) -> String {
    let what = answer(answers, "whatToTest");
    let what = if what.is_empty() { "concepts" } else { what };
    let singular = what.strip_suffix('s').unwrap_or(what);
    let count: u32 = answer(answers, "conceptCount").parse().unwrap_or(1);
    if count > 1 {
        format!(
            "e.g., For {what}: {singular} 1: [Description of first item]. {singular} 2: [Description of second item]. Clearly differentiate each item."
        )
    } else {
        format!("e.g., For a {singular}: [Detailed description of the item].")
    }
}

/// The closing context question shared by every template.
fn project_big_question(placeholder: &'static str) -> FollowUpQuestion {
    FollowUpQuestion {
        description: Some(
            "What decision would this research help you make? Any extra context you can share will help us tailor your project to deliver the best results.",
        ),
        ..FollowUpQuestion::textarea(
            "projectBigQuestion",
            DynamicText::Literal("What's the big question behind your project?"),
            DynamicText::Literal(placeholder),
        )
        .optional()
    }
}

const EXPLORE_CONTEXT_PLACEHOLDER: &str = "e.g., Should we launch product X? How can we improve our customer retention? What are the key drivers for brand Y in market Z?";
const TEST_CONTEXT_PLACEHOLDER: &str = "e.g., Which concept should we invest in? Is this messaging clear and persuasive? How does our new feature compare to the old one?";

// Seed texts. `{sectionTitles}` and `{projectContext}` are compiler slots;
// every other `{key}` is a follow-up answer substitution.

const MOTIVATIONS_SEED: &str = r#"You are an expert survey designer. Your task is to generate survey questions to uncover consumer motivations and frustrations regarding the {motivationFocus} described as: "{motivationDescription}".
{projectContext}

The survey MUST be structured into the following sections. Each section MUST have a 'sectionTitle', an optional 'sectionDescription', and an array of 'questions'. The section titles MUST BE EXACTLY: {sectionTitles}.

When generating questions for each section:
-   Generate fresh, relevant questions for each section based on the user's input and the section's purpose.
-   If the user has entered a minor typo when describing their {motivationFocus} (e.g., 'coffe maker' instead of 'coffee maker'), use your intuition to infer the correct term. Integrate this corrected term naturally into the questions.
-   For the "Screener: Category usage" section, questions MUST focus on general usage/familiarity with a *broader category* related to '{motivationDescription}' and MUST NOT reveal specific research objectives to avoid bias.
-   For all subsequent sections, questions SHOULD directly address the specific {motivationFocus} '{motivationDescription}'. For example, if {motivationFocus} is 'cars', questions in later sections should ask about 'cars', not 'vehicles'.

General Instructions for all questions:
- Adhere to the 'questionType' and 'options' format as defined in the output schema.
- Ensure a good mix of question types (openText, closedText, scale) within sections.
- Ensure the overall survey is comprehensive yet concise.
- The 'surveyTitle' and 'surveyIntroduction' (which you will also generate as part of the main output object) MUST be vague and NOT reveal the specific {motivationFocus} '{motivationDescription}' to avoid biasing screener responses. For example, if the focus is 'Nike running shoes', title could be 'Your Fitness Gear Opinions', not 'Nike Running Shoe Survey'.
"#;

const THEMES_SEED: &str = r#"You are an expert survey designer. Your task is to generate survey questions to explore consumer engagement with a specific theme or trend, focusing on {explorationFocus}.
The theme/trend being explored is: '{themeDescription}'.
The context (product/service, brand, or general category) related to this theme is: '{contextDescription}'.
{projectContext}

The survey MUST be structured into the following sections. Each section MUST have a 'sectionTitle', an optional 'sectionDescription', and an array of 'questions'. The section titles MUST BE EXACTLY: {sectionTitles}.

When generating questions for each section:
-   Generate fresh, relevant questions for each section based on the user's input and the section's purpose.
-   If the user has entered a minor typo when describing their theme (e.g., 'suustainab' instead of 'sustainability', or 'Natural beaty' instead of 'Natural beauty'), use your intuition to infer the correct term. Integrate this corrected theme naturally into the questions where appropriate, without using inverted commas unless grammatically natural (e.g., "How important is sustainability to you..." not "How important is 'sustainab' to you...").
-   For "Screener: Category usage", "Drivers of choice: Category", and "Key benefits & features" sections, questions MUST NOT mention the specific theme '{themeDescription}' to capture unprompted insights. For example, instead of "What is the most important factor when choosing a product or service related to {themeDescription}?", ask "What is the most important factor when choosing a product or service in this general category?".
-   For "Importance of theme", "Consumer definition", and "Winning in the space" sections, questions SHOULD EXPLICITLY refer to the (potentially corrected) theme '{themeDescription}'.

General Instructions for all questions:
- Adhere to the 'questionType' and 'options' format as defined in the output schema.
- Ensure a good mix of question types (openText, closedText, scale) within prompted sections.
- Ensure the overall survey is comprehensive yet concise.
- The 'surveyTitle' and 'surveyIntroduction' (which you will also generate as part of the main output object) MUST be vague and NOT reveal the specific theme '{themeDescription}' or the detailed nature of '{contextDescription}' to avoid biasing screener responses. For example, if the theme is 'AI in healthcare apps', title could be 'Your Digital Health Opinions' not 'AI Healthcare App Survey'.
"#;

const USAGE_EXPERIENCE_SEED: &str = r#"You are an expert survey designer. Your task is to generate survey questions to understand the usage and experience of the {usageFocusType} "{usageFocusDescription}".
The goal is to {usageAnalysisGoal}.
{projectContext}

The survey MUST be structured into the following sections. Each section MUST have a 'sectionTitle', an optional 'sectionDescription', and an array of 'questions'. The section titles MUST BE EXACTLY: {sectionTitles}.

When generating questions for each section:
-   Generate fresh, relevant questions for each section based on the user's input and the section's purpose.
-   If the user has entered a minor typo when describing their {usageFocusType} (e.g., 'sreaming music' instead of 'streaming music'), use your intuition to infer the correct term. Integrate this corrected term naturally into the questions.
-   For the "Screener: Category usage" section:
    - Questions MUST focus on general usage/familiarity with a *broader category* related to '{usageFocusDescription}' and MUST NOT reveal the specific research objective '{usageFocusDescription}' too early to avoid bias.
    - **IF** '{usageAnalysisGoal}' indicates a "deep dive into the specific usage occasion of: \"{usageDeepDiveOccasion}\"", THEN an additional 'screener' question MUST be included to verify if the respondent has used/experienced '{usageFocusDescription}' during the specific occasion '{usageDeepDiveOccasion}'.
-   For all subsequent sections, questions SHOULD directly address the specific {usageFocusType} '{usageFocusDescription}'. For example, if {usageFocusType} is 'cars', questions in later sections should ask about 'cars', not 'vehicles'.
-   If {usageAnalysisGoal} specifies a deep dive into "{usageDeepDiveOccasion}", the "Consumption / Usage occasions" section should focus heavily on exploring aspects of that specific occasion.

General Instructions for all questions:
- Adhere to the 'questionType' and 'options' format as defined in the output schema.
- Ensure a good mix of question types (openText, closedText, scale) within sections.
- Ensure the overall survey is comprehensive yet concise.
- The 'surveyTitle' and 'surveyIntroduction' (which you will also generate as part of the main output object) MUST be vague and NOT reveal the specific {usageFocusType} '{usageFocusDescription}' to avoid biasing screener responses. For example, if the focus is 'Spotify music streaming', title could be 'Your Media Habits Survey', not 'Spotify Usage Survey'."#;

const BRAND_SEED: &str = r#"You are an expert survey designer. Your task is to generate survey questions to discover consumer perceptions of the brand described as '{brandDescription}', which operates in the category '{brandCategory}'. The aim is to uncover what truly resonates with its audience. If competitors are specified (e.g., '{brandCompetitors}'), include questions that help understand the brand's positioning against them. If key metrics for perception are specified (e.g., '{brandKeyMetrics}'), include questions to measure these aspects.
{projectContext}

The survey MUST be structured into the following sections. Each section MUST have a 'sectionTitle', an optional 'sectionDescription', and an array of 'questions'. The section titles MUST BE EXACTLY: {sectionTitles}.

When generating questions for each section:
-   Generate fresh, relevant questions for each section based on the user's input and the section's purpose.
-   If the user has entered a minor typo when describing their brand (e.g., 'Nkie' instead of 'Nike'), use your intuition to infer the correct term. Integrate this corrected term naturally into the questions.
-   For "Screener: Category usage" and "Screener: Brand awareness" sections, questions MUST focus on general category familiarity and brand awareness without revealing deeper research objectives too early.
-   For all subsequent sections, questions SHOULD directly address the specific brand '{brandDescription}' and its context.

General Instructions for all questions:
- Adhere to the 'questionType' and 'options' format as defined in the output schema.
- Ensure a good mix of question types (openText, closedText, scale) within sections.
- Ensure the overall survey is comprehensive yet concise.
- The 'surveyTitle' and 'surveyIntroduction' (which you will also generate as part of the main output object) MUST be vague and NOT reveal the specific brand '{brandDescription}' or '{brandCategory}' to avoid biasing screener responses."#;

const SHOPPERS_PURCHASES_SEED: &str = r#"You are an expert survey designer. Your task is to generate survey questions to explore shopping behavior.
The focus is on {shoppingPatternFocus} described as '{shoppingPatternDescription}'.
Understanding depth should be {shoppingBehaviorDepth}.
Specific mission (if applicable): '{shopperMissionDeepDive}'.
Type of shopping behavior interested in: {shoppingBehaviorTypeInterest}.
The goal is to unlock consumer preferences, channel choice drivers, and the overall shopper experience.
{projectContext}

The survey MUST be structured into the following sections. Each section MUST have a 'sectionTitle', an optional 'sectionDescription', and an array of 'questions'. The section titles MUST BE EXACTLY: {sectionTitles}.

When generating questions for each section:
-   Generate fresh, relevant questions for each section based on the user's input and the section's purpose.
-   If the user has entered a minor typo when describing their {shoppingPatternFocus} (e.g., 'fashon' instead of 'fashion'), use your intuition to infer the correct term. Integrate this corrected term naturally into the questions.
-   For the "Screener: Category purchase" section, questions MUST focus on general purchase/familiarity with the *broader category* of '{shoppingPatternDescription}' and MUST NOT mention the specific '{shoppingPatternDescription}' itself.
-   For all subsequent sections, questions should directly address the specific '{shoppingPatternDescription}'.

General Instructions for all questions:
- Adhere to the 'questionType' and 'options' format as defined in the output schema.
- Ensure a good mix of question types (openText, closedText, scale) within sections.
- Ensure the overall survey is comprehensive yet concise.
- The 'surveyTitle' and 'surveyIntroduction' (which you will also generate as part of the main output object) MUST be vague and NOT reveal the specific '{shoppingPatternDescription}' to avoid biasing screener responses."#;

const SCREENING_SEED: &str = r#"You are an expert survey designer. Your task is to design a Concept Screening Test survey.
Framework: Concept Screening (Consecutive Monadic).
We are testing {whatToTest}.
Number of concepts to screen: {conceptCount}.
Concept descriptions (you must parse these into individual concepts for evaluation, e.g., "Concept 1: [desc]. Concept 2: [desc]."): {conceptDescription}.
Stimuli (if provided, e.g. filename '{stimuliUpload}'): {stimuliUpload}. These stimuli correspond to the concepts described.
Key metrics to test each concept against: {keyMetrics}.
{projectContext}

The survey MUST be structured into the following sections. The section titles MUST BE EXACTLY as specified below.

1.  A "Screeners: General Qualification" section with general questions to qualify respondents. These questions should not reveal the specific concepts.
2.  For EACH of the {conceptCount} concepts detailed in {conceptDescription}:
    a.  A dedicated evaluation section presented consecutively. Title it "Concept N: [Brief Concept Identifier from description]". (e.g. "Concept 1: Eco-Friendly Cleaner", "Concept 2: Smart Home App"). Use your intuition to create a concise and meaningful [Brief Concept Identifier from description] based on the {conceptDescription} for that concept.
    b.  In this section, ask a few key questions (monadic evaluation, typically using 'scale' or simple 'closedText') to quickly assess this single concept against the most critical {keyMetrics}. The goal is rapid screening, so these sections should be concise (e.g., 2-3 questions per concept). Generate fresh, relevant questions based on the concept and key metrics.
    c.  If the user has entered a minor typo when describing their concept or key metrics, use your intuition to infer the correct term. Integrate this corrected term naturally into the questions.
3.  Optionally, after all concepts have been shown and rated, you may include a "Final Preference/Ranking" section if it adds value to the screening objective (e.g., "Which of the concepts you saw was most appealing?").

The `surveyTitle` and `surveyIntroduction` MUST be general and not reveal the specifics of the concepts to avoid biasing screener responses.
Adhere to the standard output schema for survey sections, questions, types, and options.
"#;

const DEEP_DIVE_SEED: &str = r#"You are an expert survey designer. Your task is to design a Monadic Deep Dive Test survey.
Framework: Monadic Deep Dive.
We are testing {whatToTest}.
Number of concepts to evaluate (each tested monadically): {conceptCount}.
Concept descriptions (you must parse these into individual concepts for evaluation, e.g., "Concept 1: [desc]. Concept 2: [desc]."): {conceptDescription}.
Stimuli (if provided, e.g. filename '{stimuliUpload}'): {stimuliUpload}. These stimuli correspond to the concepts described.
Key metrics to test each concept against: {keyMetrics}.
{projectContext}

The survey MUST be structured into the following sections. The section titles MUST BE EXACTLY as specified below.

1.  A "Screeners: General Qualification" section with general questions to qualify respondents. These questions should not reveal the specific concepts.
2.  For EACH of the {conceptCount} concepts detailed in {conceptDescription}:
    a.  A dedicated evaluation section. Title it "Concept N: Deep Dive Evaluation". Use your intuition to replace N with the concept number (e.g., "Concept 1: Deep Dive Evaluation", "Concept 2: Deep Dive Evaluation").
    b.  In this section, ask a comprehensive set of questions (monadic evaluation) to assess this single concept against all the {keyMetrics}. Generate fresh, relevant questions using a mix of 'scale', 'closedText', and 'openText' types. This section should provide a deep understanding of the concept's strengths and weaknesses.
    c.  If the user has entered a minor typo when describing their concept or key metrics, use your intuition to infer the correct term. Integrate this corrected term naturally into the questions.
    d.  (Note: In a real monadic test run by a survey platform, a respondent would typically see only ONE such evaluation section. The survey design here should include all {conceptCount} evaluation sections for the survey designer to review and set up appropriate respondent allocation in their deployment tool.)

The `surveyTitle` and `surveyIntroduction` MUST be general and not reveal the specifics of the concepts to avoid biasing screener responses.
Adhere to the standard output schema for survey sections, questions, types, and options.
"#;

const HEAD_TO_HEAD_SEED: &str = r#"You are an expert survey designer. Your task is to design a Head-to-Head Comparison Test survey.
Framework: Head-to-Head Comparison (Sequential Monadic with Comparative Section).
We are testing {whatToTest}.
Number of concepts to compare: {conceptCount}.
Concept descriptions (you must parse these into individual concepts for evaluation, e.g., "Concept A: [desc]. Concept B: [desc]."): {conceptDescription}. Use your intuition to assign short identifiers like "Concept A", "Concept B" if not explicitly provided.
Stimuli (if provided, e.g. filename '{stimuliUpload}'): {stimuliUpload}. These stimuli correspond to the concepts described.
Key metrics for comparison: {keyMetrics}.
{projectContext}

The survey MUST be structured into the following sections. The section titles MUST BE EXACTLY as specified below.

1.  A "Screeners: General Qualification" section with general questions to qualify respondents. These questions should not reveal the specific concepts.
2.  For EACH of the {conceptCount} concepts detailed in {conceptDescription}:
    a.  A dedicated evaluation section. Title it "Evaluation of [Concept Identifier]". (e.g. "Evaluation of Concept A", "Evaluation of Slogan X").
    b.  In this section, ask questions (monadic evaluation) to assess this single concept against all the {keyMetrics}. Generate fresh, relevant questions using a mix of 'scale', 'closedText', and 'openText' types.
    c.  If the user has entered a minor typo when describing their concept or key metrics, use your intuition to infer the correct term. Integrate this corrected term naturally into the questions.
3.  A final "Comparative Evaluation" section.
    a.  The `sectionTitle` should be "Comparative Evaluation".
    b.  The `sectionDescription` could be "Now, please compare the {whatToTest} you have seen."
    c.  The `questions` in this section MUST directly compare all the concepts against each other. Ensure these questions are appropriate for comparing {conceptCount} items. If {conceptCount} is greater than 2, a ranking question or a series of paired comparisons might be needed for some metrics. Generate fresh, relevant questions.

The `surveyTitle` and `surveyIntroduction` MUST be general and not reveal the specifics of the concepts or the comparative nature initially, to avoid biasing screener responses.
Adhere to the standard output schema for survey sections, questions, types, and options.
"#;

/// Follow-ups shared by every test template; only the concept-count range
/// differs between screening and dive/compare frameworks.
fn test_follow_ups(concept_counts: Vec<FollowUpOption>) -> Vec<FollowUpQuestion> {
    vec![
        FollowUpQuestion {
            options: vec![
                opt("concepts", "Concepts"),
                opt("ideas", "Ideas"),
                opt("claims", "Claims"),
                opt("packages", "Packages"),
                opt("features", "Features"),
                opt("messaging_taglines", "Messaging & Taglines"),
                opt("campaigns", "Campaigns"),
            ],
            ..FollowUpQuestion::new(
                "whatToTest",
                DynamicText::Literal("What are you looking to test?"),
                FollowUpKind::Dropdown,
            )
        },
        FollowUpQuestion {
            options: concept_counts,
            ..FollowUpQuestion::new(
                "conceptCount",
                DynamicText::Literal("How many concepts are you looking to test?"),
                FollowUpKind::NumberDropdown,
            )
        },
        FollowUpQuestion::textarea(
            "conceptDescription",
            DynamicText::Literal("Describe your concept(s) in as much detail as possible"),
            DynamicText::Computed(concept_description_placeholder),
        ),
        FollowUpQuestion {
            description: Some("Upload your stimuli (e.g., images, documents, videos)."),
            ..FollowUpQuestion::new(
                "stimuliUpload",
                DynamicText::Literal(
                    "Upload information or stimuli for your concept(s) (optional)",
                ),
                FollowUpKind::FileUpload,
            )
            .optional()
        },
        FollowUpQuestion::textarea(
            "keyMetrics",
            DynamicText::Literal("What key metrics are you looking to test your concept against?"),
            DynamicText::Literal(
                "e.g., Appeal, Uniqueness, Purchase Intent, Believability, Clarity",
            ),
        ),
        project_big_question(TEST_CONTEXT_PLACEHOLDER),
    ]
}

/// Every template, explore arm first.
pub fn all_templates() -> Vec<Template> {
    vec![
        Template {
            id: "motivations",
            title: "Motivations & frustrations",
            description: "Gain an understanding of consumer drivers, frustrations, and unmet needs.",
            kind: SolutionKind::Explore,
            framework_sections: vec![
                "Screener: Category usage",
                "Buying Patterns",
                "Product Repertoire",
                "Brand Repertoire",
                "Drivers of choice: Product",
                "Drivers of choice: Brand",
                "Consumption / Usage occasions",
                "Product Frustrations & Improvements",
                "Channel Repertoire & Preferences",
                "Drivers of choice: Channel",
            ],
            follow_up_questions: vec![
                FollowUpQuestion::radio(
                    "motivationFocus",
                    "What are you looking to explore?",
                    vec![
                        opt("product", "Usage of a product"),
                        opt("brand", "Usage of a brand"),
                        opt("service", "Usage of a service"),
                        opt("category", "Usage of a category"),
                        opt("activity", "Behaviours around an activity"),
                    ],
                ),
                FollowUpQuestion::textarea(
                    "motivationDescription",
                    DynamicText::Computed(motivation_description_label),
                    DynamicText::Computed(motivation_description_placeholder),
                ),
                project_big_question(EXPLORE_CONTEXT_PLACEHOLDER),
            ],
            seed_text: MOTIVATIONS_SEED,
        },
        Template {
            id: "themes",
            title: "Themes",
            description: "Learn how consumers define and engage with topics & themes within your area of focus.",
            kind: SolutionKind::Explore,
            framework_sections: vec![
                "Screener: Category usage",
                "Drivers of choice: Category",
                "Key benefits & features",
                "Importance of theme",
                "Consumer definition",
                "Winning in the space",
            ],
            follow_up_questions: vec![
                FollowUpQuestion::radio(
                    "explorationFocus",
                    "What are you looking to explore?",
                    vec![
                        opt("definitions", "Consumer definitions of a theme or trend"),
                        opt("relevance", "Relevance of a theme or trend in your category"),
                        opt("alignment", "How to align your brand with a theme or trend"),
                    ],
                ),
                FollowUpQuestion::textarea(
                    "themeDescriptionForDefinitions",
                    DynamicText::Literal("Describe your theme or trend"),
                    DynamicText::Literal(
                        "e.g., The rise of minimalist lifestyles and their impact on purchasing decisions.",
                    ),
                )
                .shown_if("explorationFocus", "definitions"),
                FollowUpQuestion::textarea(
                    "themeDescriptionForRelevance",
                    DynamicText::Literal("Describe your theme or trend"),
                    DynamicText::Literal(
                        "e.g., The increasing importance of data privacy for online users.",
                    ),
                )
                .shown_if("explorationFocus", "relevance"),
                FollowUpQuestion::textarea(
                    "productDescriptionForRelevance",
                    DynamicText::Literal("Describe your product or service"),
                    DynamicText::Literal("e.g., We offer a subscription box for artisanal coffee."),
                )
                .shown_if("explorationFocus", "relevance"),
                FollowUpQuestion::textarea(
                    "themeDescriptionForAlignment",
                    DynamicText::Literal("Describe your theme or trend"),
                    DynamicText::Literal(
                        "e.g., The shift towards sustainable and ethically sourced products.",
                    ),
                )
                .shown_if("explorationFocus", "alignment"),
                FollowUpQuestion::textarea(
                    "brandDescriptionForAlignment",
                    DynamicText::Literal("Describe your brand"),
                    DynamicText::Literal(
                        "e.g., Our brand is a leader in eco-conscious home goods.",
                    ),
                )
                .shown_if("explorationFocus", "alignment"),
                project_big_question(EXPLORE_CONTEXT_PLACEHOLDER),
            ],
            seed_text: THEMES_SEED,
        },
        Template {
            id: "usageExperience",
            title: "Usage & experience",
            description: "Understand the when, where, who, why, what and how of the usage of a product or service.",
            kind: SolutionKind::Explore,
            framework_sections: vec![
                "Screener: Category usage",
                "Usage context: Mood",
                "Usage context: What (Activity)",
                "Usage context: When (Time)",
                "Usage context: Who With",
                "Usage context: Where (Location)",
                "Consumption / Usage occasions",
                "Drivers of choice: Product",
                "Drivers of choice: Brand",
                "Consideration Set & Alternatives",
            ],
            follow_up_questions: vec![
                FollowUpQuestion::radio(
                    "usageFocusType",
                    "What are you looking to explore?",
                    vec![
                        opt("product", "Usage of a product"),
                        opt("brand", "Usage of a brand"),
                        opt("service", "Usage of a service"),
                        opt("category", "Usage of a category"),
                    ],
                ),
                FollowUpQuestion::textarea(
                    "usageFocusDescription",
                    DynamicText::Computed(usage_description_label),
                    DynamicText::Computed(usage_description_placeholder),
                ),
                FollowUpQuestion::radio(
                    "usageUnderstandingDepth",
                    "How do you want to understand usage?",
                    vec![
                        opt(
                            "broad",
                            "I want to understand broad usage behaviours across all occasions / moments",
                        ),
                        opt(
                            "deepDive",
                            "I want to deep dive into a specific usage occassion / moments (e.g. 'morning usage occasions' or 'social usage occasions')",
                        ),
                    ],
                ),
                FollowUpQuestion::textarea(
                    "usageDeepDiveOccasion",
                    DynamicText::Literal("What is the usage occasion you'd like to deep dive into?"),
                    DynamicText::Literal(
                        "e.g., Morning commute, Weekend relaxation, Post-workout routines",
                    ),
                )
                .shown_if("usageUnderstandingDepth", "deepDive"),
                project_big_question(EXPLORE_CONTEXT_PLACEHOLDER),
            ],
            seed_text: USAGE_EXPERIENCE_SEED,
        },
        Template {
            id: "brand",
            title: "Brand",
            description: "Discover how consumers perceive your brand, uncovering what truly resonates with your audience.",
            kind: SolutionKind::Explore,
            framework_sections: vec![
                "Screener: Category usage",
                "Screener: Brand awareness",
                "Brand funnel: Awareness, Consideration, Usage, Preferred",
                "Drivers of choice: Brand",
                "Key benefits & features",
                "Perception of brand",
                "Winning in the space",
                "Key Brand Metrics",
            ],
            follow_up_questions: vec![
                FollowUpQuestion::textarea(
                    "brandDescription",
                    DynamicText::Literal("Describe your brand in a sentence or two"),
                    DynamicText::Literal(
                        "e.g., Nike is a global leader in athletic footwear, apparel, and equipment.",
                    ),
                ),
                FollowUpQuestion::textarea(
                    "brandCategory",
                    DynamicText::Literal(
                        "Describe the category your brand sits in in a sentence or two",
                    ),
                    DynamicText::Computed(brand_category_placeholder),
                ),
                FollowUpQuestion::textarea(
                    "brandCompetitors",
                    DynamicText::Literal(
                        "Describe the competitors you'd want to compare your brand against? (optional)",
                    ),
                    DynamicText::Literal("e.g., Adidas, Puma, Under Armour, New Balance"),
                )
                .optional(),
                FollowUpQuestion::textarea(
                    "brandKeyMetrics",
                    DynamicText::Literal(
                        "What key metrics would you like to measure brand perception against? (optional)",
                    ),
                    DynamicText::Literal(
                        "e.g., Trust, innovation, quality, value for money, customer service, sustainability",
                    ),
                )
                .optional(),
                project_big_question(EXPLORE_CONTEXT_PLACEHOLDER),
            ],
            seed_text: BRAND_SEED,
        },
        Template {
            id: "shoppersPurchases",
            title: "Shoppers & purchases",
            description: "Explore purchase behaviour, unlocking channel choice drivers and shopper experience.",
            kind: SolutionKind::Explore,
            framework_sections: vec![
                "Screener: Category purchase",
                "Purchase context: What",
                "Drivers of choice: Product",
                "Drivers of choice: Brand",
                "Purchase context: When",
                "Purchase context: Who with",
                "Purchase context: Where",
                "Purchase context: Channel",
                "Purchase Context: Type of Shopping Trip",
                "Drivers of choice: Channel",
            ],
            follow_up_questions: vec![
                FollowUpQuestion::radio(
                    "shoppingPatternFocus",
                    "What are you looking to explore?",
                    vec![
                        opt("product", "Shopping and purchase patterns of a product"),
                        opt("service", "Shopping and purchase patterns of a service"),
                        opt("category", "Shopping and purchase patterns within a category"),
                        opt("brand", "Shopping and purchase patterns of a brand"),
                    ],
                ),
                FollowUpQuestion::textarea(
                    "shoppingPatternDescription",
                    DynamicText::Computed(shopping_description_label),
                    DynamicText::Computed(shopping_description_placeholder),
                ),
                FollowUpQuestion::radio(
                    "shoppingBehaviorDepth",
                    "How do you want to understand shopping behavior?",
                    vec![
                        opt(
                            "broad",
                            "Understand broad shopping behaviours across all shopper missions",
                        ),
                        opt("deepDive", "Deep dive into a specific shopper mission"),
                    ],
                ),
                FollowUpQuestion::textarea(
                    "shopperMissionDeepDive",
                    DynamicText::Literal(
                        "What is the shopper mission you'd like to deep dive into?",
                    ),
                    DynamicText::Literal(
                        "e.g., Bargain hunting, researching high-value items, weekly grocery stock-up",
                    ),
                )
                .shown_if("shoppingBehaviorDepth", "deepDive"),
                FollowUpQuestion::radio(
                    "shoppingBehaviorTypeInterest",
                    "What type of shopping behaviour are you interested in?",
                    vec![
                        opt("online", "Online shopping"),
                        opt("offline", "Offline shopping (in-store)"),
                        opt("omnichannel", "Omni-channel (both online and offline)"),
                    ],
                ),
                project_big_question(EXPLORE_CONTEXT_PLACEHOLDER),
            ],
            seed_text: SHOPPERS_PURCHASES_SEED,
        },
        Template {
            id: "screening",
            title: "Screening",
            description: "Rapidly sift through concepts (consecutive testing). Best for >5 concepts.",
            kind: SolutionKind::Test,
            framework_sections: vec![
                "Screeners: General Qualification",
                "Concept 1 Evaluation",
                "Concept 2 Evaluation",
                "Concept N Evaluation...",
                "Final Preference/Ranking",
            ],
            follow_up_questions: test_follow_ups(count_options(5, 10)),
            seed_text: SCREENING_SEED,
        },
        Template {
            id: "deepDive",
            title: "Deep dive",
            description: "Unlock insights into individual strengths/weaknesses (monadic testing). Best for <5 concepts.",
            kind: SolutionKind::Test,
            framework_sections: vec![
                "Screeners: General Qualification",
                "Concept 1: Deep Dive Evaluation",
                "Concept 2: Deep Dive Evaluation (if applicable)",
            ],
            follow_up_questions: test_follow_ups(count_options(1, 4)),
            seed_text: DEEP_DIVE_SEED,
        },
        Template {
            id: "headToHead",
            title: "Head-to-head",
            description: "Efficiently compare and pinpoint performers (sequential testing). Best for <5 concepts.",
            kind: SolutionKind::Test,
            framework_sections: vec![
                "Screeners: General Qualification",
                "Concept A Evaluation",
                "Concept B Evaluation",
                "Comparative Evaluation",
            ],
            follow_up_questions: test_follow_ups(count_options(1, 4)),
            seed_text: HEAD_TO_HEAD_SEED,
        },
    ]
}

/// Templates for one arm of the product.
pub fn templates_for(kind: SolutionKind) -> Vec<Template> {
    all_templates().into_iter().filter(|t| t.kind == kind).collect()
}

/// Look up a template by id.
pub fn find_template(id: &str) -> Option<Template> {
    all_templates().into_iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{SectionKind, catalog};

    #[test]
    fn test_template_ids_unique() {
        let templates = all_templates();
        let mut ids: Vec<&str> = templates.iter().map(|t| t.id).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_find_template() {
        assert!(find_template("brand").is_some());
        assert!(find_template("no-such-template").is_none());
    }

    #[test]
    fn test_explore_seed_texts_carry_slots() {
        for template in templates_for(SolutionKind::Explore) {
            assert!(
                template.seed_text.contains("{sectionTitles}"),
                "{} is missing the section-titles slot",
                template.id
            );
            assert!(
                template.seed_text.contains("{projectContext}"),
                "{} is missing the project-context slot",
                template.id
            );
        }
    }

    #[test]
    fn test_explore_framework_titles_resolve_against_catalog() {
        let screeners = catalog(SectionKind::Screener);
        let content = catalog(SectionKind::Content);
        for template in templates_for(SolutionKind::Explore) {
            for title in &template.framework_sections {
                let found = find(&screeners, title).is_some() || find(&content, title).is_some();
                assert!(found, "{}: '{}' not in catalog", template.id, title);
            }
        }
    }

    #[test]
    fn test_framework_titles_split_by_kind() {
        let brand = find_template("brand").unwrap();
        let screeners = brand.framework_titles(SectionKind::Screener);
        assert_eq!(
            screeners,
            vec!["Screener: Category usage", "Screener: Brand awareness"]
        );
        let content = brand.framework_titles(SectionKind::Content);
        assert_eq!(content.len(), brand.framework_sections.len() - 2);
    }

    #[test]
    fn test_default_sections_keep_unknown_titles() {
        let screening = find_template("screening").unwrap();
        let content = catalog(SectionKind::Content);
        let defaults = screening.default_sections(SectionKind::Content, &content);
        assert!(
            defaults
                .iter()
                .any(|s| s.title == "Concept N Evaluation...")
        );
    }

    #[test]
    fn test_answers_complete_requires_visible_required() {
        let themes = find_template("themes").unwrap();
        let mut answers = AnswerMap::new();
        assert!(!themes.answers_complete(&answers));

        answers.insert("explorationFocus".into(), "definitions".into());
        assert!(!themes.answers_complete(&answers));

        answers.insert(
            "themeDescriptionForDefinitions".into(),
            "Minimalist lifestyles".into(),
        );
        // Conditional questions for the other branches stay hidden, and the
        // big-question context is optional.
        assert!(themes.answers_complete(&answers));
    }

    #[test]
    fn test_computed_label_tracks_focus() {
        let motivations = find_template("motivations").unwrap();
        let description = motivations
            .follow_up_questions
            .iter()
            .find(|q| q.id == "motivationDescription")
            .unwrap();

        let mut answers = AnswerMap::new();
        assert_eq!(description.label.resolve(&answers), "Describe your item");

        answers.insert("motivationFocus".into(), "brand".into());
        assert_eq!(description.label.resolve(&answers), "Describe your brand");
    }

    #[test]
    fn test_computed_placeholder_tracks_answers() {
        let brand = find_template("brand").unwrap();
        let category = brand
            .follow_up_questions
            .iter()
            .find(|q| q.id == "brandCategory")
            .unwrap();

        let mut answers = AnswerMap::new();
        answers.insert("brandDescription".into(), "Acme, the rocket company".into());
        let placeholder = category.placeholder.as_ref().unwrap().resolve(&answers);
        assert!(placeholder.starts_with("e.g., If Acme is Nike"));
    }

    #[test]
    fn test_concept_placeholder_pluralization() {
        let screening = find_template("screening").unwrap();
        let description = screening
            .follow_up_questions
            .iter()
            .find(|q| q.id == "conceptDescription")
            .unwrap();

        let mut answers = AnswerMap::new();
        answers.insert("whatToTest".into(), "claims".into());
        answers.insert("conceptCount".into(), "6".into());
        let placeholder = description.placeholder.as_ref().unwrap().resolve(&answers);
        assert!(placeholder.contains("claim 1:"));
    }

    #[test]
    fn test_test_templates_concept_count_ranges() {
        let screening = find_template("screening").unwrap();
        let counts = &screening
            .follow_up_questions
            .iter()
            .find(|q| q.id == "conceptCount")
            .unwrap()
            .options;
        assert_eq!(counts.first().unwrap().value, "5");
        assert_eq!(counts.last().unwrap().value, "10");

        let deep_dive = find_template("deepDive").unwrap();
        let counts = &deep_dive
            .follow_up_questions
            .iter()
            .find(|q| q.id == "conceptCount")
            .unwrap()
            .options;
        assert_eq!(counts.first().unwrap().value, "1");
        assert_eq!(counts.last().unwrap().value, "4");
    }
}
