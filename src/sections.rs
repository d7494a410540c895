//! Section Library: the catalog of reusable framework sections.
//!
//! Sections are immutable catalog entries. Screener sections are identified
//! by the `"Screener:"` title prefix. The catalog is deduplicated by title
//! and sorted alphabetically for display; merge ordering is a separate rule
//! owned by the merge module. Lookup failure is signaled by omission, never
//! by an error.

use crate::survey::{QuestionType, SurveyQuestion};

/// Title prefix identifying screener sections.
pub const SCREENER_PREFIX: &str = "screener:";

/// A reusable block of example questions offered to templates.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkSection {
    /// Unique key within the catalog.
    pub title: String,
    pub description: String,
    pub example_questions: Vec<SurveyQuestion>,
}

/// Which half of the catalog a caller wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Screener,
    Content,
}

impl SectionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Screener => "screener",
            Self::Content => "content",
        }
    }
}

/// Whether a section title follows the screener naming convention.
pub fn is_screener_title(title: &str) -> bool {
    title.to_lowercase().starts_with(SCREENER_PREFIX)
}

/// Generic example questions used by most content sections.
fn generic_examples(topic: &str) -> Vec<SurveyQuestion> {
    let lower = topic.to_lowercase();
    vec![
        SurveyQuestion::new(
            format!("What are your thoughts on {lower}?"),
            QuestionType::OpenText,
        ),
        SurveyQuestion::with_options(
            format!("How would you rate your overall experience with {lower}?"),
            QuestionType::Scale,
            [
                "1 - Very Poor",
                "2 - Poor",
                "3 - Neutral",
                "4 - Good",
                "5 - Very Good",
            ],
        ),
        SurveyQuestion::with_options(
            format!("Which of the following best describes your primary use of {lower}?"),
            QuestionType::ClosedText,
            ["Option A", "Option B", "Option C", "Other (please specify)"],
        ),
    ]
}

/// Example scaffold for screeners whose description *is* the question.
fn screener_examples(topic: &str, question: &str) -> Vec<SurveyQuestion> {
    vec![SurveyQuestion::with_options(
        question,
        QuestionType::ClosedText,
        [
            format!("[Option for {topic} 1]"),
            format!("[Option for {topic} 2]"),
            format!("[Option for {topic} 3]"),
            "None of these".to_string(),
        ],
    )]
}

fn section(title: &str, description: &str, examples: Vec<SurveyQuestion>) -> FrameworkSection {
    FrameworkSection {
        title: title.to_string(),
        description: description.to_string(),
        example_questions: examples,
    }
}

/// Screener whose description doubles as its qualifying question.
fn screener(title: &str, question: &str) -> FrameworkSection {
    let topic = title.trim_start_matches("Screener: ");
    section(title, question, screener_examples(topic, question))
}

/// Common sections shared across templates: screeners plus the bookend
/// demographics/feedback blocks.
fn common_sections() -> Vec<FrameworkSection> {
    vec![
        section(
            "Screener: Category usage",
            "Qualify respondents based on their general interaction with the category.",
            generic_examples("Category Usage Screening"),
        ),
        section(
            "Screener: Product Ownership",
            "Filter for users who own or have experience with specific products.",
            generic_examples("Product Ownership Screening"),
        ),
        section(
            "Screener: General Qualification",
            "General questions to qualify or segment respondents before concept exposure.",
            generic_examples("General Qualification Screening"),
        ),
        screener(
            "Screener: Brand usage",
            "Which, if any, of the following brands do you use nowadays?",
        ),
        screener(
            "Screener: Brand awareness",
            "Which, if any, of the following brands have you ever heard of before today?",
        ),
        screener(
            "Screener: Brand consideration",
            "Which, if any, of the following brands would you consider buying in future?",
        ),
        screener(
            "Screener: Brand non-rejector",
            "Are there any of the following brands that you would never consider buying?",
        ),
        screener(
            "Screener: Activity",
            "Which, if any, of the following activities do you take part in nowadays?",
        ),
        screener(
            "Screener: Decision maker",
            "Which best describes your role when it comes to choosing which [category, product, brand, service] to buy?",
        ),
        screener(
            "Screener: Category purchase",
            "Which, if any, of the following categories have you bought in the last month?",
        ),
        screener(
            "Screener: Brand purchase",
            "Which, if any, of the following brands have you bought in the last month?",
        ),
        screener(
            "Screener: Purchase channel usage",
            "Where have you shopped for [category, product, brand] in the last month?",
        ),
        section(
            "Demographics",
            "Collect standard demographic information like age, gender, location, etc.",
            generic_examples("Demographics"),
        ),
        section(
            "Final Comments & Feedback",
            "Provide an open-ended opportunity for any additional thoughts or feedback.",
            generic_examples("Final Comments"),
        ),
    ]
}

fn engagement_sections() -> Vec<FrameworkSection> {
    vec![
        section(
            "Overall Satisfaction",
            "Gauge overall happiness and contentment with the subject.",
            generic_examples("Overall Satisfaction"),
        ),
        section(
            "Product Appeal",
            "Assess the general attractiveness and desirability of the product.",
            generic_examples("Product Appeal"),
        ),
        section(
            "Feature Importance & Satisfaction",
            "Evaluate which features are most important and how satisfied users are with them.",
            generic_examples("Feature Importance"),
        ),
        section(
            "Unmet Needs & Pain Points",
            "Identify challenges, frustrations, and opportunities for improvement.",
            generic_examples("Unmet Needs"),
        ),
        section(
            "Purchase Intent",
            "Measure the likelihood of future purchase or adoption.",
            generic_examples("Purchase Intent"),
        ),
        section(
            "Emotional Drivers",
            "Explore the feelings and emotions that influence decisions and engagement.",
            generic_examples("Emotional Drivers"),
        ),
    ]
}

fn brand_and_market_sections() -> Vec<FrameworkSection> {
    vec![
        section(
            "Brand Perception",
            "Understand how consumers view and feel about the brand.",
            generic_examples("Brand Perception"),
        ),
        section(
            "Brand funnel: Awareness, Consideration, Usage, Preferred",
            "Track consumer progression from awareness to loyalty for the brand.",
            generic_examples("Brand Funnel"),
        ),
        section(
            "Key Brand Metrics",
            "Measure core brand health indicators and performance.",
            generic_examples("Key Brand Metrics"),
        ),
        section(
            "Brand Purpose & Values Alignment",
            "Assess if the brand's mission and values resonate with consumers.",
            generic_examples("Brand Values Alignment"),
        ),
        section(
            "Winning in the space",
            "Identify strategies and attributes of successful brands in the category.",
            generic_examples("Winning in the Space"),
        ),
        section(
            "Competitor Comparison",
            "Understand how the brand stacks up against its main competitors.",
            generic_examples("Competitor Comparison"),
        ),
        section(
            "Perception of brand",
            "Uncover spontaneous associations and detailed perceptions of the brand.",
            generic_examples("Brand Perception Details"),
        ),
    ]
}

fn usage_and_behavior_sections() -> Vec<FrameworkSection> {
    vec![
        section(
            "Drivers of choice: Category",
            "Uncover motivations for engaging with the overall category.",
            generic_examples("Category Drivers"),
        ),
        section(
            "Drivers of choice: Product",
            "Identify specific product attributes that influence selection.",
            generic_examples("Product Drivers"),
        ),
        section(
            "Drivers of choice: Brand",
            "Explore brand-related factors that drive consumer preference.",
            generic_examples("Brand Drivers"),
        ),
        section(
            "Drivers of choice: Channel",
            "Understand why consumers choose certain channels for purchase or interaction.",
            generic_examples("Channel Drivers"),
        ),
        section(
            "Key benefits & features",
            "Determine the most desired benefits and features users look for.",
            generic_examples("Key Benefits"),
        ),
        section(
            "Consumer definition",
            "Explore how consumers articulate and understand a specific theme or concept.",
            generic_examples("Theme Definition"),
        ),
        section(
            "Importance of theme",
            "Assess the personal relevance and impact of a theme or concept.",
            generic_examples("Theme Importance"),
        ),
        section(
            "Buying Patterns",
            "Understand purchase frequency, planning, and typical buying habits.",
            generic_examples("Buying Patterns"),
        ),
        section(
            "Product Repertoire",
            "Explore the range of products consumers use or consider within the category.",
            generic_examples("Product Repertoire"),
        ),
        section(
            "Brand Repertoire",
            "Investigate brand awareness, consideration, and loyalty within the category.",
            generic_examples("Brand Repertoire"),
        ),
        section(
            "Consumption / Usage occasions",
            "Explore specific situations or needs that trigger product/service usage.",
            generic_examples("Usage Occasions"),
        ),
        section(
            "Product Frustrations & Improvements",
            "Identify pain points and gather suggestions for product/service enhancement.",
            generic_examples("Product Frustrations"),
        ),
        section(
            "Channel Repertoire & Preferences",
            "Map out the shopping channels consumers use and prefer for the category.",
            generic_examples("Channel Repertoire"),
        ),
        section(
            "Usage context: Mood",
            "Explore the emotional state or mood of users during interaction.",
            generic_examples("Usage Mood"),
        ),
        section(
            "Usage context: What (Activity)",
            "Identify specific activities or tasks performed with the product/service.",
            generic_examples("Usage Activity"),
        ),
        section(
            "Usage context: When (Time)",
            "Determine the timing, day, and frequency of usage.",
            generic_examples("Usage Time"),
        ),
        section(
            "Usage context: Who With",
            "Understand the social context: whether usage is solitary or with others.",
            generic_examples("Usage Company"),
        ),
        section(
            "Usage context: Where (Location)",
            "Pinpoint common physical or virtual locations for usage.",
            generic_examples("Usage Location"),
        ),
        section(
            "Consideration Set & Alternatives",
            "Identify what alternatives consumers consider or use instead.",
            generic_examples("Consideration Set"),
        ),
        section(
            "Purchase Context: What Purchased",
            "Detail the specific items bought during a shopping trip.",
            generic_examples("Items Purchased"),
        ),
        section(
            "Purchase Context: Type of Shopping Trip",
            "Understand the nature of the shopping trip (e.g., routine, specific mission, impulse).",
            generic_examples("Shopping Trip Type"),
        ),
        section(
            "Purchase context: What",
            "Understand the specific items purchased during a shopping trip.",
            generic_examples("Purchase Context What"),
        ),
        section(
            "Purchase context: When",
            "Determine the timing and day of the week for purchases.",
            generic_examples("Purchase Context When"),
        ),
        section(
            "Purchase context: Who with",
            "Understand if purchases are made alone or with others.",
            generic_examples("Purchase Context Who With"),
        ),
        section(
            "Purchase context: Where",
            "Identify the physical location of purchase if applicable.",
            generic_examples("Purchase Context Where"),
        ),
        section(
            "Purchase context: Channel",
            "Explore the specific channels used for purchasing (online/offline, store/site).",
            generic_examples("Purchase Context Channel"),
        ),
    ]
}

fn concept_testing_sections() -> Vec<FrameworkSection> {
    vec![
        section(
            "Concept Introduction & Stimulus Exposure",
            "Present the concept or stimulus clearly to respondents.",
            generic_examples("Concept Introduction"),
        ),
        section(
            "Overall Concept Evaluation",
            "Gather initial overall reactions and appeal of the concept.",
            generic_examples("Concept Evaluation"),
        ),
        section(
            "Clarity & Understanding of Concept",
            "Assess how well respondents comprehend the presented concept.",
            generic_examples("Concept Clarity"),
        ),
        section(
            "Likes & Dislikes of Concept",
            "Identify specific aspects of the concept that resonate positively or negatively.",
            generic_examples("Concept Likes/Dislikes"),
        ),
        section(
            "Uniqueness & Differentiation of Concept",
            "Evaluate how distinct and novel the concept is perceived to be.",
            generic_examples("Concept Uniqueness"),
        ),
        section(
            "Believability & Relevance of Concept",
            "Gauge the credibility of the concept and its personal relevance to respondents.",
            generic_examples("Concept Believability"),
        ),
        section(
            "Purchase Intent for Concept",
            "Measure the likelihood of respondents purchasing or using the concept if available.",
            generic_examples("Concept Purchase Intent"),
        ),
    ]
}

fn additional_generic_sections() -> Vec<FrameworkSection> {
    vec![
        section(
            "Attitudes & Opinions",
            "Explore general attitudes towards a topic or category.",
            generic_examples("General Attitudes"),
        ),
        section(
            "Lifestyle & Habits",
            "Understand respondent lifestyles relevant to the survey context.",
            generic_examples("Lifestyle Habits"),
        ),
        section(
            "Future Expectations",
            "Gather thoughts on future trends or desires related to the topic.",
            generic_examples("Future Expectations"),
        ),
        section(
            "Media Consumption",
            "Understand media habits relevant for communication strategies.",
            generic_examples("Media Consumption"),
        ),
        section(
            "Technology Usage",
            "Assess familiarity and usage of relevant technologies.",
            generic_examples("Technology Usage"),
        ),
    ]
}

/// Every available section, deduplicated by title and sorted alphabetically.
pub fn all_sections() -> Vec<FrameworkSection> {
    let mut sections: Vec<FrameworkSection> = Vec::new();
    for group in [
        common_sections(),
        engagement_sections(),
        brand_and_market_sections(),
        usage_and_behavior_sections(),
        concept_testing_sections(),
        additional_generic_sections(),
    ] {
        for s in group {
            if !sections.iter().any(|existing| existing.title == s.title) {
                sections.push(s);
            }
        }
    }
    sections.sort_by(|a, b| a.title.cmp(&b.title));
    sections
}

/// The catalog for one section kind, sorted alphabetically for display.
pub fn catalog(kind: SectionKind) -> Vec<FrameworkSection> {
    match kind {
        SectionKind::Screener => {
            let mut screeners: Vec<FrameworkSection> = common_sections()
                .into_iter()
                .filter(|s| is_screener_title(&s.title))
                .collect();
            screeners.sort_by(|a, b| a.title.cmp(&b.title));
            screeners
        }
        SectionKind::Content => all_sections()
            .into_iter()
            .filter(|s| !is_screener_title(&s.title))
            .collect(),
    }
}

/// Look up a section by exact title. Missing titles are omissions, not errors.
pub fn find<'a>(catalog: &'a [FrameworkSection], title: &str) -> Option<&'a FrameworkSection> {
    catalog.iter().find(|s| s.title == title)
}
