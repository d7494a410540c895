//! Prompt Compiler: turns a template, its follow-up answers, and the
//! resolved section list into the final generation request text.
//!
//! Substitution order matters: bespoke branch (or generic answer)
//! substitution first, then the project-context slot, then the
//! section-titles slot, and last a sweep that neutralizes every remaining
//! `{identifier}` token so no literal placeholder ever reaches the
//! generation service.

use regex::Regex;

use crate::templates::{AnswerMap, Template, answer};

/// Slot in a seed text that receives the serialized section-title list.
pub const SECTION_TITLES_SLOT: &str = "{sectionTitles}";

/// Slot in a seed text that receives the optional project-context block.
pub const PROJECT_CONTEXT_SLOT: &str = "{projectContext}";

/// Stand-in for optional placeholders the user skipped.
const NEUTRAL_FALLBACK: &str = "relevant details";

/// Compile the generation request text.
///
/// The injected section-title list is the merge engine's output verbatim:
/// the downstream generation contract requires exact-match section titles in
/// the response, so titles are serialized as a quoted JSON array.
pub fn compile(template: &Template, answers: &AnswerMap, resolved_titles: &[String]) -> String {
    let mut prompt = template.seed_text.to_string();

    prompt = match template.id {
        "themes" => substitute_themes(prompt, answers),
        "usageExperience" => substitute_usage_experience(prompt, answers),
        _ => substitute_generic(prompt, answers),
    };

    prompt = resolve_project_context(prompt, answer(answers, "projectBigQuestion"));
    prompt = inject_section_titles(prompt, resolved_titles);
    sweep_placeholders(&prompt)
}

/// Replace every `{key}` occurrence with a value.
fn replace_key(prompt: &str, key: &str, value: &str) -> String {
    prompt.replace(&format!("{{{key}}}"), value)
}

/// Generic substitution: every answered key replaces its `{key}` token,
/// blank answers fall back to a `details about {key}` hint so known keys
/// never leave a dangling token. The project big question is handled by its
/// own slot, never inline.
fn substitute_generic(mut prompt: String, answers: &AnswerMap) -> String {
    for (key, value) in answers {
        if key == "projectBigQuestion" {
            continue;
        }
        let replacement = if value.is_empty() {
            format!("details about {key}")
        } else {
            value.clone()
        };
        prompt = replace_key(&prompt, key, &replacement);
    }
    prompt
}

/// Bespoke branch for the themes template: the exploration focus selects
/// exactly one of three mutually exclusive description/context pairs; the
/// other branches' answers are never referenced.
fn substitute_themes(prompt: String, answers: &AnswerMap) -> String {
    let focus = answer(answers, "explorationFocus");

    let non_blank = |id: &str, fallback: &str| -> String {
        let value = answer(answers, id);
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    let (theme_description, context_description) = match focus {
        "definitions" => (
            non_blank("themeDescriptionForDefinitions", "the specified theme/trend"),
            "the general category related to this theme/trend".to_string(),
        ),
        "relevance" => (
            non_blank("themeDescriptionForRelevance", "the specified theme/trend"),
            format!(
                "the product/service: \"{}\"",
                non_blank("productDescriptionForRelevance", "the specified product/service")
            ),
        ),
        "alignment" => (
            non_blank("themeDescriptionForAlignment", "the specified theme/trend"),
            format!(
                "the brand: \"{}\"",
                non_blank("brandDescriptionForAlignment", "the specified brand")
            ),
        ),
        _ => (
            "the specified theme".to_string(),
            "the relevant category or context".to_string(),
        ),
    };

    let focus = if focus.is_empty() { "not specified" } else { focus };
    let prompt = replace_key(&prompt, "explorationFocus", focus);
    let prompt = replace_key(&prompt, "themeDescription", &theme_description);
    replace_key(&prompt, "contextDescription", &context_description)
}

/// Bespoke branch for the usage & experience template: the understanding
/// depth selects the analysis-goal sentence, quoting the deep-dive occasion
/// when one applies.
fn substitute_usage_experience(prompt: String, answers: &AnswerMap) -> String {
    let focus_type = answer(answers, "usageFocusType");
    let focus_type = if focus_type.is_empty() {
        "unspecified type"
    } else {
        focus_type
    };
    let description = answer(answers, "usageFocusDescription");
    let description = if description.is_empty() {
        "not specified"
    } else {
        description
    };

    let analysis_goal = match answer(answers, "usageUnderstandingDepth") {
        "broad" => "understand broad usage behaviours across all occasions / moments".to_string(),
        "deepDive" => {
            let occasion = answer(answers, "usageDeepDiveOccasion");
            let occasion = if occasion.is_empty() {
                "a specific occasion"
            } else {
                occasion
            };
            format!("deep dive into the specific usage occasion of: \"{occasion}\"")
        }
        _ => "understand usage (depth not specified)".to_string(),
    };

    let prompt = replace_key(&prompt, "usageFocusType", focus_type);
    let prompt = replace_key(&prompt, "usageFocusDescription", description);
    replace_key(&prompt, "usageAnalysisGoal", &analysis_goal)
}

/// Resolve the `{projectContext}` slot: a non-blank big-question answer
/// becomes the fixed context block, otherwise the slot line disappears.
fn resolve_project_context(prompt: String, big_question: &str) -> String {
    if big_question.trim().is_empty() {
        // Drop the slot with its line break so no blank line is left behind.
        let without_line = prompt.replacen(&format!("{PROJECT_CONTEXT_SLOT}\n"), "", 1);
        return without_line.replacen(PROJECT_CONTEXT_SLOT, "", 1);
    }
    let block = format!(
        "Additional Project Context / Big Question:\n{}\n(Use this context to further refine question phrasing, emphasis, and the overall survey flow to better meet the user's underlying research objectives.)",
        big_question.trim()
    );
    prompt.replacen(PROJECT_CONTEXT_SLOT, &block, 1)
}

/// Replace the section-titles slot with the quoted, ordered title array.
fn inject_section_titles(prompt: String, resolved_titles: &[String]) -> String {
    let serialized =
        serde_json::to_string(resolved_titles).unwrap_or_else(|_| "[]".to_string());
    prompt.replacen(SECTION_TITLES_SLOT, &serialized, 1)
}

/// Neutralize any `{identifier}` token that survived substitution (optional
/// follow-ups the user skipped, keys absent from the answer map).
fn sweep_placeholders(prompt: &str) -> String {
    // The pattern is fixed, so a failure here would be a programming error
    // caught by the unit tests; fall back to the untouched prompt.
    match Regex::new(r"\{[a-zA-Z0-9_]+\}") {
        Ok(re) => re.replace_all(prompt, NEUTRAL_FALLBACK).into_owned(),
        Err(_) => prompt.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::find_template;

    fn answers(pairs: &[(&str, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn titles(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_generic_substitution() {
        let template = find_template("motivations").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("motivationFocus", "brand"),
                ("motivationDescription", "Nike running shoes"),
            ]),
            &titles(&["Screener: Category usage", "Buying Patterns"]),
        );

        assert!(compiled.contains("regarding the brand described as: \"Nike running shoes\""));
        assert!(!compiled.contains("{motivationFocus}"));
        assert!(!compiled.contains("{motivationDescription}"));
    }

    #[test]
    fn test_blank_answer_falls_back_to_details_hint() {
        let template = find_template("motivations").unwrap();
        let compiled = compile(
            &template,
            &answers(&[("motivationFocus", "brand"), ("motivationDescription", "")]),
            &titles(&["Buying Patterns"]),
        );

        assert!(compiled.contains("details about motivationDescription"));
        assert!(!compiled.contains("{motivationDescription}"));
    }

    #[test]
    fn test_no_placeholder_survives_compilation() {
        // Compile every template with an empty answer map: the sweep must
        // leave no literal `{key}` token anywhere.
        for template in crate::templates::all_templates() {
            let compiled = compile(&template, &AnswerMap::new(), &titles(&["A", "B"]));
            assert!(
                !Regex::new(r"\{[a-zA-Z0-9_]+\}").unwrap().is_match(&compiled),
                "{} leaked a placeholder:\n{}",
                template.id,
                compiled
            );
        }
    }

    #[test]
    fn test_section_titles_injected_exactly() {
        let template = find_template("brand").unwrap();
        let resolved = titles(&[
            "Screener: Category usage",
            "Screener: Brand awareness",
            "Perception of brand",
        ]);
        let compiled = compile(&template, &AnswerMap::new(), &resolved);

        let expected = serde_json::to_string(&resolved).unwrap();
        assert!(
            compiled.contains(&format!("The section titles MUST BE EXACTLY: {expected}.")),
            "missing exact title list in:\n{compiled}"
        );
    }

    #[test]
    fn test_project_context_block_present_when_answered() {
        let template = find_template("motivations").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("motivationFocus", "product"),
                ("motivationDescription", "a budgeting app"),
                ("projectBigQuestion", "Should we launch product X?"),
            ]),
            &titles(&["Buying Patterns"]),
        );

        assert!(compiled.contains("Additional Project Context / Big Question:"));
        assert!(compiled.contains("Should we launch product X?"));
    }

    #[test]
    fn test_project_context_line_removed_when_blank() {
        let template = find_template("motivations").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("motivationFocus", "product"),
                ("motivationDescription", "a budgeting app"),
            ]),
            &titles(&["Buying Patterns"]),
        );

        assert!(!compiled.contains("Additional Project Context / Big Question:"));
        assert!(!compiled.contains("projectContext"));
    }

    #[test]
    fn test_themes_definitions_branch() {
        let template = find_template("themes").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("explorationFocus", "definitions"),
                ("themeDescriptionForDefinitions", "minimalist lifestyles"),
                // Answers from other branches must never be referenced.
                ("themeDescriptionForAlignment", "IGNORED"),
            ]),
            &titles(&["Importance of theme"]),
        );

        assert!(compiled.contains("focusing on definitions"));
        assert!(compiled.contains("The theme/trend being explored is: 'minimalist lifestyles'"));
        assert!(
            compiled.contains("the general category related to this theme/trend"),
            "definitions branch context missing:\n{compiled}"
        );
        assert!(!compiled.contains("IGNORED"));
    }

    #[test]
    fn test_themes_alignment_branch_quotes_brand() {
        let template = find_template("themes").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("explorationFocus", "alignment"),
                ("themeDescriptionForAlignment", "sustainability"),
                ("brandDescriptionForAlignment", "EcoHome goods"),
            ]),
            &titles(&["Winning in the space"]),
        );

        assert!(compiled.contains("the brand: \"EcoHome goods\""));
        assert!(compiled.contains("'sustainability'"));
    }

    #[test]
    fn test_usage_experience_deep_dive_goal() {
        let template = find_template("usageExperience").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("usageFocusType", "service"),
                ("usageFocusDescription", "a ride-sharing service"),
                ("usageUnderstandingDepth", "deepDive"),
                ("usageDeepDiveOccasion", "morning commute"),
            ]),
            &titles(&["Usage context: Mood"]),
        );

        assert!(compiled.contains(
            "The goal is to deep dive into the specific usage occasion of: \"morning commute\"."
        ));
        assert!(compiled.contains("the service \"a ride-sharing service\""));
    }

    #[test]
    fn test_usage_experience_broad_goal() {
        let template = find_template("usageExperience").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("usageFocusType", "category"),
                ("usageFocusDescription", "streaming music"),
                ("usageUnderstandingDepth", "broad"),
            ]),
            &titles(&["Usage context: Mood"]),
        );

        assert!(compiled.contains(
            "The goal is to understand broad usage behaviours across all occasions / moments."
        ));
    }

    #[test]
    fn test_test_template_optional_upload_swept() {
        let template = find_template("screening").unwrap();
        let compiled = compile(
            &template,
            &answers(&[
                ("whatToTest", "concepts"),
                ("conceptCount", "5"),
                ("conceptDescription", "Concept 1: A. Concept 2: B."),
                ("keyMetrics", "Appeal, Uniqueness"),
            ]),
            &titles(&[]),
        );

        // stimuliUpload was skipped: its token is neutralized, not leaked.
        assert!(!compiled.contains("{stimuliUpload}"));
        assert!(compiled.contains("relevant details"));
        assert!(compiled.contains("We are testing concepts."));
    }
}
