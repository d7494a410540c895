//! Merge Engine: turns a title selection into the final ordered section list.
//!
//! Ordering invariant: sections that belong to the template's original
//! framework keep their original relative order, even across deselect and
//! reselect cycles; sections added from outside the template are appended
//! after all original ones, in the order they were selected. A selected
//! title that no longer resolves against the catalog is dropped silently.

use std::collections::{HashMap, HashSet};

use crate::sections::{FrameworkSection, SectionKind, is_screener_title};

/// The user's current inclusion choices for the active template.
///
/// Titles are kept in insertion order and duplicate-free, so newly added
/// out-of-template sections append stably.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    screener_titles: Vec<String>,
    content_titles: Vec<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a selection from the section lists currently in effect.
    pub fn from_sections(screeners: &[FrameworkSection], content: &[FrameworkSection]) -> Self {
        let mut state = Self::new();
        for s in screeners {
            state.insert(SectionKind::Screener, &s.title);
        }
        for s in content {
            state.insert(SectionKind::Content, &s.title);
        }
        state
    }

    fn titles_mut(&mut self, kind: SectionKind) -> &mut Vec<String> {
        match kind {
            SectionKind::Screener => &mut self.screener_titles,
            SectionKind::Content => &mut self.content_titles,
        }
    }

    pub fn titles(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Screener => &self.screener_titles,
            SectionKind::Content => &self.content_titles,
        }
    }

    pub fn contains(&self, kind: SectionKind, title: &str) -> bool {
        self.titles(kind).iter().any(|t| t == title)
    }

    /// Add a title if absent. Returns true if it was inserted.
    pub fn insert(&mut self, kind: SectionKind, title: &str) -> bool {
        if self.contains(kind, title) {
            return false;
        }
        self.titles_mut(kind).push(title.to_string());
        true
    }

    /// Remove a title if present. Returns true if it was removed.
    pub fn remove(&mut self, kind: SectionKind, title: &str) -> bool {
        let titles = self.titles_mut(kind);
        let before = titles.len();
        titles.retain(|t| t != title);
        titles.len() != before
    }

    /// Flip a title's membership. Returns true if the title is now selected.
    pub fn toggle(&mut self, kind: SectionKind, title: &str) -> bool {
        if self.remove(kind, title) {
            false
        } else {
            self.insert(kind, title);
            true
        }
    }

    /// Convenience for callers that route by title prefix.
    pub fn kind_for_title(title: &str) -> SectionKind {
        if is_screener_title(title) {
            SectionKind::Screener
        } else {
            SectionKind::Content
        }
    }
}

/// Build the final ordered section list for one kind.
///
/// Pass 1 walks the template's original section order and keeps every
/// selected title, resolving it against the catalog. Pass 2 walks the
/// selection in insertion order and appends whatever was not placed by
/// pass 1. Titles missing from the catalog are dropped in both passes.
pub fn build_final_sections(
    selected_titles: &[String],
    original_template_order: &[&str],
    catalog: &[FrameworkSection],
) -> Vec<FrameworkSection> {
    let by_title: HashMap<&str, &FrameworkSection> =
        catalog.iter().map(|s| (s.title.as_str(), s)).collect();
    let selected: HashSet<&str> = selected_titles.iter().map(String::as_str).collect();

    let mut placed: HashSet<&str> = HashSet::new();
    let mut final_sections: Vec<FrameworkSection> = Vec::new();

    for &title in original_template_order {
        if selected.contains(title)
            && let Some(section) = by_title.get(title)
        {
            final_sections.push((*section).clone());
            placed.insert(title);
        }
    }

    for title in selected_titles {
        if !placed.contains(title.as_str())
            && let Some(section) = by_title.get(title.as_str())
        {
            final_sections.push((*section).clone());
        }
    }

    final_sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_catalog(titles: &[&str]) -> Vec<FrameworkSection> {
        titles
            .iter()
            .map(|t| FrameworkSection {
                title: t.to_string(),
                description: format!("About {t}"),
                example_questions: Vec::new(),
            })
            .collect()
    }

    fn titles_of(sections: &[FrameworkSection]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    fn owned(titles: &[&str]) -> Vec<String> {
        titles.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_original_order_preserved() {
        let catalog = make_catalog(&["A", "B", "C", "D"]);
        let result = build_final_sections(&owned(&["C", "A", "B"]), &["A", "B", "C"], &catalog);
        assert_eq!(titles_of(&result), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_deselect_then_reselect_returns_to_original_position() {
        let catalog = make_catalog(&["A", "B", "C"]);
        let original = ["A", "B", "C"];

        // Deselect B.
        let result = build_final_sections(&owned(&["A", "C"]), &original, &catalog);
        assert_eq!(titles_of(&result), vec!["A", "C"]);

        // Reselect B: it returns to its original slot, not the end.
        let result = build_final_sections(&owned(&["A", "C", "B"]), &original, &catalog);
        assert_eq!(titles_of(&result), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_new_sections_appended_after_originals() {
        let catalog = make_catalog(&["A", "B", "C", "D", "E"]);
        let result =
            build_final_sections(&owned(&["A", "B", "C", "D"]), &["A", "B", "C"], &catalog);
        assert_eq!(titles_of(&result), vec!["A", "B", "C", "D"]);

        // Multiple additions keep their selection order.
        let result =
            build_final_sections(&owned(&["A", "E", "D"]), &["A", "B", "C"], &catalog);
        assert_eq!(titles_of(&result), vec!["A", "E", "D"]);
    }

    #[test]
    fn test_readded_section_stays_at_end() {
        let catalog = make_catalog(&["A", "B", "C", "D"]);
        let original = ["A", "B", "C"];

        let mut selection = SelectionState::new();
        for t in ["A", "B", "C", "D"] {
            selection.insert(SectionKind::Content, t);
        }
        selection.remove(SectionKind::Content, "D");
        selection.insert(SectionKind::Content, "D");

        let result =
            build_final_sections(selection.titles(SectionKind::Content), &original, &catalog);
        assert_eq!(titles_of(&result), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_stale_titles_dropped_silently() {
        let catalog = make_catalog(&["A", "B"]);
        let result = build_final_sections(
            &owned(&["A", "Removed From Catalog", "B"]),
            &["A", "B"],
            &catalog,
        );
        assert_eq!(titles_of(&result), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_selection_yields_empty_list() {
        let catalog = make_catalog(&["A", "B"]);
        let result = build_final_sections(&[], &["A", "B"], &catalog);
        assert!(result.is_empty());
    }

    // SelectionState tests

    #[test]
    fn test_selection_insert_is_duplicate_free() {
        let mut state = SelectionState::new();
        assert!(state.insert(SectionKind::Content, "A"));
        assert!(!state.insert(SectionKind::Content, "A"));
        assert_eq!(state.titles(SectionKind::Content), ["A".to_string()]);
    }

    #[test]
    fn test_selection_toggle() {
        let mut state = SelectionState::new();
        assert!(state.toggle(SectionKind::Screener, "Screener: Brand usage"));
        assert!(state.contains(SectionKind::Screener, "Screener: Brand usage"));
        assert!(!state.toggle(SectionKind::Screener, "Screener: Brand usage"));
        assert!(!state.contains(SectionKind::Screener, "Screener: Brand usage"));
    }

    #[test]
    fn test_selection_from_sections_preserves_order() {
        let screeners = make_catalog(&["Screener: One", "Screener: Two"]);
        let content = make_catalog(&["B", "A"]);
        let state = SelectionState::from_sections(&screeners, &content);
        assert_eq!(
            state.titles(SectionKind::Content),
            [String::from("B"), String::from("A")]
        );
    }

    #[test]
    fn test_kind_for_title() {
        assert_eq!(
            SelectionState::kind_for_title("Screener: Activity"),
            SectionKind::Screener
        );
        assert_eq!(
            SelectionState::kind_for_title("Buying Patterns"),
            SectionKind::Content
        );
    }
}
