//! Per-template customization cache.
//!
//! Keyed by template id, scoped to the authoring session, no eviction
//! (bounded by the small static template count). `None` for a customized
//! section list means "use the template's own defaults", which is distinct
//! from "customized down to an empty list".

use std::collections::HashMap;

use tracing::debug;

use crate::sections::FrameworkSection;
use crate::survey::SurveySection;

/// Snapshot of everything a user changed while a template was active.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomizationRecord {
    /// Generated (and possibly edited) survey content.
    pub generated_sections: Vec<SurveySection>,
    /// Customized content sections, `None` when the template defaults apply.
    pub content_sections: Option<Vec<FrameworkSection>>,
    /// Customized screener sections, `None` when the template defaults apply.
    pub screener_sections: Option<Vec<FrameworkSection>>,
}

/// Keyed store of per-template customization records.
#[derive(Debug, Default)]
pub struct CustomizationCache {
    records: HashMap<String, CustomizationRecord>,
}

impl CustomizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the record for a template. A missing id (no template active)
    /// is a no-op: anonymous state is never cached.
    pub fn persist(&mut self, template_id: Option<&str>, record: CustomizationRecord) {
        let Some(id) = template_id else {
            return;
        };
        debug!(template_id = id, "customization_persisted");
        self.records.insert(id.to_string(), record);
    }

    /// Fetch the last-saved record for a template. A miss means the template
    /// was never customized; callers fall back to empty state, not an error.
    pub fn restore(&self, template_id: &str) -> Option<&CustomizationRecord> {
        self.records.get(template_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::survey::SurveySection;

    fn record_with_title(title: &str) -> CustomizationRecord {
        CustomizationRecord {
            generated_sections: vec![SurveySection::new(title)],
            content_sections: None,
            screener_sections: None,
        }
    }

    #[test]
    fn test_persist_and_restore() {
        let mut cache = CustomizationCache::new();
        cache.persist(Some("brand"), record_with_title("Brand Perception"));

        let restored = cache.restore("brand").unwrap();
        assert_eq!(restored.generated_sections[0].section_title, "Brand Perception");
    }

    #[test]
    fn test_persist_without_id_is_noop() {
        let mut cache = CustomizationCache::new();
        cache.persist(None, record_with_title("anything"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_persist_upserts() {
        let mut cache = CustomizationCache::new();
        cache.persist(Some("brand"), record_with_title("First"));
        cache.persist(Some("brand"), record_with_title("Second"));

        assert_eq!(cache.len(), 1);
        let restored = cache.restore("brand").unwrap();
        assert_eq!(restored.generated_sections[0].section_title, "Second");
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = CustomizationCache::new();
        assert!(cache.restore("themes").is_none());
    }

    #[test]
    fn test_none_is_distinct_from_empty_customization() {
        let mut cache = CustomizationCache::new();
        cache.persist(
            Some("brand"),
            CustomizationRecord {
                generated_sections: Vec::new(),
                content_sections: Some(Vec::new()),
                screener_sections: None,
            },
        );

        let restored = cache.restore("brand").unwrap();
        assert_eq!(restored.content_sections, Some(Vec::new()));
        assert_eq!(restored.screener_sections, None);
    }
}
