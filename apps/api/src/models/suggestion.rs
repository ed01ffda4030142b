use serde::{Deserialize, Serialize};

use crate::models::lenient::lenient_text;
use crate::models::provenance::Provenance;

/// Most suggestions a set may carry; longer model output is truncated.
pub const MIN_SUGGESTIONS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 5;

/// A single before/after improvement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default, deserialize_with = "lenient_text")]
    pub area: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub what_to_change: String,
    /// Verbatim resume text, or a placeholder when the element is absent.
    #[serde(default, deserialize_with = "lenient_text")]
    pub before: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub after: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rationale: String,
}

/// Ordered suggestions plus where they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionSet {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl SuggestionSet {
    pub fn new(mut suggestions: Vec<Suggestion>, provenance: Provenance) -> Self {
        suggestions.truncate(MAX_SUGGESTIONS);
        Self {
            suggestions,
            provenance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_payload_deserializes_with_missing_fields() {
        let payload = json!({
            "suggestions": [
                {"area": "Quantify", "what_to_change": "Add numbers", "before": "Did work", "after": "Did 5x work"},
                {"area": "Keywords"}
            ],
            "_is_demo": false
        });
        let set: SuggestionSet = serde_json::from_value(payload).unwrap();
        assert_eq!(set.suggestions.len(), 2);
        assert_eq!(set.suggestions[0].after, "Did 5x work");
        assert_eq!(set.suggestions[0].rationale, "");
        assert_eq!(set.suggestions[1].before, "");
        assert_eq!(set.provenance, Provenance::Llm);
    }

    #[test]
    fn test_new_truncates_to_five() {
        let suggestions = (0..8)
            .map(|i| Suggestion {
                area: format!("area {i}"),
                ..Suggestion::default()
            })
            .collect();
        let set = SuggestionSet::new(suggestions, Provenance::Llm);
        assert_eq!(set.suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(set.suggestions[4].area, "area 4");
    }
}
