//! Structured resume content consumed by the document renderers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::lenient::{lenient_strings, lenient_text};
use crate::models::provenance::Provenance;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dates: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A rewritten resume, ready for DOCX/PDF rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    #[serde(default)]
    pub contact: Contact,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    /// Category label → skills, e.g. "Technical" → ["Rust", "SQL"].
    #[serde(default)]
    pub skills: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_model_payload_with_optional_fields_absent() {
        let payload = json!({
            "contact": {"name": "Ada Lovelace", "email": "ada@example.com"},
            "summary": "Analyst",
            "experience": [{"title": "Engineer", "company": "Analytical Engines", "achievements": "Wrote the first program"}],
            "skills": {"Technical": ["Mathematics"]},
            "education": [{"degree": "Private tutoring", "institution": "Home", "year": 1833}]
        });
        let doc: ResumeDocument = serde_json::from_value(payload).unwrap();
        assert_eq!(doc.contact.name, "Ada Lovelace");
        assert_eq!(doc.contact.phone, "");
        assert!(doc.contact.linkedin.is_none());
        assert_eq!(doc.experience[0].achievements, vec!["Wrote the first program"]);
        assert_eq!(doc.education[0].year, "1833");
        assert!(doc.certifications.is_empty());
        assert_eq!(doc.provenance, Provenance::Llm);
    }

    #[test]
    fn test_optional_fields_are_not_serialized_when_absent() {
        let json = serde_json::to_value(Contact::default()).unwrap();
        assert!(json.get("linkedin").is_none());
    }
}
