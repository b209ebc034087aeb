use serde::{Deserialize, Serialize};

pub mod backend;
pub mod config_file;

pub use backend::{BackendError, TextBackend};

/// A candidate sub-project (Teilprojekt) found in an application document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubProjectCandidate {
    /// Derived label, always `"TP"` followed by the sub-project number.
    pub label: String,
    /// Sanitized display name, at most 200 characters.
    pub name: String,
    /// Budget in CHF; 0 when no amount could be resolved.
    pub budget: f64,
    /// `true` when found by a structural marker, `false` for the numbered-list fallback.
    pub auto_detected: bool,
}

/// Document-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant: Option<String>,
}

impl DocumentMetadata {
    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.applicant.is_none()
    }
}

/// Result of running the extraction pipeline on one document.
///
/// Either fully successful (`success == true`, `error == None`) or a failure
/// envelope with empty text, no sub-projects and empty metadata. There is no
/// partially populated state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,
    /// Excerpt of the extracted raw text.
    pub text: String,
    /// ISO 639-3 code, or empty when nothing could be detected.
    pub language: String,
    pub sub_projects: Vec<SubProjectCandidate>,
    pub metadata: DocumentMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    /// Build the failure envelope for an extraction that did not complete.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: String::new(),
            language: String::new(),
            sub_projects: Vec::new(),
            metadata: DocumentMetadata::default(),
            error: Some(message.into()),
        }
    }

    /// Sum of all candidate budgets.
    pub fn total_budget(&self) -> f64 {
        self.sub_projects.iter().map(|sp| sp.budget).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(label: &str, budget: f64) -> SubProjectCandidate {
        SubProjectCandidate {
            label: label.to_string(),
            name: "Leitmedien".to_string(),
            budget,
            auto_detected: true,
        }
    }

    #[test]
    fn failure_envelope_is_empty() {
        let result = ExtractionResult::failure("unsupported format");
        assert!(!result.success);
        assert!(result.text.is_empty());
        assert!(result.sub_projects.is_empty());
        assert!(result.metadata.is_empty());
        assert_eq!(result.error.as_deref(), Some("unsupported format"));
    }

    #[test]
    fn serializes_camel_case_fields() {
        let result = ExtractionResult {
            success: true,
            text: "Gesuch".to_string(),
            language: "deu".to_string(),
            sub_projects: vec![candidate("TP1", 500.0)],
            metadata: DocumentMetadata {
                year: Some(2024),
                applicant: None,
            },
            error: None,
        };
        let value = serde_json::to_value(&result).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<_> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["language", "metadata", "subProjects", "success", "text"]
        );
        assert_eq!(value["subProjects"][0]["autoDetected"], true);
        assert_eq!(value["metadata"]["year"], 2024);
        assert!(value["metadata"].get("applicant").is_none());
    }

    #[test]
    fn failure_serializes_empty_collections() {
        let value = serde_json::to_value(ExtractionResult::failure("boom")).unwrap();
        assert_eq!(value["subProjects"], serde_json::json!([]));
        assert_eq!(value["metadata"], serde_json::json!({}));
        assert_eq!(value["error"], "boom");
    }

    #[test]
    fn total_budget_sums_candidates() {
        let result = ExtractionResult {
            success: true,
            text: String::new(),
            language: String::new(),
            sub_projects: vec![candidate("TP1", 1200.5), candidate("TP2", 800.0)],
            metadata: DocumentMetadata::default(),
            error: None,
        };
        assert!((result.total_budget() - 2000.5).abs() < f64::EPSILON);
    }
}
