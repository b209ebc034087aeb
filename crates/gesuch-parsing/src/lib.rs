use thiserror::Error;

pub mod budget;
pub mod config;
pub mod dedup;
pub mod extractor;
pub mod fallback;
pub mod language;
pub mod sanitize;
pub mod structure;
pub mod text_processing;

pub use config::{ListOverride, PatternCatalog, PatternCatalogBuilder};
pub use extractor::StructureExtractor;
pub use structure::ParsedStructure;
// Re-export domain types from core (canonical definitions live there)
pub use gesuch_core::{DocumentMetadata, ExtractionResult, SubProjectCandidate};

#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("invalid {field} pattern `{pattern}`: {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("{field} pattern `{pattern}` has no named group `{group}`")]
    MissingGroup {
        field: &'static str,
        pattern: String,
        group: &'static str,
    },
}

/// Parse already-extracted document text with the built-in pattern catalog.
///
/// Pipeline:
/// 1. Detect the language on a text prefix
/// 2. Read year and applicant metadata
/// 3. Match sub-project markers in catalog order, resolving a budget for each
/// 4. Drop duplicates by label and by name
/// 5. Fall back to numbered lists when no marker matched
/// 6. Sanitize every candidate name
pub fn analyze_text(text: &str) -> ExtractionResult {
    StructureExtractor::new().analyze(text)
}
