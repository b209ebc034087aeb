use std::sync::Arc;

use crate::config::PatternCatalog;
use crate::structure::{self, ParsedStructure};
use crate::text_processing::truncate_chars;
use crate::{budget, fallback, language};
use crate::{DocumentMetadata, ExtractionResult, SubProjectCandidate};

/// A configurable funding-application parser.
///
/// Holds a shared [`PatternCatalog`] and exposes each pipeline step as a
/// method. Cloning is cheap; clones share the same catalog, which is never
/// mutated, so one extractor can serve concurrent documents.
#[derive(Debug, Clone)]
pub struct StructureExtractor {
    catalog: Arc<PatternCatalog>,
}

impl Default for StructureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureExtractor {
    /// Create an extractor with the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(PatternCatalog::default()))
    }

    /// Create an extractor sharing a custom catalog.
    pub fn with_catalog(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Get a reference to the current catalog.
    pub fn catalog(&self) -> &Arc<PatternCatalog> {
        &self.catalog
    }

    /// Detect the document language on the configured text prefix.
    pub fn detect_language(&self, text: &str) -> String {
        language::detect_language_prefix(text, self.catalog.language_sample_chars)
    }

    /// Read year and applicant.
    pub fn parse_metadata(&self, text: &str) -> DocumentMetadata {
        structure::parse_metadata_with_catalog(text, &self.catalog)
    }

    /// Primary marker scan only; names are trimmed, not sanitized.
    pub fn find_sub_projects(&self, text: &str) -> Vec<SubProjectCandidate> {
        structure::find_sub_projects_with_catalog(text, &self.catalog)
    }

    /// Resolve the budget of a context window.
    pub fn resolve_budget(&self, window: &str) -> f64 {
        budget::resolve_budget_with_catalog(window, &self.catalog)
    }

    /// Numbered-list fallback; names are trimmed, not sanitized.
    pub fn fallback(&self, text: &str) -> Vec<SubProjectCandidate> {
        fallback::fallback_candidates_with_catalog(text, &self.catalog)
    }

    /// Metadata plus deduplicated, sanitized candidates.
    pub fn parse(&self, text: &str) -> ParsedStructure {
        structure::parse_structure_with_catalog(text, &self.catalog)
    }

    /// Run every text stage and assemble a successful [`ExtractionResult`].
    pub fn analyze(&self, text: &str) -> ExtractionResult {
        let language = self.detect_language(text);
        let parsed = self.parse(text);

        tracing::debug!(
            language = %language,
            sub_projects = parsed.sub_projects.len(),
            fallback = parsed.used_fallback,
            "document analyzed"
        );

        ExtractionResult {
            success: true,
            text: truncate_chars(text, self.catalog.excerpt_chars).to_string(),
            language,
            sub_projects: parsed.sub_projects,
            metadata: parsed.metadata,
            error: None,
        }
    }
}
