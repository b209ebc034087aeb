use std::path::Path;
use std::sync::Arc;

use gesuch_core::ExtractionResult;
use gesuch_core::config_file::ConfigFile;
use gesuch_parsing::{PatternCatalog, PatternCatalogBuilder, StructureExtractor};

use crate::IngestError;
use crate::format::FormatRegistry;

/// End-to-end extraction: format dispatch, language detection, structure
/// parsing, result assembly.
///
/// [`extract`](Self::extract) never fails; any error becomes the failure
/// envelope of [`ExtractionResult`]. The pipeline holds no per-call state and
/// can be shared across threads.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    registry: FormatRegistry,
    extractor: StructureExtractor,
}

impl Default for DocumentPipeline {
    fn default() -> Self {
        Self::new(Arc::new(PatternCatalog::default()))
    }
}

impl DocumentPipeline {
    /// Pipeline with the default format backends and the given catalog.
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self::with_registry(catalog, FormatRegistry::with_defaults())
    }

    pub fn with_registry(catalog: Arc<PatternCatalog>, registry: FormatRegistry) -> Self {
        Self {
            registry,
            extractor: StructureExtractor::with_catalog(catalog),
        }
    }

    /// Build the catalog from an on-disk config.
    pub fn from_config(config: &ConfigFile) -> Result<Self, IngestError> {
        let catalog = PatternCatalogBuilder::from_config_file(config).build()?;
        Ok(Self::new(Arc::new(catalog)))
    }

    /// Extract and parse a document, propagating the first error.
    pub fn try_extract(&self, path: &Path, mime_type: &str) -> Result<ExtractionResult, IngestError> {
        let text = self.registry.extract_text(path, mime_type)?;
        Ok(self.extractor.analyze(&text))
    }

    /// Extract and parse a document. Errors become a failure envelope.
    pub fn extract(&self, path: &Path, mime_type: &str) -> ExtractionResult {
        match self.try_extract(path, mime_type) {
            Ok(result) => {
                tracing::info!(
                    path = %path.display(),
                    language = %result.language,
                    sub_projects = result.sub_projects.len(),
                    "extraction complete"
                );
                result
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), mime_type, error = %err, "extraction failed");
                ExtractionResult::failure(err.to_string())
            }
        }
    }

    /// Parse text that was already extracted elsewhere.
    pub fn analyze_text(&self, text: &str) -> ExtractionResult {
        self.extractor.analyze(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesuch_core::config_file::{PatternsConfig, WindowsConfig};

    #[test]
    fn unsupported_format_becomes_envelope() {
        let result = DocumentPipeline::default().extract(Path::new("foto.jpg"), "image/jpeg");
        assert!(!result.success);
        assert!(result.text.is_empty());
        assert!(result.sub_projects.is_empty());
        assert!(result.metadata.is_empty());
        assert!(result.error.unwrap().contains("image/jpeg"));
    }

    #[test]
    fn try_extract_propagates_errors() {
        let err = DocumentPipeline::default()
            .try_extract(Path::new("foto.jpg"), "image/jpeg")
            .unwrap_err();
        assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    }

    #[test]
    fn from_config_applies_windows() {
        let config = ConfigFile {
            windows: Some(WindowsConfig {
                budget_window_chars: Some(10),
                ..Default::default()
            }),
            ..Default::default()
        };
        let pipeline = DocumentPipeline::from_config(&config).unwrap();
        let result = pipeline.analyze_text("TP 1: Leitmedien und Regionales\nCHF 500");
        assert_eq!(result.sub_projects[0].budget, 0.0);
    }

    #[test]
    fn from_config_rejects_bad_pattern() {
        let config = ConfigFile {
            patterns: Some(PatternsConfig {
                extra_budget: Some(vec!["EUR (".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(matches!(
            DocumentPipeline::from_config(&config),
            Err(IngestError::Config(_))
        ));
    }
}
