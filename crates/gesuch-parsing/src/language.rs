//! Language detection for extracted document text.
//!
//! Wraps `whatlang` trigram detection. The best guess is always returned,
//! with no confidence threshold and no minimum sample size: short or mixed
//! samples still yield a single code.

use crate::text_processing::truncate_chars;

/// Detect the primary language of a text sample.
///
/// Returns an ISO 639-3 code (`"deu"`, `"fra"`, `"ita"`, `"eng"`, ...), or an
/// empty string when the sample has no script the detector recognises.
pub fn detect_language(sample: &str) -> String {
    match whatlang::detect(sample) {
        Some(info) => {
            let code = info.lang().code();
            tracing::debug!(
                lang = code,
                confidence = info.confidence(),
                reliable = info.is_reliable(),
                "language detected"
            );
            code.to_string()
        }
        None => String::new(),
    }
}

/// Detect the language on the first `sample_chars` characters of `text`.
pub fn detect_language_prefix(text: &str, sample_chars: usize) -> String {
    detect_language(truncate_chars(text, sample_chars))
}
