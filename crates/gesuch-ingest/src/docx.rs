//! Text extraction from Office Open XML (`.docx`) documents.
//!
//! A `.docx` file is a zip container; the body lives in `word/document.xml`:
//! ```xml
//! <w:document>
//!   <w:body>
//!     <w:p><w:r><w:t>Teilprojekt 1: Leitmedien</w:t></w:r></w:p>
//!     <w:p><w:r><w:t xml:space="preserve">CHF </w:t><w:t>500'000</w:t></w:r></w:p>
//!   </w:body>
//! </w:document>
//! ```
//! Every paragraph becomes one line; runs are concatenated.

use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;

use gesuch_core::{BackendError, TextBackend};

const DOCUMENT_XML: &str = "word/document.xml";

/// [`TextBackend`] for Word documents in the `.docx` format.
///
/// Legacy binary `.doc` files are not zip containers and fail to open.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordBackend;

impl TextBackend for WordBackend {
    fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
        let file = std::fs::File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| BackendError::OpenError(format!("not a .docx container: {}", e)))?;

        let mut entry = archive.by_name(DOCUMENT_XML).map_err(|e| {
            BackendError::ExtractionError(format!("missing {}: {}", DOCUMENT_XML, e))
        })?;
        let mut xml = String::new();
        entry.read_to_string(&mut xml)?;

        let text = document_xml_to_text(&xml)?;
        tracing::debug!(path = %path.display(), chars = text.len(), "docx text extracted");
        Ok(text)
    }
}

/// Flatten the WordprocessingML body into plain text.
///
/// `w:p` ends a line, `w:t` contributes its text, `w:tab` becomes a tab and
/// `w:br` / `w:cr` a line break. Everything else is ignored.
pub fn document_xml_to_text(xml: &str) -> Result<String, BackendError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = true;
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let unescaped = e.unescape().map_err(|err| {
                    BackendError::ExtractionError(format!("bad text in {}: {}", DOCUMENT_XML, err))
                })?;
                text.push_str(&unescaped);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BackendError::ExtractionError(format!(
                    "malformed {} at byte {}: {}",
                    DOCUMENT_XML,
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(text)
}
