//! Document text extraction for the docjury comparison pipeline.
//!
//! Turns an uploaded file (bytes plus declared extension) into a single
//! string of text. Only the allow-listed formats are accepted; anything
//! else fails with an unsupported-format error before any backend is
//! invoked.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

/// Content-hash keyed cache of extracted document text.
pub mod cache;
/// PDF text extraction.
mod pdf;
/// Plain-text and markdown extraction.
mod plain;

pub use cache::DocumentCache;

use docjury_core::{Error, Result};

/// File extensions accepted for extraction.
pub const ALLOWED_EXTENSIONS: &[&str] = &["txt", "md", "pdf"];

/// Extracts the text of a document from its raw bytes.
///
/// The declared extension (case-insensitive) selects the extractor.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for extensions outside the
/// allow-list, or [`Error::Extraction`] when the bytes cannot be decoded.
pub fn extract_text(bytes: &[u8], declared_extension: &str) -> Result<String> {
    let extension = declared_extension.to_lowercase();
    match extension.as_str() {
        "txt" | "md" => plain::extract(bytes),
        "pdf" => pdf::extract(bytes),
        other => Err(Error::UnsupportedFormat(other.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_extraction() {
        let text = extract_text(b"hello document", "txt").expect("extraction failed");
        assert_eq!(text, "hello document");
    }

    #[test]
    fn test_markdown_treated_as_text() {
        let text = extract_text(b"# Title\n\nBody.", "md").expect("extraction failed");
        assert_eq!(text, "# Title\n\nBody.");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let text = extract_text(b"upper", "TXT").expect("extraction failed");
        assert_eq!(text, "upper");
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let error = extract_text(b"ignored", "docx").unwrap_err();
        assert!(matches!(error, Error::UnsupportedFormat(ext) if ext == "docx"));
    }

    #[test]
    fn test_invalid_utf8_fails_extraction() {
        let error = extract_text(&[0xff, 0xfe, 0xfd], "txt").unwrap_err();
        assert!(matches!(error, Error::Extraction(_)));
    }

    #[test]
    fn test_garbage_pdf_fails_extraction() {
        let error = extract_text(b"not a pdf at all", "pdf").unwrap_err();
        assert!(matches!(error, Error::Extraction(_)));
    }
}
