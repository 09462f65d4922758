use docjury_core::{Error, Result};

/// Extracts the text content of every page of a PDF document.
pub(crate) fn extract(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|error| Error::Extraction(format!("PDF text extraction failed: {error}")))
}
