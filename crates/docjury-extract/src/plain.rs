use docjury_core::{Error, Result};

/// Decodes plain-text bytes (txt and md files) as UTF-8.
pub(crate) fn extract(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| Error::Extraction("document is not valid UTF-8".to_owned()))
}
