use serde::{Deserialize, Serialize};

/// A single document question posed to every backend in a comparison run.
///
/// The prompt template is fixed: the document text, a separator, then the
/// question. No per-model prompt engineering happens anywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentQuery {
    /// Extracted document text.
    pub document: String,
    /// The user's question about the document.
    pub question: String,
}

impl DocumentQuery {
    /// Creates a new query from document text and a question.
    pub fn new<D: Into<String>, Q: Into<String>>(document: D, question: Q) -> Self {
        Self {
            document: document.into(),
            question: question.into(),
        }
    }

    /// Builds the prompt string sent verbatim to every backend.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!(
            "Here's a document: {} \n\n---\n\n {}",
            self.document, self.question
        )
    }
}

/// Token counts reported by a backend for one request.
///
/// Both counts are optional: not every backend reports usage. Cost
/// estimation treats a missing count as unknown rather than failing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenCounts {
    /// Tokens in the prompt portion of the request.
    pub input: Option<u64>,
    /// Tokens produced in the completion.
    pub output: Option<u64>,
}

impl TokenCounts {
    /// Creates token counts with both values present.
    #[must_use]
    pub fn new(input: u64, output: u64) -> Self {
        Self {
            input: Some(input),
            output: Some(output),
        }
    }

    /// Returns `true` when the backend reported both counts.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.input.is_some() && self.output.is_some()
    }
}

/// Raw result of one backend invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendReply {
    /// Identifier of the model that produced this reply.
    pub model_id: String,
    /// The answer text.
    pub answer: String,
    /// Wall-clock latency of the call in milliseconds.
    pub latency_ms: u64,
    /// Token usage, when the backend reported it.
    pub tokens: TokenCounts,
}

impl BackendReply {
    /// Latency in seconds, the unit the ranking engine works in.
    #[must_use]
    pub fn latency_seconds(&self) -> f64 {
        self.latency_ms as f64 / 1000.0
    }
}
