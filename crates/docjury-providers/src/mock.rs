//! Mock backend for testing the comparison pipeline.
//!
//! Allows fixing the answer, latency, token counts, and failure behavior
//! of a candidate, enabling end-to-end testing of the orchestration and
//! ranking without real API calls.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docjury_core::{BackendReply, DocumentQuery, Error, ModelBackend, Result, TokenCounts};

/// Mock backend returning a canned reply with fixed metrics.
#[derive(Clone)]
pub struct MockBackend {
    /// Model identifier this mock answers as.
    model: String,
    /// Canned answer text.
    answer: String,
    /// Reported latency in milliseconds.
    latency_ms: u64,
    /// Reported token counts.
    tokens: TokenCounts,
    /// Real delay before answering, to exercise timeouts.
    delay_ms: u64,
    /// When set, every call fails with a backend error.
    fail: bool,
    /// Prompts received, for verification.
    call_history: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Creates a mock backend answering as the given model identifier.
    #[must_use]
    pub fn new<M: Into<String>>(model: M) -> Self {
        Self {
            model: model.into(),
            answer: "mock answer".to_owned(),
            latency_ms: 0,
            tokens: TokenCounts::default(),
            delay_ms: 0,
            fail: false,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sets the canned answer text.
    #[must_use]
    pub fn with_answer<A: Into<String>>(mut self, answer: A) -> Self {
        self.answer = answer.into();
        self
    }

    /// Sets the reported latency.
    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Sets the reported token counts.
    #[must_use]
    pub fn with_tokens(mut self, input: u64, output: u64) -> Self {
        self.tokens = TokenCounts::new(input, output);
        self
    }

    /// Makes every call sleep for real before answering.
    #[must_use]
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Makes every call fail with a backend error.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Prompts this mock has received.
    #[must_use]
    pub fn call_history(&self) -> Vec<String> {
        self.call_history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }

    /// Number of calls made to this mock.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history
            .lock()
            .map(|history| history.len())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn answer(&self, query: &DocumentQuery) -> Result<BackendReply> {
        if let Ok(mut history) = self.call_history.lock() {
            history.push(query.prompt());
        }

        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }

        if self.fail {
            return Err(Error::Backend(format!("{} mock failure", self.model)));
        }

        Ok(BackendReply {
            model_id: self.model.clone(),
            answer: self.answer.clone(),
            latency_ms: self.latency_ms,
            tokens: self.tokens,
        })
    }
}
