use async_trait::async_trait;

use crate::{BackendReply, DocumentQuery, Result};

/// Trait for hosted model backends that can answer a document question.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Returns the model identifier this backend answers as.
    ///
    /// The identifier must be unique within one comparison run; it keys the
    /// price table and the ranking output.
    fn model_id(&self) -> &str;

    /// Checks whether this backend is ready to process requests.
    async fn is_available(&self) -> bool;

    /// Sends the query's prompt to the hosted model and returns its reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable, the request fails,
    /// or the response cannot be parsed. A failure here affects only this
    /// candidate; the orchestration layer drops it and continues.
    async fn answer(&self, query: &DocumentQuery) -> Result<BackendReply>;
}
