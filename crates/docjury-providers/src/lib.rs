//! Backend adapters for hosted LLM services.
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

/// Mock backend for testing.
pub mod mock;
/// `OpenAI` backend implementation.
pub mod openai;
/// `OpenRouter` multi-provider backend implementation.
pub mod openrouter;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;
pub use openrouter::OpenRouterBackend;
