//! Core types and traits for the docjury model comparison tool.
//!
//! This crate provides fundamental types, error handling, configuration,
//! and the backend trait used across the docjury workspace.
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

/// Configuration types and file handling.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Trait definitions for model backends.
pub mod traits;
/// Core data types for queries and backend replies.
pub mod types;

pub use config::{
    ApiKeys, AppConfig, BackendKind, ModelEntry, PriceEntry, QualityScaleSettings,
    RequestSettings, WeightSettings,
};
pub use error::{Error, Result};
pub use traits::ModelBackend;
pub use types::{BackendReply, DocumentQuery, TokenCounts};
