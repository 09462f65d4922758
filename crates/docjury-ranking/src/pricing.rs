//! Price table and monetary cost estimation.
//!
//! Prices are quoted in USD per million tokens, the unit every hosted
//! provider publishes. The table is read-only during a comparison run.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use docjury_core::{PriceEntry, TokenCounts};

/// Per-million-token prices for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    /// USD per million input tokens.
    pub input_per_mtok: f64,
    /// USD per million output tokens.
    pub output_per_mtok: f64,
}

impl ModelPricing {
    /// Creates pricing from input and output rates.
    #[must_use]
    pub fn new(input_per_mtok: f64, output_per_mtok: f64) -> Self {
        Self {
            input_per_mtok,
            output_per_mtok,
        }
    }

    /// Monetary cost of a request with the given token counts.
    #[must_use]
    pub fn cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1_000_000.0).mul_add(
            self.input_per_mtok,
            (output_tokens as f64 / 1_000_000.0) * self.output_per_mtok,
        )
    }
}

impl From<PriceEntry> for ModelPricing {
    fn from(entry: PriceEntry) -> Self {
        Self::new(entry.input_per_mtok, entry.output_per_mtok)
    }
}

/// A cost figure plus whether it is trustworthy.
///
/// `known` is false when the backend did not report token usage or the model
/// is absent from the price table. The cost is then 0.0, which the
/// normalizer will rank favorably; that approximation is deliberate and
/// surfaced to the presentation layer through this flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Estimated cost in USD.
    pub usd: f64,
    /// Whether the estimate is backed by real usage and pricing data.
    pub known: bool,
}

impl CostEstimate {
    /// An unknown cost, reported as zero.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            usd: 0.0,
            known: false,
        }
    }
}

/// Mapping from model identifier to its pricing. Static per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceTable {
    prices: HashMap<String, ModelPricing>,
}

impl PriceTable {
    /// Creates an empty price table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from the configuration's pricing map.
    #[must_use]
    pub fn from_config(pricing: &HashMap<String, PriceEntry>) -> Self {
        let prices = pricing
            .iter()
            .map(|(model_id, entry)| (model_id.clone(), ModelPricing::from(*entry)))
            .collect();
        Self { prices }
    }

    /// Adds or replaces the pricing for a model.
    pub fn insert<I: Into<String>>(&mut self, model_id: I, pricing: ModelPricing) {
        self.prices.insert(model_id.into(), pricing);
    }

    /// Looks up the pricing for a model identifier.
    #[must_use]
    pub fn get(&self, model_id: &str) -> Option<ModelPricing> {
        self.prices.get(model_id).copied()
    }

    /// Estimates the cost of one request.
    ///
    /// Missing token counts or an unlisted model never fail: the candidate
    /// gets a zero cost flagged as unknown, and the degradation is logged.
    #[must_use]
    pub fn estimate(&self, model_id: &str, tokens: TokenCounts) -> CostEstimate {
        let Some(pricing) = self.get(model_id) else {
            tracing::warn!("No pricing for model {model_id}; treating cost as unknown");
            return CostEstimate::unknown();
        };

        let (Some(input), Some(output)) = (tokens.input, tokens.output) else {
            tracing::warn!("Model {model_id} did not report token usage; treating cost as unknown");
            return CostEstimate::unknown();
        };

        CostEstimate {
            usd: pricing.cost(input, output),
            known: true,
        }
    }
}
