//! Configuration types for backends, candidate models, weights, and pricing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API keys for model backends.
    pub api_keys: ApiKeys,
    /// Candidate models to compare, in presentation order.
    pub models: Vec<ModelEntry>,
    /// Bounds of the ordinal quality scale the ratings live on.
    pub quality_scale: QualityScaleSettings,
    /// Default criterion weights for the composite score.
    pub weights: WeightSettings,
    /// Price table: model identifier to per-million-token prices.
    pub pricing: HashMap<String, PriceEntry>,
    /// Request settings shared by all backends.
    pub request: RequestSettings,
}

/// API keys for model backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    /// `OpenAI` API key.
    pub openai_api_key: Option<String>,
    /// `OpenRouter` API key for models routed through `OpenRouter`.
    pub openrouter_api_key: Option<String>,
}

/// Which backend service a candidate model is invoked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The `OpenAI` chat completions API.
    OpenAi,
    /// The `OpenRouter` chat completions API.
    OpenRouter,
}

/// One candidate model in a comparison run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Model identifier as the backend service knows it.
    pub id: String,
    /// Backend service this model is invoked through.
    pub backend: BackendKind,
    /// Externally curated quality rating on the configured ordinal scale.
    ///
    /// Ratings come from human judgment or a separate evaluator; docjury
    /// never derives quality from the answers themselves.
    pub quality: f64,
}

/// Bounds of the ordinal quality scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QualityScaleSettings {
    /// Lowest rating on the scale.
    pub min: f64,
    /// Highest rating on the scale.
    pub max: f64,
}

impl Default for QualityScaleSettings {
    fn default() -> Self {
        Self { min: 1.0, max: 4.0 }
    }
}

/// Criterion weights as configured, before normalization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightSettings {
    /// Weight of answer quality.
    pub quality: f64,
    /// Weight of response speed.
    pub speed: f64,
    /// Weight of monetary cost.
    pub cost: f64,
}

impl Default for WeightSettings {
    fn default() -> Self {
        Self {
            quality: 0.5,
            speed: 0.3,
            cost: 0.2,
        }
    }
}

/// Per-million-token prices for one model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceEntry {
    /// USD per million input tokens.
    pub input_per_mtok: f64,
    /// USD per million output tokens.
    pub output_per_mtok: f64,
}

/// Request settings shared by all backends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSettings {
    /// Per-call timeout in seconds; a timed-out candidate is dropped.
    pub timeout_seconds: u64,
    /// Maximum number of backend calls in flight at once.
    pub max_concurrent: usize,
    /// Maximum completion tokens requested from each backend.
    pub max_tokens: usize,
    /// Sampling temperature.
    pub temperature: f32,
    /// System instructions sent ahead of the document prompt.
    pub instructions: String,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 120,
            max_concurrent: 4,
            max_tokens: 2000,
            temperature: 0.7,
            instructions: "You answer questions about a document the user provides. \
                           Base your answer only on the document text."
                .to_owned(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let models = vec![
            ModelEntry {
                id: "gpt-3.5-turbo".to_owned(),
                backend: BackendKind::OpenAi,
                quality: 1.0,
            },
            ModelEntry {
                id: "gpt-5-nano".to_owned(),
                backend: BackendKind::OpenAi,
                quality: 2.0,
            },
            ModelEntry {
                id: "gpt-5-chat-latest".to_owned(),
                backend: BackendKind::OpenAi,
                quality: 3.0,
            },
            ModelEntry {
                id: "gpt-4.1".to_owned(),
                backend: BackendKind::OpenAi,
                quality: 4.0,
            },
        ];

        let mut pricing = HashMap::new();
        pricing.insert(
            "gpt-3.5-turbo".to_owned(),
            PriceEntry {
                input_per_mtok: 0.5,
                output_per_mtok: 1.5,
            },
        );
        pricing.insert(
            "gpt-5-nano".to_owned(),
            PriceEntry {
                input_per_mtok: 0.05,
                output_per_mtok: 0.4,
            },
        );
        pricing.insert(
            "gpt-5-chat-latest".to_owned(),
            PriceEntry {
                input_per_mtok: 1.25,
                output_per_mtok: 10.0,
            },
        );
        pricing.insert(
            "gpt-4.1".to_owned(),
            PriceEntry {
                input_per_mtok: 2.0,
                output_per_mtok: 8.0,
            },
        );

        Self {
            api_keys: ApiKeys::default(),
            models,
            quality_scale: QualityScaleSettings::default(),
            weights: WeightSettings::default(),
            pricing,
            request: RequestSettings::default(),
        }
    }
}

impl AppConfig {
    /// Get the default config directory path (`~/.docjury`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".docjury"))
    }

    /// Get the default config file path (`~/.docjury/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location (`~/.docjury/config.toml`)
    /// If the config doesn't exist, creates it with default values
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read config: {error}")))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|error| Error::Config(format!("Failed to parse config: {error}")))?;

        tracing::debug!(
            "Loaded config from {:?}: {} models, openai_api_key={}",
            path,
            config.models.len(),
            if config.api_keys.openai_api_key.is_some() {
                "present"
            } else {
                "missing"
            }
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                Error::Config(format!("Failed to create config directory: {error}"))
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# docjury Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize models, ratings, prices, and weights\n\n";

        fs::write(path, format!("{header}{contents}"))
            .map_err(|error| Error::Config(format!("Failed to write config: {error}")))?;

        Ok(())
    }

    /// Get API key for a backend, checking config first, then environment variables
    pub fn get_api_key(&self, backend: BackendKind) -> Option<String> {
        match backend {
            BackendKind::OpenAi => self
                .api_keys
                .openai_api_key
                .clone()
                .or_else(|| env::var("OPENAI_API_KEY").ok()),
            BackendKind::OpenRouter => self
                .api_keys
                .openrouter_api_key
                .clone()
                .or_else(|| env::var("OPENROUTER_API_KEY").ok()),
        }
    }

    /// Look up the configured entry for a model identifier.
    pub fn model_entry(&self, model_id: &str) -> Option<&ModelEntry> {
        self.models.iter().find(|entry| entry.id == model_id)
    }
}
