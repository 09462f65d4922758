use std::env;
use std::time::Instant;

use async_trait::async_trait;
use docjury_core::{
    BackendReply, DocumentQuery, Error, ModelBackend, RequestSettings, Result, TokenCounts,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

/// `OpenRouter` API endpoint URL.
const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
/// Env var key for the `OpenRouter` API key.
const ENV_OPENROUTER_API_KEY: &str = "OPENROUTER_API_KEY";

/// Backend adapter for the `OpenRouter` API, which fronts many providers.
#[derive(Debug)]
pub struct OpenRouterBackend {
    /// HTTP client for API requests.
    client: Client,
    /// `OpenRouter` API key.
    api_key: String,
    /// Model identifier to answer as (for example `anthropic/claude-3-5-haiku`).
    model: String,
    /// System instructions sent ahead of the document prompt.
    instructions: String,
    /// Maximum completion tokens requested.
    max_tokens: usize,
    /// Sampling temperature.
    temperature: f32,
}

impl OpenRouterBackend {
    /// Creates a new backend for one model with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn new<M: Into<String>>(api_key: String, model: M) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_OPENROUTER_API_KEY.to_owned()));
        }

        let defaults = RequestSettings::default();
        Ok(Self {
            client: Client::default(),
            api_key,
            model: model.into(),
            instructions: defaults.instructions,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        })
    }

    /// Creates a new backend from the `OPENROUTER_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the env var is missing.
    pub fn from_env<M: Into<String>>(model: M) -> Result<Self> {
        let api_key = env::var(ENV_OPENROUTER_API_KEY)
            .map_err(|_| Error::MissingApiKey(ENV_OPENROUTER_API_KEY.to_owned()))?;
        Self::new(api_key, model)
    }

    /// Applies shared request settings from the configuration.
    #[must_use]
    pub fn with_settings(mut self, settings: &RequestSettings) -> Self {
        self.instructions = settings.instructions.clone();
        self.max_tokens = settings.max_tokens;
        self.temperature = settings.temperature;
        self
    }

    /// Builds the request payload for the `OpenRouter` API.
    fn build_request(&self, query: &DocumentQuery) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": self.instructions,
                },
                {
                    "role": "user",
                    "content": query.prompt(),
                }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }
}

/// Response payload returned by the `OpenRouter` API.
#[derive(Deserialize)]
struct OpenRouterResponse {
    /// List of generated choices.
    choices: Vec<Choice>,
    /// Optional token usage statistics returned by the service.
    usage: Option<Usage>,
}

/// Individual completion choice from `OpenRouter`.
#[derive(Deserialize)]
struct Choice {
    /// Message payload representing the completion text.
    message: Message,
}

/// Message structure containing generated content.
#[derive(Deserialize)]
struct Message {
    /// Generated text content.
    content: String,
}

/// Token usage statistics from `OpenRouter`.
#[derive(Deserialize)]
struct Usage {
    /// Number of tokens in the prompt.
    prompt_tokens: Option<u64>,
    /// Number of tokens in the completion.
    completion_tokens: Option<u64>,
}

#[async_trait]
impl ModelBackend for OpenRouterBackend {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn answer(&self, query: &DocumentQuery) -> Result<BackendReply> {
        let start = Instant::now();
        let request = self.build_request(query);

        let response = self
            .client
            .post(OPENROUTER_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Backend(format!("OpenRouter API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Backend(format!(
                "OpenRouter API error {status}: {error_text}"
            )));
        }

        let parsed: OpenRouterResponse = response.json().await.map_err(|err| {
            Error::InvalidResponse(format!("Failed to parse OpenRouter response: {err}"))
        })?;

        let latency_ms = start.elapsed().as_millis() as u64;

        let answer = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::InvalidResponse("No choices from OpenRouter".to_owned()))?;

        let tokens = parsed.usage.map_or_else(TokenCounts::default, |usage| TokenCounts {
            input: usage.prompt_tokens,
            output: usage.completion_tokens,
        });

        Ok(BackendReply {
            model_id: self.model.clone(),
            answer,
            latency_ms,
            tokens,
        })
    }
}
