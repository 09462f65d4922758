use std::env;
use std::time::Instant;

use async_trait::async_trait;
use docjury_core::{
    BackendReply, DocumentQuery, Error, ModelBackend, RequestSettings, Result, TokenCounts,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// `OpenAI` chat completions endpoint URL.
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// Env var key for the `OpenAI` API key.
const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Backend adapter for the `OpenAI` chat completions API.
#[derive(Debug)]
pub struct OpenAiBackend {
    /// HTTP client for API requests.
    client: Client,
    /// `OpenAI` API key.
    api_key: String,
    /// Model identifier to answer as.
    model: String,
    /// System instructions sent ahead of the document prompt.
    instructions: String,
    /// Maximum completion tokens requested.
    max_tokens: usize,
    /// Sampling temperature.
    temperature: f32,
}

impl OpenAiBackend {
    /// Creates a new backend for one model with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn new<M: Into<String>>(api_key: String, model: M) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()));
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

    /// Creates a new backend from the `OPENAI_API_KEY` environment variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the env var is missing.
    pub fn from_env<M: Into<String>>(model: M) -> Result<Self> {
        let api_key = env::var(ENV_OPENAI_API_KEY)
            .map_err(|_| Error::MissingApiKey(ENV_OPENAI_API_KEY.to_owned()))?;
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

    /// Sets the system instructions.
    #[must_use]
    pub fn with_instructions<I: Into<String>>(mut self, instructions: I) -> Self {
        self.instructions = instructions.into();
        self
    }
}

/// Request payload sent to the `OpenAI` chat completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// Model identifier provided by the service.
    model: String,
    /// Messages that form the conversation for the request.
    messages: Vec<ChatMessage>,
    /// Sampling temperature controlling response randomness.
    temperature: f32,
    /// Maximum number of tokens allowed in the completion.
    max_tokens: usize,
}

/// Message delivered to the `OpenAI` API.
#[derive(Debug, Serialize)]
struct ChatMessage {
    /// Role of the message author (`system` or `user`).
    role: String,
    /// Textual content of the message.
    content: String,
}

/// Response payload returned by `OpenAI`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// List of candidate completions.
    choices: Vec<ChatChoice>,
    /// Token accounting for the request, when the service reports it.
    usage: Option<ChatUsage>,
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// Message generated for the choice.
    message: ChatResponseMessage,
}

/// Response message containing the generated text.
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Generated text content.
    content: String,
}

/// Token usage metrics for a response.
#[derive(Debug, Deserialize)]
struct ChatUsage {
    /// Number of tokens in the prompt portion of the request.
    prompt_tokens: Option<u64>,
    /// Number of tokens produced in the completion.
    completion_tokens: Option<u64>,
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn answer(&self, query: &DocumentQuery) -> Result<BackendReply> {
        let start = Instant::now();

        let messages = vec![
            ChatMessage {
                role: "system".to_owned(),
                content: self.instructions.clone(),
            },
            ChatMessage {
                role: "user".to_owned(),
                content: query.prompt(),
            },
        ];

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Backend(format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Backend(format!(
                "OpenAI API error {status}: {error_text}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|err| Error::InvalidResponse(format!("Failed to parse OpenAI response: {err}")))?;

        let latency_ms = start.elapsed().as_millis() as u64;

        let answer = chat_response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| Error::InvalidResponse("No choices from OpenAI".to_owned()))?;

        let tokens = chat_response.usage.map_or_else(TokenCounts::default, |usage| TokenCounts {
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
