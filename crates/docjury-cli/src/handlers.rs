//! Command handling: config loading, document extraction, and the
//! per-question comparison pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use tokio::io::{AsyncBufReadExt as _, BufReader};

use docjury_core::{AppConfig, BackendKind, DocumentQuery, Error, ModelBackend};
use docjury_extract::DocumentCache;
use docjury_providers::{OpenAiBackend, OpenRouterBackend};
use docjury_ranking::{PriceTable, QualityScale, Weights, rank, score_candidates};

use crate::cli::{Cli, parse_weights};
use crate::driver;
use crate::render;

/// Runs one docjury invocation: a single question, or an interactive
/// session when no question was given.
///
/// # Errors
/// Returns an error if the config, document, or backends cannot be set up.
/// Individual backend failures during a comparison are not errors; those
/// candidates are dropped.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_create()?,
    };
    apply_overrides(&mut config, &cli)?;

    let bytes = tokio::fs::read(&cli.document)
        .await
        .with_context(|| format!("failed to read {}", cli.document.display()))?;
    let extension = extension_of(&cli.document);

    let mut cache = DocumentCache::new();
    let backends = build_backends(&config)?;

    if let Some(question) = &cli.question {
        let document = cache.fetch_or_extract(&bytes, &extension)?.to_owned();
        compare_once(&backends, &config, document, question, cli.json).await?;
        return Ok(());
    }

    // Interactive session: keep answering questions about the same
    // document, reusing the cached extraction for follow-ups.
    render::interactive_intro(&cli.document);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render::question_prompt()?;
    while let Some(line) = lines.next_line().await? {
        let question = line.trim().to_owned();
        if question.is_empty() || question == "exit" || question == "quit" {
            break;
        }

        let document = cache.fetch_or_extract(&bytes, &extension)?.to_owned();
        compare_once(&backends, &config, document, &question, cli.json).await?;
        render::question_prompt()?;
    }

    Ok(())
}

/// Applies CLI overrides onto the loaded configuration.
fn apply_overrides(config: &mut AppConfig, cli: &Cli) -> Result<()> {
    if let Some(timeout) = cli.timeout {
        config.request.timeout_seconds = timeout;
    }

    if let Some(raw) = &cli.weights {
        config.weights = parse_weights(raw)?;
    }

    if !cli.models.is_empty() {
        config
            .models
            .retain(|entry| cli.models.contains(&entry.id));
        if config.models.is_empty() {
            bail!("none of the requested models are configured");
        }
    }

    Ok(())
}

/// Builds one backend per configured candidate model.
fn build_backends(config: &AppConfig) -> Result<Vec<Arc<dyn ModelBackend>>> {
    let mut backends: Vec<Arc<dyn ModelBackend>> = Vec::with_capacity(config.models.len());

    for entry in &config.models {
        let backend: Arc<dyn ModelBackend> = match entry.backend {
            BackendKind::OpenAi => {
                let api_key = config.get_api_key(BackendKind::OpenAi).ok_or_else(|| {
                    Error::MissingApiKey("OPENAI_API_KEY or config.toml openai_api_key".to_owned())
                })?;
                Arc::new(
                    OpenAiBackend::new(api_key, entry.id.as_str())?
                        .with_settings(&config.request),
                )
            }
            BackendKind::OpenRouter => {
                let api_key = config.get_api_key(BackendKind::OpenRouter).ok_or_else(|| {
                    Error::MissingApiKey(
                        "OPENROUTER_API_KEY or config.toml openrouter_api_key".to_owned(),
                    )
                })?;
                Arc::new(
                    OpenRouterBackend::new(api_key, entry.id.as_str())?
                        .with_settings(&config.request),
                )
            }
        };
        backends.push(backend);
    }

    Ok(backends)
}

/// Runs the full pipeline for one question: fan-out, cost, score, rank,
/// render.
async fn compare_once(
    backends: &[Arc<dyn ModelBackend>],
    config: &AppConfig,
    document: String,
    question: &str,
    json: bool,
) -> Result<()> {
    let query = Arc::new(DocumentQuery::new(document, question));
    let timeout = Duration::from_secs(config.request.timeout_seconds);

    tracing::info!("Comparing {} candidate models", backends.len());
    let replies =
        driver::collect_replies(backends, &query, timeout, config.request.max_concurrent).await;

    if replies.is_empty() {
        render::no_results();
        return Ok(());
    }

    let prices = PriceTable::from_config(&config.pricing);
    let candidates = driver::build_candidates(&replies, config, &prices);

    let weights = Weights::from(config.weights);
    let scale = QualityScale::from(config.quality_scale);
    let scored = score_candidates(&candidates, scale, weights);
    let result = rank(scored, weights);

    if json {
        render::print_json(&replies, &result)?;
    } else {
        render::print_comparison(&replies, &result);
    }

    Ok(())
}

/// Lower-cased file extension of the document path.
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or_default()
        .to_lowercase()
}
