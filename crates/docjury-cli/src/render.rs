//! Terminal presentation of comparison results.
//!
//! The core produces structures; everything user-facing about tabs, tables,
//! and colors lives here.

use std::io::Write as _;
use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

use docjury_core::BackendReply;
use docjury_ranking::{ComparisonResult, ScoredCandidate};

/// Everything `--json` emits for one comparison.
#[derive(Serialize)]
struct JsonReport<'run> {
    /// Raw per-model replies, in submission order.
    answers: &'run [BackendReply],
    /// Ranked comparison with narrative.
    comparison: &'run ComparisonResult,
}

/// Prints each model's answer, the ranking table, and the narrative.
#[allow(clippy::print_stdout, reason = "Results are the CLI's stdout output")]
pub(crate) fn print_comparison(replies: &[BackendReply], result: &ComparisonResult) {
    for reply in replies {
        println!();
        println!(
            "{}",
            style(format!(
                "── {} ({:.2}s) ──",
                reply.model_id,
                reply.latency_seconds()
            ))
            .bold()
            .cyan()
        );
        println!("{}", reply.answer.trim());
    }

    println!();
    println!("{}", style("Ranking").bold().underlined());
    println!(
        "{:<4} {:<24} {:>9} {:>8} {:>6} {:>6} {:>9} {:>10}",
        "#", "model", "composite", "quality", "speed", "cost", "latency", "est. cost"
    );
    for (position, entry) in result.ranking.iter().enumerate() {
        println!("{}", ranking_row(position + 1, entry));
    }

    if let Some(winner) = &result.winner {
        println!();
        println!("{} {}", style("Winner:").bold().green(), winner);
        println!("{}", result.narrative);
    }
}

/// One formatted row of the ranking table.
fn ranking_row(position: usize, entry: &ScoredCandidate) -> String {
    format!(
        "{:<4} {:<24} {:>9.3} {:>8.2} {:>6.2} {:>6.2} {:>8.2}s {:>10}",
        position,
        entry.candidate.id,
        entry.composite,
        entry.score_quality,
        entry.score_speed,
        entry.score_cost,
        entry.candidate.latency_seconds,
        cost_cell(entry),
    )
}

/// Cost column value, marking estimates without usage data.
fn cost_cell(entry: &ScoredCandidate) -> String {
    if entry.candidate.cost_known {
        format!("${:.4}", entry.candidate.cost_usd)
    } else {
        "unknown".to_owned()
    }
}

/// Emits the whole comparison as pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization fails.
#[allow(clippy::print_stdout, reason = "Results are the CLI's stdout output")]
pub(crate) fn print_json(replies: &[BackendReply], result: &ComparisonResult) -> Result<()> {
    let report = JsonReport {
        answers: replies,
        comparison: result,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Message for a run where every candidate failed upstream.
#[allow(clippy::print_stdout, reason = "Results are the CLI's stdout output")]
pub(crate) fn no_results() {
    println!(
        "{}",
        style("No results available: every backend call failed or timed out.").yellow()
    );
}

/// Intro line for an interactive session.
#[allow(clippy::print_stdout, reason = "Results are the CLI's stdout output")]
pub(crate) fn interactive_intro(document: &Path) {
    println!(
        "Loaded {}. Ask questions about it; empty line or \"exit\" quits.",
        style(document.display()).bold()
    );
}

/// Prompt before reading the next interactive question.
///
/// # Errors
/// Returns an error if stdout cannot be flushed.
#[allow(clippy::print_stdout, reason = "Results are the CLI's stdout output")]
pub(crate) fn question_prompt() -> Result<()> {
    print!("question> ");
    std::io::stdout().flush()?;
    Ok(())
}
