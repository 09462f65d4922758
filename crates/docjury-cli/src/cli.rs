use std::path::PathBuf;

use clap::Parser;

use docjury_core::{Error, Result, WeightSettings};

/// Command-line arguments for docjury.
#[derive(Debug, Parser)]
#[command(
    name = "docjury",
    about = "Ask several LLMs a question about a document and rank their answers",
    version
)]
pub struct Cli {
    /// Path to the document (.txt, .md, or .pdf)
    pub document: PathBuf,

    /// Question to ask about the document; omit to ask questions interactively
    pub question: Option<String>,

    /// Config file path (default: ~/.docjury/config.toml, created on first run)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Weight override as "quality,speed,cost", e.g. "0.5,0.3,0.2"
    #[arg(long)]
    pub weights: Option<String>,

    /// Compare only these model ids (comma separated); default is every configured model
    #[arg(long, value_delimiter = ',')]
    pub models: Vec<String>,

    /// Per-call timeout in seconds, overriding the configured value
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Emit the comparison as JSON instead of formatted text
    #[arg(long)]
    pub json: bool,
}

/// Parses a "quality,speed,cost" weight triple.
///
/// # Errors
///
/// Returns a configuration error unless the string is exactly three
/// comma-separated non-negative numbers.
pub fn parse_weights(raw: &str) -> Result<WeightSettings> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(Error::Config(format!(
            "expected three comma-separated weights, got {raw:?}"
        )));
    }

    let mut values = [0.0_f64; 3];
    for (slot, part) in values.iter_mut().zip(&parts) {
        let parsed: f64 = part
            .parse()
            .map_err(|_| Error::Config(format!("invalid weight value {part:?}")))?;
        if parsed < 0.0 || !parsed.is_finite() {
            return Err(Error::Config(format!(
                "weights must be non-negative, got {part:?}"
            )));
        }
        *slot = parsed;
    }

    Ok(WeightSettings {
        quality: values[0],
        speed: values[1],
        cost: values[2],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_weights_triple() {
        let weights = parse_weights("0.5, 0.3, 0.2").expect("parse failed");
        assert!((weights.quality - 0.5).abs() < f64::EPSILON);
        assert!((weights.speed - 0.3).abs() < f64::EPSILON);
        assert!((weights.cost - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_weights_rejects_bad_input() {
        assert!(parse_weights("0.5,0.3").is_err());
        assert!(parse_weights("a,b,c").is_err());
        assert!(parse_weights("0.5,-0.3,0.2").is_err());
        assert!(parse_weights("").is_err());
    }

    #[test]
    fn test_zero_weights_parse_fine() {
        // All-zero is legal input; the scoring engine substitutes defaults
        let weights = parse_weights("0,0,0").expect("parse failed");
        assert!(weights.quality.abs() < f64::EPSILON);
    }
}
