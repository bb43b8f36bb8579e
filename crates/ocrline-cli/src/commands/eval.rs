//! Eval command - word error rate of reconstructed lines against a reference.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::debug;

use ocrline_core::{word_error_rate, WerReport};

use super::load_config;

/// Arguments for the eval command.
#[derive(Args)]
pub struct EvalArgs {
    /// Reconstructed lines, one per line
    #[arg(required = true)]
    predicted: PathBuf,

    /// Reference transcript, one line per predicted line
    #[arg(required = true)]
    reference: PathBuf,

    /// Spacing marker to turn back into a space before scoring (default from config)
    #[arg(short, long)]
    marker: Option<char>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct EvalReport {
    wer: f64,
    #[serde(flatten)]
    counts: WerReport,
    lines: usize,
}

pub async fn run(args: EvalArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let marker = args.marker.unwrap_or(config.serializer.spacing_marker);

    let predicted: Vec<String> = read_lines(&args.predicted)
        .await?
        .into_iter()
        .map(|line| line.replace(marker, " "))
        .collect();
    let reference = read_lines(&args.reference).await?;
    debug!(
        "Scoring {} predicted lines against {} reference lines",
        predicted.len(),
        reference.len()
    );

    let counts = word_error_rate(&predicted, &reference)?;
    let report = EvalReport {
        wer: counts.wer(),
        counts,
        lines: reference.len(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("WER: {:.4}", report.wer);
        println!(
            "   {} substitutions, {} deletions, {} insertions over {} reference words",
            style(counts.substitutions).yellow(),
            style(counts.deletions).yellow(),
            style(counts.insertions).yellow(),
            counts.reference_words
        );
    }

    Ok(())
}

async fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let content = tokio::fs::read_to_string(path).await?;
    Ok(content.lines().map(str::to_string).collect())
}
