//! Batch command - reconstruct lines for many layout files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use ocrline_core::{AnalyzeResult, DocumentResult, PagePipeline};

use super::process::report_problems;
use super::{format_document, load_config, OutputFormat, StrategyArg};

/// Suffix appended to the input stem so outputs never replace their inputs.
const OUTPUT_SUFFIX: &str = "lines";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of layout JSON files
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Grouping strategy (overrides config)
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Also write summary.csv
    #[arg(long)]
    summary: bool,

    /// Worker threads for page processing (0 = all cores)
    #[arg(short = 'j', long, default_value = "0")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome for one input file.
struct FileOutcome {
    path: PathBuf,
    document: Option<DocumentResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(strategy) = args.strategy {
        config.selection.strategy = strategy.into();
    }
    config.pipeline.num_threads = args.jobs;

    let files = collect_inputs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = PagePipeline::new(&config);
    let mut outcomes = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_file(&path, &pipeline, &args);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(document) => outcomes.push(FileOutcome {
                path,
                document: Some(document),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let message = e.to_string();
                if !args.continue_on_error {
                    progress.abandon();
                    error!("Failed to process {}: {}", path.display(), message);
                    anyhow::bail!("Processing failed: {}", message);
                }
                warn!("Failed to process {}: {}", path.display(), message);
                outcomes.push(FileOutcome {
                    path,
                    document: None,
                    error: Some(message),
                    processing_time_ms,
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| o.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(outcomes.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Expand the pattern to JSON inputs, skipping outputs of earlier runs.
fn collect_inputs(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let is_json = p
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("json"));
            let is_output = p
                .file_stem()
                .and_then(|s| s.to_str())
                .is_some_and(|s| s.ends_with(&format!(".{}", OUTPUT_SUFFIX)));
            is_json && !is_output
        })
        .collect();
    files.sort();
    Ok(files)
}

fn output_path(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    let name = format!("{}.{}.{}", stem, OUTPUT_SUFFIX, format.extension());

    match output_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

fn process_file(
    path: &Path,
    pipeline: &PagePipeline,
    args: &BatchArgs,
) -> anyhow::Result<DocumentResult> {
    let json = fs::read_to_string(path)?;
    let document = AnalyzeResult::from_json(&json)?;

    let result = pipeline.process_document(&document.pages);
    report_problems(&result);

    if result.pages.is_empty() && !result.errors.is_empty() {
        anyhow::bail!("all {} pages failed", result.errors.len());
    }

    let target = output_path(path, args.output_dir.as_deref(), args.format);
    fs::write(&target, format_document(&result, args.format)?)?;
    debug!("Wrote output to {}", target.display());

    Ok(result)
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "pages",
        "pages_skipped",
        "lines",
        "words",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = outcome.processing_time_ms.to_string();

        if let Some(document) = &outcome.document {
            let words: usize = document.pages.iter().map(|p| p.word_count).sum();
            wtr.write_record([
                filename,
                "success",
                &document.pages.len().to_string(),
                &document.errors.len().to_string(),
                &document.lines.len().to_string(),
                &words.to_string(),
                &time,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &time,
                outcome.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_keeps_input() {
        let input = Path::new("/data/page.json");
        assert_eq!(
            output_path(input, None, OutputFormat::Json),
            PathBuf::from("/data/page.lines.json")
        );
        assert_eq!(
            output_path(input, Some(Path::new("/out")), OutputFormat::Text),
            PathBuf::from("/out/page.lines.txt")
        );
    }

    #[test]
    fn test_collect_inputs_skips_outputs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.json", "b.JSON", "a.lines.json", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let pattern = format!("{}/*", dir.path().display());
        let names: Vec<String> = collect_inputs(&pattern)
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect();

        assert_eq!(names, vec!["a.json", "b.JSON"]);
    }
}
