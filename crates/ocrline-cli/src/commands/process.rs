//! Process command - reconstruct lines from a single layout file.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use ocrline_core::{DocumentResult, PagePipeline};

use super::{format_document, load_config, read_document, OutputFormat, StrategyArg};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input layout JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Grouping strategy (overrides config)
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Expected line count per page, used to choose between strategies
    #[arg(short, long)]
    expected: Option<usize>,

    /// Print per-line diagnostics to stderr
    #[arg(long)]
    stats: bool,

    /// Skip words with malformed polygons instead of whole pages
    #[arg(long)]
    skip_bad_words: bool,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(strategy) = args.strategy {
        config.selection.strategy = strategy.into();
    }
    if args.expected.is_some() {
        config.selection.expected_line_count = args.expected;
    }
    if args.sequential {
        config.pipeline.parallel = false;
    }
    config.pipeline.skip_malformed_words |= args.skip_bad_words;
    config.pipeline.line_stats |= args.stats;

    info!("Processing file: {}", args.input.display());
    let document = read_document(&args.input).await?;

    let pipeline = PagePipeline::new(&config);
    let result = pipeline.process_document(&document.pages);

    report_problems(&result);
    if !result.is_complete() {
        eprintln!(
            "{} {} of {} pages skipped",
            style("⚠").yellow(),
            result.errors.len(),
            document.pages.len()
        );
    }
    if args.stats {
        print_stats(&result);
    }

    let output = format_document(&result, args.format)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        eprintln!(
            "{} {} lines written to {}",
            style("✓").green(),
            result.lines.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Print skipped pages and words to stderr.
pub(crate) fn report_problems(result: &DocumentResult) {
    for error in &result.errors {
        eprintln!("{} Skipped {}", style("⚠").yellow(), error);
    }
    for issue in result.word_issues() {
        eprintln!("{} Skipped {}", style("⚠").yellow(), issue);
    }
}

fn print_stats(result: &DocumentResult) {
    for page in &result.pages {
        let Some(stats) = &page.stats else { continue };

        eprintln!(
            "{} Page {} ({} via {})",
            style("ℹ").blue(),
            page.page_number.map_or(page.page_index + 1, |n| n as usize),
            page.lines.len(),
            page.selection.strategy
        );

        for (i, (line, s)) in page.lines.iter().zip(stats).enumerate() {
            eprintln!("  Line {}: {}", i + 1, line);
            eprintln!("    - Y range: {:.4} - {:.4}", s.min_center_y, s.max_center_y);
            eprintln!("    - Height range: {:.4} - {:.4}", s.min_height, s.max_height);
            eprintln!("    - Words: {}", s.word_count);
            if s.overlaps_previous {
                eprintln!("    {}", style("overlaps previous line").yellow());
            }
        }
    }
}
