//! Tables command - print analyzed tables as tab-separated grids.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use ocrline_core::{render_tables, TableGrid};

use super::read_document;

/// Arguments for the tables command.
#[derive(Args)]
pub struct TablesArgs {
    /// Input layout JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit grids as JSON instead of text blocks
    #[arg(long)]
    json: bool,
}

pub async fn run(args: TablesArgs) -> anyhow::Result<()> {
    let document = read_document(&args.input).await?;
    let grids: Vec<TableGrid> = document.tables.iter().map(TableGrid::from_raw).collect();
    info!("Rebuilt {} tables from {}", grids.len(), args.input.display());

    let output = if args.json {
        serde_json::to_string_pretty(&grids)? + "\n"
    } else {
        render_tables(&grids)
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &output).await?;
            eprintln!(
                "{} {} tables written to {}",
                style("✓").green(),
                grids.len(),
                path.display()
            );
        }
        None => print!("{}", output),
    }

    Ok(())
}
