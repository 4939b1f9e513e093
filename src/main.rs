use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sheet_normalizer::config::NormalizerConfig;
use sheet_normalizer::pipeline::{FileOutcome, FolderPipeline, RunReport};
use sheet_normalizer::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let outcome = init_logging().and_then(|()| run(cli));
    match outcome {
        Ok(report) if report.has_failures() => std::process::exit(1),
        Ok(_) => {}
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<RunReport> {
    match cli.command {
        Command::Normalize(args) => execute_normalize(args),
    }
}

fn execute_normalize(args: NormalizeArgs) -> Result<RunReport> {
    let mut config = match &args.config {
        Some(path) => NormalizerConfig::load(path)?,
        None => NormalizerConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
        config.validate()?;
    }

    let mut pipeline = FolderPipeline::new(config);
    let report = pipeline.run(&args.input)?;

    for file in &report.files {
        let name = file.source.display();
        match &file.outcome {
            FileOutcome::Accepted { sheets, .. } => {
                println!("accepted  {name} ({})", sheets.join(", "))
            }
            FileOutcome::Rejected { .. } => println!("rejected  {name}"),
            FileOutcome::Failed { error } => println!("failed    {name}: {error}"),
        }
    }
    println!(
        "{} accepted, {} rejected, {} failed",
        report.accepted(),
        report.rejected(),
        report.failed()
    );

    if let Some(path) = &args.report {
        report.write_json(path)?;
    }

    Ok(report)
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Normalize folders of spreadsheets onto a fixed column vocabulary."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize every .xlsx file in a folder.
    Normalize(NormalizeArgs),
}

#[derive(clap::Args)]
struct NormalizeArgs {
    /// Folder holding the spreadsheets to normalize.
    input: PathBuf,

    /// JSON file overriding the vocabulary, threshold, or output folder names.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum similarity score (0-100) for a column label to be renamed.
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    threshold: Option<u8>,

    /// Where to write the JSON run report.
    #[arg(long)]
    report: Option<PathBuf>,
}
