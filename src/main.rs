use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use taxseg::config::Config;
use taxseg::core::model::FormSegment;
use taxseg::evaluate::CorpusEvaluator;
use taxseg::export::{Exporter, JsonExporter, OutputTarget};
use taxseg::parser::{DocumentOpener, PdfReader, PopplerOpener};
use taxseg::pipeline::{label_pages, segment_document, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "taxseg")]
#[command(version, about = "Split tax-return PDFs into IRS form page ranges and score them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file overriding the form registry, scored types or clip region
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write JSON results to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the form segments found in one PDF
    Parse {
        /// Input PDF file path
        input: PathBuf,
    },

    /// Score a directory of PDFs against ground-truth JSON files
    Evaluate {
        /// Directory containing the input PDF files
        pdf_dir: PathBuf,

        /// Directory containing <basename>.json ground-truth files
        ground_truth_dir: PathBuf,

        /// Documents to evaluate in parallel
        #[arg(short, long, default_value_t = 1)]
        jobs: usize,
    },

    /// Show the corner text and label of every page
    Pages {
        /// Input PDF file path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let pipeline = PipelineConfig::from_config(&config)?;
    let exporter = JsonExporter::new(match cli.output {
        Some(path) => OutputTarget::File(path),
        None => OutputTarget::Stdout,
    });

    match cli.command {
        Commands::Parse { input } => parse_single(&input, &pipeline, &exporter),
        Commands::Evaluate {
            pdf_dir,
            ground_truth_dir,
            jobs,
        } => evaluate_corpus(&pdf_dir, ground_truth_dir, jobs, &pipeline, &exporter),
        Commands::Pages { input } => show_pages(&input, &pipeline, &exporter),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn parse_single(input: &Path, pipeline: &PipelineConfig, exporter: &JsonExporter) -> Result<()> {
    info!(input = %input.display(), "processing");

    let segments: Vec<FormSegment> = match segment_document(&PopplerOpener, input, pipeline) {
        Ok(segments) => segments,
        Err(err) => {
            error!("{err}");
            Vec::new()
        }
    };
    if segments.is_empty() {
        warn!("no tax forms could be identified in the document");
    }

    exporter.export(&segments)
}

fn evaluate_corpus(
    pdf_dir: &Path,
    ground_truth_dir: PathBuf,
    jobs: usize,
    pipeline: &PipelineConfig,
    exporter: &JsonExporter,
) -> Result<()> {
    if !ground_truth_dir.is_dir() {
        anyhow::bail!(
            "ground truth directory does not exist: {}",
            ground_truth_dir.display()
        );
    }

    let opener: &dyn DocumentOpener = &PopplerOpener;
    let evaluator = CorpusEvaluator::new(opener, pipeline, ground_truth_dir).with_jobs(jobs);
    let report = evaluator
        .evaluate_dir(pdf_dir)
        .with_context(|| format!("failed to evaluate {}", pdf_dir.display()))?;

    match report {
        Some(report) => exporter.export(&report),
        None => exporter.export(&serde_json::json!({})),
    }
}

fn show_pages(input: &Path, pipeline: &PipelineConfig, exporter: &JsonExporter) -> Result<()> {
    let reader = PdfReader::new(input.to_path_buf())
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;
    let labels = label_pages(&reader, pipeline)
        .with_context(|| format!("Failed to read PDF: {}", input.display()))?;
    exporter.export(&labels)
}
