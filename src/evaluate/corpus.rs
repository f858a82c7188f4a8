use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::core::model::{EvaluationReport, FileMetrics};
use crate::core::scoring::{aggregate, score_desired};
use crate::error::TaxsegError;
use crate::evaluate::ground_truth::{load_ground_truth, truth_path_for};
use crate::parser::DocumentOpener;
use crate::pipeline::{segment_document, PipelineConfig};

/// PDF files directly inside `dir`, sorted by name. The extension check is
/// case-insensitive.
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut pdfs = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list {}", dir.display()))?
            .path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Scores every PDF in a directory against its paired ground truth.
pub struct CorpusEvaluator<'a> {
    opener: &'a dyn DocumentOpener,
    config: &'a PipelineConfig,
    truth_dir: PathBuf,
    jobs: usize,
}

impl<'a> CorpusEvaluator<'a> {
    pub fn new(opener: &'a dyn DocumentOpener, config: &'a PipelineConfig, truth_dir: PathBuf) -> Self {
        Self {
            opener,
            config,
            truth_dir,
            jobs: 1,
        }
    }

    /// Number of documents evaluated concurrently. Values below 2 run
    /// sequentially.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Classifies one PDF and scores it against its ground truth.
    pub fn evaluate_document(&self, pdf: &Path) -> crate::error::Result<FileMetrics> {
        let truth_path = truth_path_for(&self.truth_dir, pdf)
            .filter(|path| path.is_file())
            .ok_or_else(|| TaxsegError::MissingGroundTruth {
                pdf: pdf.to_path_buf(),
            })?;

        let predicted = segment_document(self.opener, pdf, self.config)?;
        let truth = load_ground_truth(&truth_path)?;
        Ok(score_desired(&predicted, &truth, &self.config.desired))
    }

    /// Returns `None` when the directory holds no PDFs.
    pub fn evaluate_dir(&self, pdf_dir: &Path) -> Result<Option<EvaluationReport>> {
        let pdfs = discover_pdfs(pdf_dir)?;
        if pdfs.is_empty() {
            warn!(dir = %pdf_dir.display(), "no PDF files found");
            return Ok(None);
        }
        info!(count = pdfs.len(), "found PDF files to evaluate");
        self.evaluate_files(&pdfs).map(Some)
    }

    pub fn evaluate_files(&self, pdfs: &[PathBuf]) -> Result<EvaluationReport> {
        let outcomes: Vec<(&PathBuf, crate::error::Result<FileMetrics>)> = if self.jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()
                .context("failed to start worker pool")?;
            pool.install(|| {
                pdfs.par_iter()
                    .map(|pdf| (pdf, self.evaluate_document(pdf)))
                    .collect()
            })
        } else {
            pdfs.iter()
                .map(|pdf| (pdf, self.evaluate_document(pdf)))
                .collect()
        };

        let mut per_file_results = BTreeMap::new();
        for (pdf, outcome) in outcomes {
            match outcome {
                Ok(metrics) => {
                    let name = pdf
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| pdf.display().to_string());
                    per_file_results.insert(name, metrics);
                }
                Err(err @ TaxsegError::MissingGroundTruth { .. }) => {
                    warn!("{err}. Skipping.");
                }
                Err(err) => {
                    error!("{err}. Skipping.");
                }
            }
        }

        Ok(EvaluationReport {
            overall_metrics: aggregate(per_file_results.values().copied()),
            per_file_results,
        })
    }
}
