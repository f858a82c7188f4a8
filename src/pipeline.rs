use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::Config;
use crate::core::form_identifier::FormRegistry;
use crate::core::geometry::ClipRegion;
use crate::core::model::{FormSegment, PageLabel};
use crate::core::scoring::DesiredTypes;
use crate::core::segment_builder::{build_segment_run, SegmentRun};
use crate::error::TaxsegError;
use crate::parser::{DocumentOpener, PageTextSource};

/// Read-only settings shared by every document in a run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub registry: FormRegistry,
    pub desired: DesiredTypes,
    pub clip: ClipRegion,
}

impl PipelineConfig {
    pub fn new(registry: FormRegistry, desired: DesiredTypes, clip: ClipRegion) -> Self {
        Self {
            registry,
            desired,
            clip,
        }
    }

    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let registry = config.validate()?;
        Ok(Self::new(registry, config.desired_types(), config.clip))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(
            FormRegistry::irs_default(),
            DesiredTypes::default(),
            ClipRegion::default(),
        )
    }
}

/// Labels every page of `source` in order.
pub fn label_pages(source: &dyn PageTextSource, config: &PipelineConfig) -> Result<Vec<PageLabel>> {
    let page_count = source.page_count()?;
    let mut labels = Vec::with_capacity(page_count as usize);

    for page in 1..=page_count {
        let region_text = source
            .region_text(page, &config.clip)
            .with_context(|| format!("extracting text from page {page}"))?;
        let label = config.registry.identify(&region_text).cloned();
        debug!(page, label = ?label.as_ref().map(|l| l.as_str()), "labeled page");
        labels.push(PageLabel {
            page,
            label,
            region_text,
        });
    }

    Ok(labels)
}

/// Every recognised form in the document, scored or not.
pub fn find_tax_forms(source: &dyn PageTextSource, config: &PipelineConfig) -> Result<SegmentRun> {
    let labels = label_pages(source, config)?;
    Ok(build_segment_run(
        labels.into_iter().map(|page| (page.page, page.label)),
    ))
}

/// Segments of desired types only, as printed in single-document mode and
/// compared against ground truth.
pub fn desired_forms(
    source: &dyn PageTextSource,
    config: &PipelineConfig,
    document: &str,
) -> Result<Vec<FormSegment>> {
    let run = find_tax_forms(source, config)?;
    report_gaps(&run, document);
    Ok(config.desired.filter(&run.segments))
}

/// Opens `path` and returns its desired form segments. Any failure to open or
/// read the document is reported as [`TaxsegError::DocumentOpen`].
pub fn segment_document(
    opener: &dyn DocumentOpener,
    path: &Path,
    config: &PipelineConfig,
) -> crate::error::Result<Vec<FormSegment>> {
    let document = path.display().to_string();
    opener
        .open(path)
        .and_then(|source| desired_forms(source.as_ref(), config, &document))
        .map_err(|err| TaxsegError::document_open(path, &err))
}

fn report_gaps(run: &SegmentRun, document: &str) {
    for gap in &run.gaps {
        warn!(
            document,
            closed = %gap.closed,
            next = %gap.next,
            first_gap_page = gap.first_gap_page,
            last_gap_page = gap.last_gap_page,
            "unlabeled pages between two different forms were kept in the earlier form"
        );
    }
}
