use std::fs;
use std::path::{Path, PathBuf};

use crate::core::model::FormSegment;
use crate::error::{Result, TaxsegError};

/// Ground truth for `<basename>.pdf` lives in `<truth_dir>/<basename>.json`.
pub fn truth_path_for(truth_dir: &Path, pdf: &Path) -> Option<PathBuf> {
    let basename = pdf.file_stem()?;
    let mut name = basename.to_os_string();
    name.push(".json");
    Some(truth_dir.join(name))
}

/// Reads a JSON array of `{document_type, start_page, end_page}` records.
pub fn load_ground_truth(path: &Path) -> Result<Vec<FormSegment>> {
    let content = fs::read_to_string(path).map_err(|source| TaxsegError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ground_truth(&content).map_err(|source| TaxsegError::GroundTruthParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_ground_truth(content: &str) -> std::result::Result<Vec<FormSegment>, serde_json::Error> {
    serde_json::from_str(content)
}
