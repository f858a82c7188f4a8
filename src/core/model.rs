use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Short code for an IRS form or schedule, e.g. `f1040sc` for Schedule C.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormType(String);

impl FormType {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormType {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl From<String> for FormType {
    fn from(code: String) -> Self {
        Self(code)
    }
}

impl Borrow<str> for FormType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A contiguous, inclusive, 1-based page range occupied by one form.
///
/// Equality and hashing cover all three fields, so two segments only match
/// when type and both page bounds agree exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormSegment {
    pub document_type: FormType,
    pub start_page: u32,
    pub end_page: u32,
}

impl FormSegment {
    pub fn new(document_type: impl Into<FormType>, start_page: u32, end_page: u32) -> Self {
        debug_assert!(start_page <= end_page, "segment ends before it starts");
        Self {
            document_type: document_type.into(),
            start_page,
            end_page,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    pub fn contains(&self, page: u32) -> bool {
        (self.start_page..=self.end_page).contains(&page)
    }
}

/// Label assigned to one page, with the region text it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLabel {
    pub page: u32,
    pub label: Option<FormType>,
    pub region_text: String,
}

/// Exact-match counts for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    #[serde(rename = "tp")]
    pub true_positives: usize,
    #[serde(rename = "fp")]
    pub false_positives: usize,
    #[serde(rename = "fn")]
    pub false_negatives: usize,
}

impl FileMetrics {
    pub fn new(true_positives: usize, false_positives: usize, false_negatives: usize) -> Self {
        Self {
            true_positives,
            false_positives,
            false_negatives,
        }
    }
}

impl Add for FileMetrics {
    type Output = FileMetrics;

    fn add(self, rhs: Self) -> Self::Output {
        FileMetrics {
            true_positives: self.true_positives + rhs.true_positives,
            false_positives: self.false_positives + rhs.false_positives,
            false_negatives: self.false_negatives + rhs.false_negatives,
        }
    }
}

impl AddAssign for FileMetrics {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for FileMetrics {
    fn sum<I: Iterator<Item = FileMetrics>>(iter: I) -> Self {
        iter.fold(FileMetrics::default(), Add::add)
    }
}

impl<'a> Sum<&'a FileMetrics> for FileMetrics {
    fn sum<I: Iterator<Item = &'a FileMetrics>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Micro-averaged corpus metrics as reported. Ratios are rounded to four
/// decimals, counts are exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_true_positives: usize,
    pub total_false_positives: usize,
    pub total_false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub overall_metrics: OverallMetrics,
    pub per_file_results: BTreeMap<String, FileMetrics>,
}
