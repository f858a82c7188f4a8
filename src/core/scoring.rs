use std::collections::HashSet;

use crate::core::model::{FileMetrics, FormSegment, FormType, OverallMetrics};

/// Form types that are actually scored. Everything else the registry knows
/// about only exists to find boundaries and is dropped before scoring.
pub const DEFAULT_DESIRED_TYPES: &[&str] = &[
    "f1040s1", "f1040s3", "f1040sa", "f1040sb", "f1040sc", "f1040sd", "f1040se", "1040f", "f8889",
    "f8949",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredTypes {
    types: HashSet<FormType>,
}

impl DesiredTypes {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FormType>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, form_type: &FormType) -> bool {
        self.types.contains(form_type)
    }

    /// Keeps only segments of a desired type, preserving order.
    pub fn filter<'a, I>(&self, segments: I) -> Vec<FormSegment>
    where
        I: IntoIterator<Item = &'a FormSegment>,
    {
        segments
            .into_iter()
            .filter(|segment| self.contains(&segment.document_type))
            .cloned()
            .collect()
    }
}

impl Default for DesiredTypes {
    fn default() -> Self {
        Self::new(DEFAULT_DESIRED_TYPES.iter().copied())
    }
}

/// Exact-match comparison of one document's segments.
///
/// Both sides collapse to sets first, so a repeated segment counts once.
pub fn score(predicted: &[FormSegment], truth: &[FormSegment]) -> FileMetrics {
    let predicted: HashSet<&FormSegment> = predicted.iter().collect();
    let truth: HashSet<&FormSegment> = truth.iter().collect();

    FileMetrics {
        true_positives: predicted.intersection(&truth).count(),
        false_positives: predicted.difference(&truth).count(),
        false_negatives: truth.difference(&predicted).count(),
    }
}

/// Drops undesired types from both sides, then scores.
pub fn score_desired(
    predicted: &[FormSegment],
    truth: &[FormSegment],
    desired: &DesiredTypes,
) -> FileMetrics {
    score(&desired.filter(predicted), &desired.filter(truth))
}

/// Ratios that return 0.0 instead of NaN on an empty denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratios {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Ratios {
    pub fn from_counts(totals: FileMetrics) -> Self {
        let tp = totals.true_positives as f64;
        let precision = safe_div(tp, tp + totals.false_positives as f64);
        let recall = safe_div(tp, tp + totals.false_negatives as f64);
        let f1 = safe_div(2.0 * precision * recall, precision + recall);
        Self {
            precision,
            recall,
            f1,
        }
    }
}

fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Rounds to four decimals from the exact binary value, ties to even.
fn round4(value: f64) -> f64 {
    format!("{value:.4}").parse().unwrap_or(value)
}

/// Micro-averages per-document counts: sum first, then compute ratios.
pub fn aggregate<I>(per_file: I) -> OverallMetrics
where
    I: IntoIterator<Item = FileMetrics>,
{
    let totals: FileMetrics = per_file.into_iter().sum();
    let ratios = Ratios::from_counts(totals);
    OverallMetrics {
        total_true_positives: totals.true_positives,
        total_false_positives: totals.false_positives,
        total_false_negatives: totals.false_negatives,
        precision: round4(ratios.precision),
        recall: round4(ratios.recall),
        f1_score: round4(ratios.f1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seg(t: &str, start: u32, end: u32) -> FormSegment {
        FormSegment::new(t, start, end)
    }

    #[test]
    fn exact_match_is_a_true_positive() {
        let metrics = score(&[seg("X", 1, 3)], &[seg("X", 1, 3)]);
        assert_eq!(metrics, FileMetrics::new(1, 0, 0));
    }

    #[test]
    fn partial_overlap_earns_nothing() {
        let metrics = score(&[seg("X", 1, 3)], &[seg("X", 1, 4)]);
        assert_eq!(metrics, FileMetrics::new(0, 1, 1));
    }

    #[test]
    fn wrong_type_on_same_pages_misses() {
        let metrics = score(&[seg("X", 1, 3)], &[seg("Y", 1, 3)]);
        assert_eq!(metrics, FileMetrics::new(0, 1, 1));
    }

    #[test]
    fn duplicate_predictions_count_once() {
        let metrics = score(
            &[seg("X", 1, 3), seg("X", 1, 3), seg("Y", 4, 4), seg("Y", 4, 4)],
            &[seg("X", 1, 3)],
        );
        assert_eq!(metrics, FileMetrics::new(1, 1, 0));
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(score(&[], &[]), FileMetrics::default());
        assert_eq!(score(&[], &[seg("X", 1, 1)]), FileMetrics::new(0, 0, 1));
    }

    #[test]
    fn undesired_types_are_ignored_on_both_sides() {
        let desired = DesiredTypes::new(["1040f"]);
        let predicted = [seg("1040f", 1, 2), seg("f8879", 3, 3)];
        let truth = [seg("1040f", 1, 2), seg("f2441", 4, 5)];
        assert_eq!(
            score_desired(&predicted, &truth, &desired),
            FileMetrics::new(1, 0, 0)
        );
    }

    #[test]
    fn default_allow_list_excludes_boundary_only_forms() {
        let desired = DesiredTypes::default();
        assert_eq!(desired.types.len(), 10);
        assert!(desired.contains(&"f1040sc".into()));
        assert!(!desired.contains(&"f1040s2".into()));
        assert!(!desired.contains(&"f8879".into()));
    }

    #[test]
    fn micro_average_over_two_documents() {
        let overall = aggregate([FileMetrics::new(2, 1, 0), FileMetrics::new(0, 0, 3)]);
        assert_eq!(
            overall,
            OverallMetrics {
                total_true_positives: 2,
                total_false_positives: 1,
                total_false_negatives: 3,
                precision: 0.6667,
                recall: 0.4,
                f1_score: 0.5,
            }
        );
    }

    #[test]
    fn exact_ties_round_to_even() {
        // 1/32 = 0.03125 is exact in binary, so the fifth decimal is a true tie.
        let overall = aggregate([FileMetrics::new(1, 31, 0)]);
        assert_eq!(overall.precision, 0.0312);
        assert_eq!(overall.recall, 1.0);
        assert_eq!(overall.f1_score, 0.0606);
        assert_eq!(round4(0.625), 0.625);
        assert_eq!(round4(0.666_66), 0.6667);
    }

    #[test]
    fn zero_counts_do_not_divide_by_zero() {
        let overall = aggregate(std::iter::empty());
        assert_eq!(overall.precision, 0.0);
        assert_eq!(overall.recall, 0.0);
        assert_eq!(overall.f1_score, 0.0);

        let ratios = Ratios::from_counts(FileMetrics::new(0, 4, 2));
        assert_eq!(ratios.f1, 0.0);
        assert!(!ratios.precision.is_nan());
    }

    #[test]
    fn aggregation_is_order_independent() {
        let files = [
            FileMetrics::new(3, 0, 1),
            FileMetrics::new(0, 2, 0),
            FileMetrics::new(5, 1, 1),
        ];
        let forward = aggregate(files);
        let mut reversed = files;
        reversed.reverse();
        assert_eq!(aggregate(reversed), forward);
    }
}
