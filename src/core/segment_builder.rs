use serde::Serialize;

use crate::core::model::{FormSegment, FormType};

/// Unlabeled pages that sat between two different forms when the first one
/// was closed. They end up inside the earlier segment; callers log these so
/// the affected documents can be checked by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GapObservation {
    pub closed: FormType,
    pub next: FormType,
    pub first_gap_page: u32,
    pub last_gap_page: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentRun {
    pub segments: Vec<FormSegment>,
    pub gaps: Vec<GapObservation>,
}

#[derive(Debug, Clone)]
struct OpenSegment {
    label: FormType,
    start_page: u32,
    last_labeled_page: u32,
}

/// Stitches a document's per-page labels into contiguous form segments.
///
/// A labeled page that differs from the open segment closes it on the
/// preceding page and opens a new one. Unlabeled pages neither close nor
/// open anything. Whatever is still open at the end runs to the last page.
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    current: Option<OpenSegment>,
    run: SegmentRun,
    last_page: u32,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next page. Page numbers start at 1 and must increase.
    pub fn push(&mut self, page: u32, label: Option<FormType>) {
        debug_assert!(page > self.last_page, "pages must arrive in increasing order");
        self.last_page = page;

        let Some(label) = label else {
            return;
        };

        match &mut self.current {
            Some(open) if open.label == label => {
                open.last_labeled_page = page;
            }
            _ => {
                if let Some(closed) = self.current.take() {
                    self.close(closed, page - 1, Some((&label, page)));
                }
                self.open(label, page);
            }
        }
    }

    /// Closes any open segment on the last page seen and returns the result.
    pub fn finish(mut self) -> SegmentRun {
        if let Some(open) = self.current.take() {
            let last_page = self.last_page;
            self.close(open, last_page, None);
        }
        self.run
    }

    fn open(&mut self, label: FormType, page: u32) {
        self.current = Some(OpenSegment {
            label,
            start_page: page,
            last_labeled_page: page,
        });
    }

    fn close(&mut self, open: OpenSegment, end_page: u32, next: Option<(&FormType, u32)>) {
        if let Some((next_label, next_page)) = next {
            if open.last_labeled_page + 1 < next_page {
                self.run.gaps.push(GapObservation {
                    closed: open.label.clone(),
                    next: next_label.clone(),
                    first_gap_page: open.last_labeled_page + 1,
                    last_gap_page: next_page - 1,
                });
            }
        }
        self.run
            .segments
            .push(FormSegment::new(open.label, open.start_page, end_page));
    }
}

/// Builds segments from `(page_number, label)` pairs in page order.
pub fn build_segments<I>(labels: I) -> Vec<FormSegment>
where
    I: IntoIterator<Item = (u32, Option<FormType>)>,
{
    build_segment_run(labels).segments
}

pub fn build_segment_run<I>(labels: I) -> SegmentRun
where
    I: IntoIterator<Item = (u32, Option<FormType>)>,
{
    let mut builder = SegmentBuilder::new();
    for (page, label) in labels {
        builder.push(page, label);
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn stream(labels: &[Option<&str>]) -> Vec<(u32, Option<FormType>)> {
        labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (idx as u32 + 1, label.map(FormType::from)))
            .collect()
    }

    #[test]
    fn boundary_split() {
        let segments = build_segments(stream(&[Some("A"), Some("A"), Some("B"), Some("B")]));
        assert_eq!(
            segments,
            vec![FormSegment::new("A", 1, 2), FormSegment::new("B", 3, 4)]
        );
    }

    #[test]
    fn unlabeled_page_does_not_split_a_run() {
        let segments = build_segments(stream(&[Some("A"), Some("A"), None, Some("A")]));
        assert_eq!(segments, vec![FormSegment::new("A", 1, 4)]);
    }

    #[test]
    fn leading_unlabeled_pages_are_skipped() {
        let segments = build_segments(stream(&[None, None, Some("A"), Some("A")]));
        assert_eq!(segments, vec![FormSegment::new("A", 3, 4)]);
    }

    #[test]
    fn trailing_unlabeled_pages_extend_last_segment() {
        let segments = build_segments(stream(&[Some("A"), Some("B"), None, None]));
        assert_eq!(
            segments,
            vec![FormSegment::new("A", 1, 1), FormSegment::new("B", 2, 4)]
        );
    }

    #[test]
    fn no_labels_yield_no_segments() {
        assert!(build_segments(stream(&[None, None, None])).is_empty());
        assert!(build_segments(Vec::new()).is_empty());
    }

    #[test]
    fn returning_form_starts_a_new_segment() {
        let segments = build_segments(stream(&[Some("A"), Some("B"), Some("A")]));
        assert_eq!(
            segments,
            vec![
                FormSegment::new("A", 1, 1),
                FormSegment::new("B", 2, 2),
                FormSegment::new("A", 3, 3),
            ]
        );
    }

    #[test]
    fn gap_between_different_forms_is_reported() {
        let run = build_segment_run(stream(&[Some("A"), None, None, Some("B")]));
        assert_eq!(
            run.segments,
            vec![FormSegment::new("A", 1, 3), FormSegment::new("B", 4, 4)]
        );
        assert_eq!(
            run.gaps,
            vec![GapObservation {
                closed: "A".into(),
                next: "B".into(),
                first_gap_page: 2,
                last_gap_page: 3,
            }]
        );
    }

    #[test]
    fn gap_inside_same_form_is_not_reported() {
        let run = build_segment_run(stream(&[Some("A"), None, Some("A"), Some("B")]));
        assert!(run.gaps.is_empty());
        assert_eq!(run.segments[0], FormSegment::new("A", 1, 3));
    }

    fn label_strategy() -> impl Strategy<Value = Vec<Option<u8>>> {
        prop::collection::vec(prop::option::of(0u8..4), 0..40)
    }

    proptest! {
        #[test]
        fn segments_are_ordered_disjoint_and_cover_labels(labels in label_strategy()) {
            let input: Vec<(u32, Option<FormType>)> = labels
                .iter()
                .enumerate()
                .map(|(idx, l)| (idx as u32 + 1, l.map(|n| FormType::new(format!("L{n}")))))
                .collect();
            let segments = build_segments(input.clone());

            for segment in &segments {
                prop_assert!(segment.start_page <= segment.end_page);
            }
            for pair in segments.windows(2) {
                prop_assert!(pair[0].end_page < pair[1].start_page);
            }
            for (page, label) in &input {
                if let Some(label) = label {
                    let owners: Vec<_> = segments.iter().filter(|s| s.contains(*page)).collect();
                    prop_assert_eq!(owners.len(), 1);
                    prop_assert_eq!(&owners[0].document_type, label);
                }
            }
            prop_assert_eq!(build_segments(input), segments);
        }
    }
}
