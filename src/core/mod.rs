pub mod form_identifier;
pub mod geometry;
pub mod model;
pub mod scoring;
pub mod segment_builder;

pub use form_identifier::{FormPattern, FormRegistry};
pub use geometry::ClipRegion;
pub use model::{EvaluationReport, FileMetrics, FormSegment, FormType, OverallMetrics, PageLabel};
pub use scoring::{aggregate, score, score_desired, DesiredTypes};
pub use segment_builder::{build_segment_run, build_segments, GapObservation, SegmentBuilder, SegmentRun};
