pub mod config;
pub mod core;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod parser;
pub mod pipeline;

pub use config::Config;
pub use crate::core::model::{EvaluationReport, FileMetrics, FormSegment, FormType, OverallMetrics};
pub use error::TaxsegError;
pub use pipeline::PipelineConfig;
