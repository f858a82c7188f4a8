pub mod corpus;
pub mod ground_truth;

pub use corpus::{discover_pdfs, CorpusEvaluator};
pub use ground_truth::{load_ground_truth, truth_path_for};
