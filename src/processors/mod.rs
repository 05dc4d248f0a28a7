pub mod attempt;
pub mod batch_runner;
pub mod bias;
pub mod location_extractor;

pub use attempt::{first_success, AttemptRecord, AttemptStatus, FirstSuccess};
pub use batch_runner::{BatchRunner, BatchSummary};
pub use location_extractor::LocationExtractor;
