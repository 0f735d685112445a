pub mod error;
pub mod job;

pub use error::PipelineError;
pub use job::{Job, NullReporter, Operation, ProgressEvent, ProgressReporter, Strategy};
