//! Task data model.
//!
//! `TaskSpec` is the unit every pipeline stage consumes and produces;
//! `ProcessingResult` wraps one run of the pipeline.

mod kind;
mod result;
mod task_spec;

pub use kind::{Category, ExtractionMethod, Priority, Size, TaskType};
pub use result::{IssueOutcome, ProcessingMetadata, ProcessingResult};
pub(crate) use task_spec::push_unique;
pub use task_spec::{TaskSpec, MAX_TITLE_CHARS};
