//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (time, issue tracker, LLM). Implementations live in
//! `src/adapters/`.

pub mod clock;
pub mod issues;
pub mod llm;

pub use clock::Clock;
pub use issues::{CreatedIssue, IssueFuture, IssueTracker};
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
