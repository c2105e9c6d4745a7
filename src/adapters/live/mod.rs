//! Live adapters for real external interactions.

pub mod clock;
pub mod issues;
pub mod llm;

pub use clock::{FixedClock, LiveClock};
pub use issues::GitLabIssueTracker;
pub use llm::LiveLlmClient;
