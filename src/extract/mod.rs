//! The pattern pipeline: analyze → extract → enrich → order → payload.
//!
//! Every stage here is synchronous and infallible. Pattern tables are
//! compiled once from a [`Vocabulary`] and shared by reference.

mod analyzer;
mod enrich;
mod extractor;
mod order;
mod payload;
mod title;
mod vocabulary;

pub use analyzer::{Analysis, PatternAnalyzer, TaskIndicator};
pub use enrich::{
    jaccard, ContextEnricher, ExistingIssue, Milestone, ProjectContext, TeamMember,
    RELATED_ISSUE_THRESHOLD,
};
pub use extractor::{
    categorize, TaskExtractor, FALLBACK_CONFIDENCE, FALLBACK_MIN_CHARS, MIN_CANDIDATE_CHARS,
};
pub use order::{order_by_dependencies, DependencyOrder, DroppedEdge};
pub use payload::IssuePayload;
pub use title::{clamp_title, describe_with_context, generate_title, normalize_phrase};
pub use vocabulary::{KeywordGroup, NamedPattern, PatternError, PatternTable, Vocabulary};
