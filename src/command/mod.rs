//! Natural-language command matching.
//!
//! Input is matched in two phases. Every registered pattern is first tried
//! as a case-insensitive regex search, in registration order. When none
//! hits, the input is scored against each command's examples and aliases
//! with [`similarity`], and parameters are pulled out by the generic
//! extractors in [`extract_common`].

mod help;
mod params;
mod parser;
mod pattern;
mod registry;
mod similarity;

pub use help::{command_help_text, general_help};
pub use params::{extract_common, validate_parameters};
pub use parser::{CommandParser, ParsedCommand, ParsedCommandView};
pub use pattern::{CommandError, CommandPattern, Operation, Params};
pub use registry::{
    CommandMatch, CommandRegistry, ALIAS_THRESHOLD, EXACT_CONFIDENCE, EXAMPLE_THRESHOLD,
};
pub use similarity::{sequence_ratio, similarity, WORD_BONUS};
