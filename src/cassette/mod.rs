//! Cassettes: YAML files of recorded port interactions.
//!
//! A recording context wraps the live adapters and appends every call to a
//! [`recorder::CassetteRecorder`]; a replaying context serves the same calls
//! back through a [`replayer::CassetteReplayer`], one queue per port and
//! method.

pub mod format;
pub mod recorder;
pub mod replayer;
