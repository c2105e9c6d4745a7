//! Recording adapters that capture interactions to cassettes.
//!
//! Each adapter delegates to an inner (usually live) implementation and
//! appends the call to a shared [`CassetteRecorder`]. Results use the
//! `{"Ok": value}` / `{"Err": message}` convention the replaying adapters
//! read back.

pub mod clock;
pub mod issues;
pub mod llm;

pub use clock::RecordingClock;
pub use issues::RecordingIssueTracker;
pub use llm::RecordingLlmClient;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Recorder shared by all adapters of one context.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;

fn to_json<T: Serialize>(value: &T, port: &str, method: &str) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        warn!(port, method, error = %err, "cannot serialize interaction for the cassette");
        serde_json::Value::Null
    })
}

fn push(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: serde_json::Value,
    output: serde_json::Value,
) {
    recorder.lock().unwrap_or_else(PoisonError::into_inner).record(port, method, input, output);
}

/// Record an interaction with a plain (non-`Result`) return value.
pub(crate) fn record_interaction<I, O>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    output: &O,
) where
    I: Serialize,
    O: Serialize,
{
    let input = to_json(input, port, method);
    let output = to_json(output, port, method);
    push(recorder, port, method, input, output);
}

/// Record a `Result` interaction: `Ok(v)` as `{"Ok": v}`, `Err(e)` as
/// `{"Err": e.to_string()}`.
pub(crate) fn record_result<T, E, I>(
    recorder: &SharedRecorder,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let input = to_json(input, port, method);
    let output = match result {
        Ok(v) => serde_json::json!({ "Ok": to_json(v, port, method) }),
        Err(e) => serde_json::json!({ "Err": e.to_string() }),
    };
    push(recorder, port, method, input, output);
}
