//! Replaying adapters that serve recorded interactions.
//!
//! All adapters of one context share a single [`CassetteReplayer`]; the
//! replayer keeps a separate queue per port and method, so call order only
//! matters within one method.

pub mod clock;
pub mod issues;
pub mod llm;

pub use clock::ReplayingClock;
pub use issues::ReplayingIssueTracker;
pub use llm::ReplayingLlmClient;

use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Replayer shared by all adapters of one context.
pub type SharedReplayer = Arc<Mutex<CassetteReplayer>>;

/// Output of the next recorded `port::method` call.
///
/// # Panics
///
/// Panics if the cassette has no more interactions for the pair.
pub(crate) fn next_output(replayer: &SharedReplayer, port: &str, method: &str) -> serde_json::Value {
    replayer.lock().unwrap_or_else(PoisonError::into_inner).next_interaction(port, method).output
}

/// Decodes an output recorded with the `{"Ok": v}` / `{"Err": msg}`
/// convention.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, Box<dyn Error + Send + Sync>> {
    match output {
        serde_json::Value::Object(mut map) => {
            if let Some(ok) = map.remove("Ok") {
                return serde_json::from_value(ok)
                    .map_err(|e| format!("Cassette holds an unreadable Ok value: {e}").into());
            }
            match map.remove("Err") {
                Some(serde_json::Value::String(message)) => Err(message.into()),
                Some(other) => Err(other.to_string().into()),
                None => Err("Cassette output has neither Ok nor Err".into()),
            }
        }
        other => Err(format!("Cassette output is not a Result: {other}").into()),
    }
}
