//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::adapters::live::{GitLabIssueTracker, LiveClock, LiveLlmClient};
use crate::adapters::recording::{
    RecordingClock, RecordingIssueTracker, RecordingLlmClient, SharedRecorder,
};
use crate::adapters::replaying::{ReplayingClock, ReplayingIssueTracker, ReplayingLlmClient};
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Config;
use crate::ports::{Clock, IssueTracker, LlmClient};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations (live,
/// recording, replaying); the pipeline only ever sees the traits.
pub struct ServiceContext {
    /// Clock for run timestamps.
    pub clock: Box<dyn Clock>,
    /// Issue tracker for creating issues and reading project context.
    pub issues: Box<dyn IssueTracker>,
    /// LLM client for the AI analysis path.
    pub llm: Box<dyn LlmClient>,
    /// Cassette recorder; written to disk on drop.
    recorder: Option<SharedRecorder>,
}

type LivePorts = (Box<dyn Clock>, Box<dyn IssueTracker>, Box<dyn LlmClient>);

fn live_ports(config: &Config) -> LivePorts {
    (
        Box::new(LiveClock),
        Box::new(GitLabIssueTracker::new(&config.gitlab_url, config.gitlab_token.clone())),
        Box::new(LiveLlmClient::new(config.anthropic_api_key.clone())),
    )
}

impl ServiceContext {
    /// Creates a context from explicit adapters, without recording.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>, issues: Box<dyn IssueTracker>, llm: Box<dyn LlmClient>) -> Self {
        Self { clock, issues, llm, recorder: None }
    }

    /// Creates a live context talking to GitLab and Anthropic as configured.
    #[must_use]
    pub fn live(config: &Config) -> Self {
        let (clock, issues, llm) = live_ports(config);
        Self::new(clock, issues, llm)
    }

    /// Creates a live context that records every port call and writes the
    /// cassette to `path` when dropped.
    #[must_use]
    pub fn recording(config: &Config, path: &Path) -> Self {
        let (clock, issues, llm) = live_ports(config);
        let recorder: SharedRecorder =
            Arc::new(Mutex::new(CassetteRecorder::new(path, "glt-session")));
        Self {
            clock: Box::new(RecordingClock::new(clock, Arc::clone(&recorder))),
            issues: Box::new(RecordingIssueTracker::new(issues, Arc::clone(&recorder))),
            llm: Box::new(RecordingLlmClient::new(llm, Arc::clone(&recorder))),
            recorder: Some(recorder),
        }
    }

    /// Creates a context from the environment: recording when `GLT_RECORD`
    /// is set, live otherwise.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        match &config.record_path {
            Some(path) => Self::recording(config, path),
            None => Self::live(config),
        }
    }

    /// Creates a context serving every port from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        Ok(Self::from_cassette(&Cassette::load(path)?))
    }

    /// Creates a context serving every port from an in-memory cassette.
    #[must_use]
    pub fn from_cassette(cassette: &Cassette) -> Self {
        let replayer = Arc::new(Mutex::new(CassetteReplayer::new(cassette)));
        Self {
            clock: Box::new(ReplayingClock::new(Arc::clone(&replayer))),
            issues: Box::new(ReplayingIssueTracker::new(Arc::clone(&replayer))),
            llm: Box::new(ReplayingLlmClient::new(replayer)),
            recorder: None,
        }
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(shared) = self.recorder.take() else {
            return;
        };
        let recorder = shared.lock().unwrap_or_else(PoisonError::into_inner);
        match recorder.write() {
            Ok(path) => {
                info!(path = %path.display(), interactions = recorder.len(), "cassette written");
            }
            Err(err) => {
                warn!(path = %recorder.path().display(), error = %err, "failed to write cassette");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cassette::format::Interaction;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!(null), output }
    }

    #[tokio::test]
    async fn replaying_context_serves_all_ports() {
        let cassette = Cassette {
            name: "ctx".into(),
            recorded_at: Utc::now(),
            version: String::new(),
            interactions: vec![
                interaction(0, "clock", "now", json!("2024-06-15T10:30:00Z")),
                interaction(
                    1,
                    "issues",
                    "project_context",
                    json!({"Ok": {"milestones": [{"title": "v1"}]}}),
                ),
                interaction(2, "llm", "complete", json!({"Err": "overloaded"})),
            ],
        };
        let ctx = ServiceContext::from_cassette(&cassette);

        assert_eq!(ctx.clock.now().to_rfc3339(), "2024-06-15T10:30:00+00:00");
        let context = ctx.issues.project_context("42").await.unwrap();
        assert_eq!(context.milestones[0].title, "v1");
        let request = crate::ports::CompletionRequest {
            model: "m".into(),
            system: None,
            prompt: "p".into(),
            max_tokens: 1,
        };
        assert_eq!(ctx.llm.complete(&request).await.unwrap_err().to_string(), "overloaded");
    }

    #[test]
    fn recording_context_writes_cassette_on_drop() {
        let dir = std::env::temp_dir().join(format!("glt_ctx_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.cassette.yaml");

        {
            let ctx = ServiceContext::recording(&Config::default(), &path);
            let _ = ctx.clock.now();
        }

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "glt-session");
        assert_eq!(cassette.interactions.len(), 1);
        assert_eq!(cassette.interactions[0].port, "clock");

        let replayed = ServiceContext::replaying(&path).unwrap();
        let _ = replayed.clock.now();

        let _ = std::fs::remove_dir_all(&dir);
    }
}
