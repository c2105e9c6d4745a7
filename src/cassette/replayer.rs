//! Replays recorded interactions from a cassette.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Replays interactions from a loaded cassette, serving them in recorded
/// order per port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
    served: HashMap<(String, String), usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction.clone());
        }
        Self { queues, served: HashMap::new() }
    }

    /// Interactions not yet served, across all ports.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination. The message names what was requested and
    /// which pairs the cassette does have.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get_mut(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        };

        let served = self.served.entry(key).or_insert(0);
        let Some(interaction) = queue.pop_front() else {
            panic!(
                "Cassette exhausted: all {served} interactions for port={port:?} \
                 method={method:?} have been consumed."
            );
        };
        *served += 1;
        interaction
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, output: serde_json::Value) -> Interaction {
        Interaction { seq, port: port.into(), method: method.into(), input: json!(null), output }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            version: "0.1.0".into(),
            interactions,
        }
    }

    #[test]
    fn serves_each_port_in_recorded_order() {
        let cassette = make_cassette(vec![
            interaction(0, "clock", "now", json!("2025-01-01T00:00:00Z")),
            interaction(1, "issues", "create_issue", json!({"Ok": {"iid": 1}})),
            interaction(2, "issues", "create_issue", json!({"Ok": {"iid": 2}})),
            interaction(3, "clock", "now", json!("2025-01-01T00:00:05Z")),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);
        assert_eq!(replayer.remaining(), 4);

        assert_eq!(replayer.next_interaction("issues", "create_issue").seq, 1);
        assert_eq!(replayer.next_interaction("clock", "now").seq, 0);
        assert_eq!(replayer.next_interaction("issues", "create_issue").seq, 2);
        assert_eq!(replayer.next_interaction("clock", "now").output, json!("2025-01-01T00:00:05Z"));
        assert_eq!(replayer.remaining(), 0);
    }

    #[test]
    #[should_panic(expected = "all 1 interactions for port=\"llm\"")]
    fn exhausted_queue_panics_with_count() {
        let cassette = make_cassette(vec![interaction(0, "llm", "complete", json!({}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("llm", "complete");
        let _ = replayer.next_interaction("llm", "complete");
    }

    #[test]
    #[should_panic(expected = "Available port::method pairs: [clock::now]")]
    fn unknown_port_lists_available_pairs() {
        let cassette = make_cassette(vec![interaction(0, "clock", "now", json!(null))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("issues", "project_context");
    }
}
