//! Agent Memory
//!
//! Each politician keeps a short rolling summary of its own turns. The social
//! section is rendered from the shared graph at prompt time so it always
//! reflects the latest interactions.

use std::collections::VecDeque;

use crate::components::SocialGraph;
use crate::contract::AgentOutput;

/// Rolling summary lines kept per politician
pub const ROLLING_SUMMARY_CAPACITY: usize = 8;

/// Per-politician memory of past turns.
#[derive(Debug, Clone)]
pub struct TurnMemory {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for TurnMemory {
    fn default() -> Self {
        Self::with_capacity(ROLLING_SUMMARY_CAPACITY)
    }
}

impl TurnMemory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Remember the stance and headline reason of a completed turn.
    pub fn update_from_turn(&mut self, output: &AgentOutput) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines
            .push_back(format!("- {}: {}", output.stance(), output.headline_reason()));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        let mut text = String::from("ROLLING_SUMMARY:\n");
        if self.lines.is_empty() {
            text.push_str("(no turns yet)");
        } else {
            text.push_str(&self.lines.iter().cloned().collect::<Vec<_>>().join("\n"));
        }
        text
    }
}

/// Committee membership and known colleagues, most recent first.
pub fn render_social_memory(
    social: &SocialGraph,
    self_id: &str,
    committee_name: &str,
    committee_id: &str,
    limit: usize,
) -> String {
    let mut text = String::from("SOCIAL_MEMORY:\nYOUR_COMMITTEE: ");
    if committee_name.trim().is_empty() {
        text.push_str("(unknown)");
    } else {
        text.push_str(committee_name.trim());
        if !committee_id.trim().is_empty() {
            text.push_str(&format!(" ({})", committee_id.trim()));
        }
    }
    text.push('\n');

    let relationships = social.relationships_for(self_id);
    if relationships.is_empty() {
        text.push_str("KNOWN_REPS: (none)");
        return text;
    }

    text.push_str("KNOWN_REPS (most recent first):");
    for rel in relationships.into_iter().take(limit) {
        let committee = if rel.other_committee_name.trim().is_empty() {
            "committee unknown"
        } else {
            rel.other_committee_name.as_str()
        };
        text.push_str(&format!(
            "\n- {} ({}), met {}x, lobbied {}x",
            rel.other_name, committee, rel.times_met, rel.times_lobbied
        ));
        if let Some(kind) = rel.last_interaction {
            text.push_str(&format!(", last={}", kind.as_str()));
        }
    }
    text
}
