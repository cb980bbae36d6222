//! Event Types
//!
//! Interaction events emitted by the deliberation stages. Each event renders
//! to exactly one line of the persisted interaction log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary interaction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Two representatives introduced during the networking session
    Meet,
    /// A committee member's turn
    CommitteeTurn,
    /// A representative named someone they intend to lobby
    LobbyIntent,
    /// A persuasion message delivered before the floor debate
    Persuasion,
    /// The bill advocate's opening turn
    AdvocateTurn,
    /// A sampled floor speaker's turn
    FloorTurn,
    /// Threshold or popular-vote decision
    Decision,
    /// A drafted bill revision
    Revision,
}

impl EventKind {
    /// Returns all event kind variants.
    pub fn all() -> &'static [EventKind] {
        &[
            EventKind::Meet,
            EventKind::CommitteeTurn,
            EventKind::LobbyIntent,
            EventKind::Persuasion,
            EventKind::AdvocateTurn,
            EventKind::FloorTurn,
            EventKind::Decision,
            EventKind::Revision,
        ]
    }
}

/// A single logged interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Emission order within the run, starting at 1
    pub sequence: u64,
    /// Name of the stage that emitted the event
    pub stage: String,
    pub kind: EventKind,
    /// Human-readable line, written verbatim to the interaction log
    pub text: String,
}

impl InteractionEvent {
    pub fn new(
        sequence: u64,
        stage: impl Into<String>,
        kind: EventKind,
        text: impl Into<String>,
    ) -> Self {
        Self {
            sequence,
            stage: stage.into(),
            kind,
            text: text.into(),
        }
    }
}

impl fmt::Display for InteractionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
