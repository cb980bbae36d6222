//! Status Sink
//!
//! Outbound notifications for whoever is watching a run: stage transitions,
//! the current speaker and the final outcome. The simulation works the same
//! with no observer attached.

use legis_events::Outcome;
use std::sync::Mutex;
use tracing::info;

use crate::contract::normalize::truncate_chars;
use crate::pipeline::StageName;

/// Characters of a speech forwarded to observers
pub const SPEECH_EXCERPT_CHARS: usize = 180;

pub trait StatusSink: Send + Sync {
    fn stage_started(&self, stage: StageName);
    fn stage_finished(&self, stage: StageName);
    fn speaker(&self, rep_id: &str, name: &str, excerpt: &str);
    fn outcome(&self, outcome: Outcome);
}

/// Shortened speech for observers.
pub fn speech_excerpt(speech: &str) -> String {
    truncate_chars(speech.trim(), SPEECH_EXCERPT_CHARS)
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn stage_started(&self, _stage: StageName) {}
    fn stage_finished(&self, _stage: StageName) {}
    fn speaker(&self, _rep_id: &str, _name: &str, _excerpt: &str) {}
    fn outcome(&self, _outcome: Outcome) {}
}

/// Forwards notifications to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingStatus;

impl StatusSink for TracingStatus {
    fn stage_started(&self, stage: StageName) {
        info!(target: "legis::status", %stage, "stage started");
    }

    fn stage_finished(&self, stage: StageName) {
        info!(target: "legis::status", %stage, "stage finished");
    }

    fn speaker(&self, rep_id: &str, name: &str, excerpt: &str) {
        info!(target: "legis::status", rep_id, name, excerpt, "speaking");
    }

    fn outcome(&self, outcome: Outcome) {
        info!(target: "legis::status", %outcome, "outcome");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    StageStarted(StageName),
    StageFinished(StageName),
    Speaker { rep_id: String, name: String },
    Outcome(Outcome),
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingStatus {
    events: Mutex<Vec<StatusEvent>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn push(&self, event: StatusEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

impl StatusSink for RecordingStatus {
    fn stage_started(&self, stage: StageName) {
        self.push(StatusEvent::StageStarted(stage));
    }

    fn stage_finished(&self, stage: StageName) {
        self.push(StatusEvent::StageFinished(stage));
    }

    fn speaker(&self, rep_id: &str, name: &str, _excerpt: &str) {
        self.push(StatusEvent::Speaker {
            rep_id: rep_id.to_string(),
            name: name.to_string(),
        });
    }

    fn outcome(&self, outcome: Outcome) {
        self.push(StatusEvent::Outcome(outcome));
    }
}
