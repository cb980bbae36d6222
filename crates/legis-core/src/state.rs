//! Simulation State
//!
//! The single mutable record every stage reads and writes. Fields are typed;
//! there is no string-keyed side channel.

use legis_events::{EventKind, Outcome, VoteResult};
use std::collections::{BTreeMap, VecDeque};

use crate::components::Bill;
use crate::contract::{AgentOutput, JudgeDecision, RevisionDraft};
use crate::events::{InteractionLog, RelationshipLog};
use crate::pipeline::StageName;

/// Peer statements retained for prompts
pub const PEER_LOG_CAPACITY: usize = 30;

/// Lobbyist name to persuasion note. One entry per lobbyist; later messages
/// from the same lobbyist replace earlier ones.
pub type Inbox = BTreeMap<String, String>;

/// Bounded log of recent peer statements, oldest first.
#[derive(Debug, Clone)]
pub struct PeerReasoningLog {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for PeerReasoningLog {
    fn default() -> Self {
        Self::with_capacity(PEER_LOG_CAPACITY)
    }
}

impl PeerReasoningLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append, evicting the oldest entry once full.
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        if entry.trim().is_empty() {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Up to `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<&str> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Outputs of the most recent deliberation stage, in speaking order.
#[derive(Debug, Clone, Default)]
pub struct TurnOutputs {
    entries: Vec<(String, AgentOutput)>,
}

impl TurnOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a representative's output, keeping first position.
    pub fn insert(&mut self, rep_id: impl Into<String>, output: AgentOutput) {
        let rep_id = rep_id.into();
        match self.entries.iter_mut().find(|(id, _)| *id == rep_id) {
            Some(entry) => entry.1 = output,
            None => self.entries.push((rep_id, output)),
        }
    }

    pub fn get(&self, rep_id: &str) -> Option<&AgentOutput> {
        self.entries
            .iter()
            .find(|(id, _)| id == rep_id)
            .map(|(_, output)| output)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AgentOutput)> {
        self.entries.iter().map(|(id, output)| (id.as_str(), output))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_vote_result(&self) -> VoteResult {
        self.iter()
            .map(|(id, output)| (id, output.vote_intent()))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub bill: Bill,
    pub facts_pack: String,
    pub selected_agency_id: Option<String>,
    pub judge_decision: Option<JudgeDecision>,
    /// Committee recap, kept separately so the floor can start from it
    pub committee_summary: String,
    pub floor_summary: String,
    pub last_turn_outputs: TurnOutputs,
    pub vote_result: Option<VoteResult>,
    pub final_outcome: Option<Outcome>,
    /// Set by a stage to request a loop-back; consumed by the executor
    pub rerun_from: Option<StageName>,
    /// Loop-backs the executor has honored so far
    pub revisions_taken: u32,
    pub revision: Option<RevisionDraft>,
    pub peer_reasoning: PeerReasoningLog,
    /// Recipient rep id to inbox
    pub direct_messages: BTreeMap<String, Inbox>,
    interactions: InteractionLog,
    relationships: RelationshipLog,
}

impl SimulationState {
    pub fn new(bill: Bill) -> Self {
        Self {
            bill,
            facts_pack: String::new(),
            selected_agency_id: None,
            judge_decision: None,
            committee_summary: String::new(),
            floor_summary: String::new(),
            last_turn_outputs: TurnOutputs::new(),
            vote_result: None,
            final_outcome: None,
            rerun_from: None,
            revisions_taken: 0,
            revision: None,
            peer_reasoning: PeerReasoningLog::default(),
            direct_messages: BTreeMap::new(),
            interactions: InteractionLog::new(),
            relationships: RelationshipLog::new(),
        }
    }

    pub fn with_facts_pack(mut self, facts_pack: impl Into<String>) -> Self {
        self.facts_pack = facts_pack.into();
        self
    }

    pub fn with_peer_capacity(mut self, capacity: usize) -> Self {
        self.peer_reasoning = PeerReasoningLog::with_capacity(capacity);
        self
    }

    /// Final outcome, `Unknown` when no decision was reached.
    pub fn outcome(&self) -> Outcome {
        self.final_outcome.unwrap_or(Outcome::Unknown)
    }

    pub fn log_interaction(&mut self, stage: StageName, kind: EventKind, text: impl Into<String>) {
        self.interactions.log(stage.as_str(), kind, text);
    }

    pub fn log_relationship(&mut self, line: impl Into<String>) {
        self.relationships.log(line);
    }

    pub fn interactions(&self) -> &InteractionLog {
        &self.interactions
    }

    pub fn relationship_log(&self) -> &RelationshipLog {
        &self.relationships
    }

    /// Put a note in a representative's inbox.
    pub fn deliver(&mut self, to_rep_id: &str, from_name: &str, note: impl Into<String>) {
        self.direct_messages
            .entry(to_rep_id.to_string())
            .or_default()
            .insert(from_name.to_string(), note.into());
    }

    pub fn inbox(&self, rep_id: &str) -> Option<&Inbox> {
        self.direct_messages.get(rep_id)
    }
}
