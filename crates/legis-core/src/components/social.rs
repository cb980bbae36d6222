//! Social Graph
//!
//! Directed, per-representative relationship records driven by a logical
//! clock. Meetings are recorded in both directions; lobbying only from the
//! lobbyist's side.

use legis_events::{RelationshipSnapshot, RepresentativeSnapshot, SocialGraphSnapshot};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from recording interactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SocialGraphError {
    #[error("representative {0} is not registered in the social graph")]
    UnknownRepresentative(String),

    #[error("representative {0} cannot interact with themselves")]
    SelfInteraction(String),
}

/// Identity facts the graph needs about a representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepInfo {
    pub id: String,
    pub name: String,
    pub committee_id: String,
    pub committee_name: String,
}

impl RepInfo {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        committee_id: impl Into<String>,
        committee_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            committee_id: committee_id.into(),
            committee_name: committee_name.into(),
        }
    }
}

/// Kind of the most recent interaction on a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    Meet,
    Lobby,
}

impl InteractionType {
    pub fn as_str(self) -> &'static str {
        match self {
            InteractionType::Meet => "meet",
            InteractionType::Lobby => "lobby",
        }
    }
}

/// What one representative knows about another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub other_id: String,
    pub other_name: String,
    pub other_committee_id: String,
    pub other_committee_name: String,
    pub times_met: u32,
    pub times_lobbied: u32,
    /// Clock value of the last interaction; 0 means never
    pub last_interaction_seq: u64,
    pub last_interaction: Option<InteractionType>,
    pub last_note: String,
}

impl Relationship {
    fn new(other: &RepInfo) -> Self {
        Self {
            other_id: other.id.clone(),
            other_name: other.name.clone(),
            other_committee_id: other.committee_id.clone(),
            other_committee_name: other.committee_name.clone(),
            times_met: 0,
            times_lobbied: 0,
            last_interaction_seq: 0,
            last_interaction: None,
            last_note: String::new(),
        }
    }

    /// Committee membership is learned on every interaction.
    fn learn(&mut self, other: &RepInfo) {
        self.other_name = other.name.clone();
        self.other_committee_id = other.committee_id.clone();
        self.other_committee_name = other.committee_name.clone();
    }

    fn to_snapshot(&self) -> RelationshipSnapshot {
        RelationshipSnapshot {
            other_id: self.other_id.clone(),
            other_name: self.other_name.clone(),
            other_committee_id: self.other_committee_id.clone(),
            other_committee_name: self.other_committee_name.clone(),
            times_met: self.times_met,
            times_lobbied: self.times_lobbied,
            last_interaction_seq: self.last_interaction_seq,
            last_interaction_type: self
                .last_interaction
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
            last_note: self.last_note.clone(),
        }
    }
}

/// Who knows whom, and how well.
#[derive(Debug, Clone, Default)]
pub struct SocialGraph {
    reps: Vec<RepInfo>,
    index: HashMap<String, usize>,
    /// owner id -> other id -> relationship
    relationships: HashMap<String, HashMap<String, Relationship>>,
    clock: u64,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a representative. Re-registering an id refreshes its info
    /// and keeps its position.
    pub fn register_representative(&mut self, info: RepInfo) {
        match self.index.get(&info.id) {
            Some(&i) => self.reps[i] = info,
            None => {
                self.index.insert(info.id.clone(), self.reps.len());
                self.relationships.entry(info.id.clone()).or_default();
                self.reps.push(info);
            }
        }
    }

    pub fn is_registered(&self, rep_id: &str) -> bool {
        self.index.contains_key(rep_id)
    }

    pub fn rep_info(&self, rep_id: &str) -> Option<&RepInfo> {
        self.index.get(rep_id).map(|&i| &self.reps[i])
    }

    /// Registered representatives in registration order.
    pub fn representatives(&self) -> impl Iterator<Item = &RepInfo> {
        self.reps.iter()
    }

    pub fn len(&self) -> usize {
        self.reps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reps.is_empty()
    }

    /// Current logical clock value.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Record a meeting; both sides' relationships are updated.
    pub fn record_meet(&mut self, a: &str, b: &str) -> Result<(), SocialGraphError> {
        let (a_info, b_info) = self.pair(a, b)?;
        self.clock += 1;
        let seq = self.clock;

        for (owner, other) in [(&a_info, &b_info), (&b_info, &a_info)] {
            let rel = self.relationship_entry(owner, other);
            rel.times_met += 1;
            rel.last_interaction_seq = seq;
            rel.last_interaction = Some(InteractionType::Meet);
        }
        Ok(())
    }

    /// Record a lobbying message from one representative to another. Only
    /// the lobbyist's record changes.
    pub fn record_lobby(
        &mut self,
        from: &str,
        to: &str,
        note: &str,
    ) -> Result<(), SocialGraphError> {
        let (from_info, to_info) = self.pair(from, to)?;
        self.clock += 1;
        let seq = self.clock;

        let rel = self.relationship_entry(&from_info, &to_info);
        rel.times_lobbied += 1;
        rel.last_interaction_seq = seq;
        rel.last_interaction = Some(InteractionType::Lobby);
        rel.last_note = note.trim().to_string();
        Ok(())
    }

    /// Everyone a representative knows, most recent interaction first.
    pub fn relationships_for(&self, rep_id: &str) -> Vec<&Relationship> {
        let mut rels: Vec<&Relationship> = self
            .relationships
            .get(rep_id)
            .map(|m| m.values().collect())
            .unwrap_or_default();
        rels.sort_by(|a, b| {
            b.last_interaction_seq
                .cmp(&a.last_interaction_seq)
                .then_with(|| a.other_id.cmp(&b.other_id))
        });
        rels
    }

    pub fn relationship(&self, owner: &str, other: &str) -> Option<&Relationship> {
        self.relationships.get(owner).and_then(|m| m.get(other))
    }

    /// Serializable view of the whole graph.
    pub fn snapshot(&self, snapshot_id: impl Into<String>) -> SocialGraphSnapshot {
        let mut snapshot = SocialGraphSnapshot::new(snapshot_id, self.clock);
        for rep in &self.reps {
            snapshot.representatives.push(RepresentativeSnapshot {
                rep_id: rep.id.clone(),
                name: rep.name.clone(),
                committee_id: rep.committee_id.clone(),
                committee_name: rep.committee_name.clone(),
                relationships: self
                    .relationships_for(&rep.id)
                    .into_iter()
                    .map(Relationship::to_snapshot)
                    .collect(),
            });
        }
        snapshot
    }

    fn pair(&self, a: &str, b: &str) -> Result<(RepInfo, RepInfo), SocialGraphError> {
        let a_info = self
            .rep_info(a)
            .ok_or_else(|| SocialGraphError::UnknownRepresentative(a.to_string()))?;
        let b_info = self
            .rep_info(b)
            .ok_or_else(|| SocialGraphError::UnknownRepresentative(b.to_string()))?;
        if a == b {
            return Err(SocialGraphError::SelfInteraction(a.to_string()));
        }
        Ok((a_info.clone(), b_info.clone()))
    }

    fn relationship_entry(&mut self, owner: &RepInfo, other: &RepInfo) -> &mut Relationship {
        let rel = self
            .relationships
            .entry(owner.id.clone())
            .or_default()
            .entry(other.id.clone())
            .or_insert_with(|| Relationship::new(other));
        rel.learn(other);
        rel
    }
}
