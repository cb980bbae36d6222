//! Snapshot Types
//!
//! Serialization structs for the social-graph dump written at the end of a
//! run. The dump is round-trippable so a finished run can be reloaded for
//! debugging.

use serde::{Deserialize, Serialize};

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// One directed relationship as seen from its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub other_id: String,
    pub other_name: String,
    #[serde(default)]
    pub other_committee_id: String,
    #[serde(default)]
    pub other_committee_name: String,
    pub times_met: u32,
    pub times_lobbied: u32,
    /// Logical clock value of the most recent interaction
    pub last_interaction_seq: u64,
    #[serde(default)]
    pub last_interaction_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_note: String,
}

/// A registered representative and everyone they know, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentativeSnapshot {
    pub rep_id: String,
    pub name: String,
    #[serde(default)]
    pub committee_id: String,
    #[serde(default)]
    pub committee_name: String,
    #[serde(default)]
    pub relationships: Vec<RelationshipSnapshot>,
}

/// Complete social graph at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialGraphSnapshot {
    pub snapshot_id: String,
    /// Logical clock at the time of the snapshot
    pub clock: u64,
    pub representatives: Vec<RepresentativeSnapshot>,
}

impl SocialGraphSnapshot {
    pub fn new(snapshot_id: impl Into<String>, clock: u64) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            clock,
            representatives: Vec::new(),
        }
    }

    /// Look up a representative by id.
    pub fn representative(&self, rep_id: &str) -> Option<&RepresentativeSnapshot> {
        self.representatives.iter().find(|r| r.rep_id == rep_id)
    }

    /// Total number of directed relationships.
    pub fn relationship_count(&self) -> usize {
        self.representatives
            .iter()
            .map(|r| r.relationships.len())
            .sum()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
