//! Agency Components
//!
//! Committees that can take ownership of a bill. Every agency seats exactly
//! three representatives.

use serde::Serialize;
use thiserror::Error;

/// Seats on every committee
pub const COMMITTEE_SIZE: usize = 3;

/// Structural problems in the agency/representative roster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("agency {agency_id} has {count} representatives, expected {COMMITTEE_SIZE}")]
    CommitteeSize { agency_id: String, count: usize },

    #[error("agency {agency_id} seats {rep_id} more than once")]
    DuplicateSeat { agency_id: String, rep_id: String },

    #[error("duplicate agency id: {0}")]
    DuplicateAgency(String),

    #[error("duplicate representative id: {0}")]
    DuplicateRepresentative(String),

    #[error("agency {agency_id} references unknown representative {rep_id}")]
    UnknownRepresentative { agency_id: String, rep_id: String },

    #[error("roster has no agencies")]
    NoAgencies,
}

/// A committee with its scope keywords and seated representatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Agency {
    id: String,
    name: String,
    scope_keywords: Vec<String>,
    representative_ids: [String; COMMITTEE_SIZE],
}

impl Agency {
    /// Build an agency. Fails unless exactly three distinct representatives
    /// are seated.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        scope_keywords: Vec<String>,
        representative_ids: Vec<String>,
    ) -> Result<Self, RosterError> {
        let id = id.into();
        let count = representative_ids.len();
        let seats: [String; COMMITTEE_SIZE] = representative_ids
            .try_into()
            .map_err(|_| RosterError::CommitteeSize {
                agency_id: id.clone(),
                count,
            })?;

        for (i, rep_id) in seats.iter().enumerate() {
            if seats[..i].contains(rep_id) {
                return Err(RosterError::DuplicateSeat {
                    agency_id: id,
                    rep_id: rep_id.clone(),
                });
            }
        }

        let mut keywords: Vec<String> = Vec::new();
        for keyword in scope_keywords {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            scope_keywords: keywords,
            representative_ids: seats,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope_keywords(&self) -> &[String] {
        &self.scope_keywords
    }

    pub fn representative_ids(&self) -> &[String; COMMITTEE_SIZE] {
        &self.representative_ids
    }

    pub fn seats(&self, rep_id: &str) -> bool {
        self.representative_ids.iter().any(|id| id == rep_id)
    }

    /// Number of scope keywords found in already-lowercased text.
    pub fn keyword_hits(&self, lowercase_text: &str) -> usize {
        self.scope_keywords
            .iter()
            .filter(|k| lowercase_text.contains(k.as_str()))
            .count()
    }
}
