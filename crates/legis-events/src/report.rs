//! Run Report
//!
//! Final summary written next to the interaction log.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Outcome, VoteResult};

/// What happened in a single run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub bill_id: String,
    pub bill_title: String,
    #[serde(default)]
    pub selected_agency_id: Option<String>,
    pub outcome: Outcome,
    #[serde(default)]
    pub vote_result: Option<VoteResult>,
    /// Loop-backs actually taken
    pub revisions: u32,
    pub interaction_count: usize,
    /// Set when a stage error cut the run short
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl RunReport {
    pub fn new(bill_id: impl Into<String>, bill_title: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            bill_id: bill_id.into(),
            bill_title: bill_title.into(),
            selected_agency_id: None,
            outcome: Outcome::Unknown,
            vote_result: None,
            revisions: 0,
            interaction_count: 0,
            aborted: None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }
}
