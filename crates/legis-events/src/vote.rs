//! Vote Types
//!
//! Ballots, tallies and the outcome of a run.
//!
//! # Example
//!
//! ```
//! use legis_events::{Vote, VoteResult};
//!
//! let mut result = VoteResult::new();
//! result.record("rep_a", Vote::Yes);
//! result.record("rep_b", Vote::No);
//! result.record("rep_c", Vote::Yes);
//! assert_eq!(result.yes_count(), 2);
//! assert_eq!(result.no_count(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A representative's vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vote {
    Yes,
    No,
    Abstain,
}

impl Vote {
    /// Canonical uppercase spelling used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Vote::Yes => "YES",
            Vote::No => "NO",
            Vote::Abstain => "ABSTAIN",
        }
    }

    /// Short label used in deliberation log lines.
    pub fn label(self) -> &'static str {
        match self {
            Vote::Yes => "pass",
            Vote::No => "fail",
            Vote::Abstain => "abstain",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of `YES`, `NO`, `ABSTAIN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVoteError(pub String);

impl fmt::Display for ParseVoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid vote: {:?}", self.0)
    }
}

impl std::error::Error for ParseVoteError {}

impl FromStr for Vote {
    type Err = ParseVoteError;

    /// Matches the uppercase spelling only; callers canonicalize first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "YES" => Ok(Vote::Yes),
            "NO" => Ok(Vote::No),
            "ABSTAIN" => Ok(Vote::Abstain),
            other => Err(ParseVoteError(other.to_string())),
        }
    }
}

/// Votes keyed by representative id. Counts are always derived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResult {
    votes: BTreeMap<String, Vote>,
}

impl VoteResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) a representative's vote.
    pub fn record(&mut self, rep_id: impl Into<String>, vote: Vote) {
        self.votes.insert(rep_id.into(), vote);
    }

    pub fn vote_of(&self, rep_id: &str) -> Option<Vote> {
        self.votes.get(rep_id).copied()
    }

    pub fn votes(&self) -> &BTreeMap<String, Vote> {
        &self.votes
    }

    pub fn yes_count(&self) -> usize {
        self.count(Vote::Yes)
    }

    pub fn no_count(&self) -> usize {
        self.count(Vote::No)
    }

    pub fn abstain_count(&self) -> usize {
        self.count(Vote::Abstain)
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    fn count(&self, wanted: Vote) -> usize {
        self.votes.values().filter(|v| **v == wanted).count()
    }
}

impl<K: Into<String>> FromIterator<(K, Vote)> for VoteResult {
    fn from_iter<T: IntoIterator<Item = (K, Vote)>>(iter: T) -> Self {
        let mut result = VoteResult::new();
        for (rep_id, vote) in iter {
            result.record(rep_id, vote);
        }
        result
    }
}

impl fmt::Display for VoteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VoteResult{{yes={}, no={}, abstain={}}}",
            self.yes_count(),
            self.no_count(),
            self.abstain_count()
        )
    }
}

/// Outcome of the threshold decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Pass,
    Killed,
    /// No vote ever happened.
    Unknown,
    /// A revision was drafted and the pipeline is looping back.
    RevisionPending,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Killed => "KILLED",
            Outcome::Unknown => "UNKNOWN",
            Outcome::RevisionPending => "REVISION_PENDING",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
