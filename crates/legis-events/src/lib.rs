//! Shared event types and serialization for the legislative simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! It is a dependency for the engine and for anything that reads a run's
//! persisted artifacts.

pub mod event;
pub mod report;
pub mod snapshot;
pub mod vote;

// Re-export event types
pub use event::{EventKind, InteractionEvent};

// Re-export vote types
pub use vote::{Outcome, ParseVoteError, Vote, VoteResult};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, RelationshipSnapshot, RepresentativeSnapshot, SocialGraphSnapshot,
};

// Re-export report types
pub use report::RunReport;
