//! Run Logs
//!
//! In-memory, append-only logs of what happened during a run. They are
//! persisted as plain text once the run ends.

pub mod logger;

pub use logger::{InteractionLog, RelationshipLog};
