//! Output
//!
//! Persisted artifacts of a finished run.

pub mod artifacts;

pub use artifacts::{
    write_artifacts, ArtifactPaths, INTERACTION_LOG_FILE, RELATIONSHIP_LOG_FILE, RUN_REPORT_FILE,
    SOCIAL_GRAPH_FILE,
};
