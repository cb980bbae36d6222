//! Run Artifacts
//!
//! Files written at the end of every run, aborted runs included.

use legis_events::{generate_snapshot_id, RunReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::components::SocialGraph;
use crate::state::SimulationState;

pub const INTERACTION_LOG_FILE: &str = "interaction.log";
pub const RELATIONSHIP_LOG_FILE: &str = "relationships.log";
pub const SOCIAL_GRAPH_FILE: &str = "social_graph.json";
pub const RUN_REPORT_FILE: &str = "run_report.json";

/// Where each artifact of a run lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub interaction_log: PathBuf,
    pub relationship_log: PathBuf,
    pub social_graph: PathBuf,
    pub run_report: PathBuf,
}

impl ArtifactPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            interaction_log: dir.join(INTERACTION_LOG_FILE),
            relationship_log: dir.join(RELATIONSHIP_LOG_FILE),
            social_graph: dir.join(SOCIAL_GRAPH_FILE),
            run_report: dir.join(RUN_REPORT_FILE),
        }
    }
}

/// Write all four artifacts into `dir`, creating it when needed.
pub fn write_artifacts(
    dir: &Path,
    state: &SimulationState,
    social: &SocialGraph,
    report: &RunReport,
) -> std::io::Result<ArtifactPaths> {
    fs::create_dir_all(dir)?;
    let paths = ArtifactPaths::in_dir(dir);

    state.interactions().write_to(&paths.interaction_log)?;
    state.relationship_log().write_to(&paths.relationship_log)?;

    let snapshot = social.snapshot(generate_snapshot_id(social.clock()));
    fs::write(&paths.social_graph, snapshot.to_json_pretty()?)?;
    fs::write(&paths.run_report, serde_json::to_string_pretty(report)?)?;

    info!(dir = %dir.display(), events = state.interactions().len(), "artifacts written");
    Ok(paths)
}
