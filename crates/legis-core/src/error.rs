//! Simulation errors.

use thiserror::Error;

use crate::agents::AgentError;
use crate::components::SocialGraphError;
use crate::config::ConfigError;
use crate::oracle::OracleError;
use crate::setup::SetupError;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("{rep_name} ({rep_id}) could not take a turn: {source}")]
    Turn {
        rep_id: String,
        rep_name: String,
        #[source]
        source: AgentError,
    },

    #[error("no agency has been assigned to the bill")]
    NoAgencyAssigned,

    #[error("unknown agency: {0}")]
    UnknownAgency(String),

    #[error("unknown representative: {0}")]
    UnknownRepresentative(String),

    #[error(transparent)]
    SocialGraph(#[from] SocialGraphError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write artifacts: {0}")]
    Artifacts(#[from] std::io::Error),
}
