//! Core deliberation engine: stages, agents, reply contracts, social memory.
//!
//! A run threads one [`SimulationState`] through the ordered stages of a
//! [`PipelineExecutor`]. Stages ask [`agents`] for decisions; agents ask the
//! [`oracle`] and validate replies through the [`contract`].

pub mod agents;
pub mod components;
pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod oracle;
pub mod output;
pub mod pipeline;
pub mod setup;
pub mod simulation;
pub mod state;
pub mod status;
pub mod systems;
pub mod voting;

pub use components::{Agency, Bill, PoliticianProfile, SocialGraph};
pub use config::{ConfigError, SimConfig};
pub use contract::{AgentOutput, JudgeDecision, ParseMode, Stance, ValidationError};
pub use error::SimulationError;
pub use oracle::{OllamaOracle, Oracle, OracleError, ScriptedOracle};
pub use pipeline::{PipelineExecutor, PipelineRun, StageName, StageRunner};
pub use simulation::{RunSummary, Simulation};
pub use state::SimulationState;
pub use status::{NullStatus, RecordingStatus, StatusSink, TracingStatus};
pub use systems::{Chamber, ChamberSettings};
pub use voting::{Ballot, PopularVote, VoteBox, VoteCollector};
