//! Configuration loading for the simulator.
//!
//! All run settings are loaded from a TOML file. Every section and field has
//! a default, so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::agents::{TokenBudget, TurnPolicy};
use crate::contract::ParseMode;
use crate::setup::AgentSettings;
use crate::systems::ChamberSettings;

/// Complete simulator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Deliberation tunables
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Model endpoint and token budgets
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Input files
    #[serde(default)]
    pub paths: PathsConfig,
    /// Tie-break ballots
    #[serde(default)]
    pub popular_vote: PopularVoteConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects settings no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        let oracle = &self.oracle;
        let positive = [
            ("simulation.agencies_to_vote", sim.agencies_to_vote),
            ("simulation.floor_summary_lines", sim.floor_summary_lines),
            ("simulation.peer_log_capacity", sim.peer_log_capacity),
            ("oracle.turn_tokens", oracle.turn_tokens as usize),
            ("oracle.retry_tokens", oracle.retry_tokens as usize),
            ("oracle.judge_tokens", oracle.judge_tokens as usize),
            ("oracle.judge_retry_tokens", oracle.judge_retry_tokens as usize),
            ("oracle.parse_tokens", oracle.parse_tokens as usize),
            ("oracle.parse_retry_tokens", oracle.parse_retry_tokens as usize),
            ("oracle.revise_tokens", oracle.revise_tokens as usize),
            ("oracle.timeout_secs", oracle.timeout_secs as usize),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{} must be greater than zero", field)));
        }
        if oracle.kind == OracleKind::Ollama && oracle.model.trim().is_empty() {
            return Err(ConfigError::Invalid("oracle.model must not be empty".to_string()));
        }
        if self.popular_vote.mode == PopularVoteMode::Timed && self.popular_vote.window_secs == 0 {
            return Err(ConfigError::Invalid(
                "popular_vote.window_secs must be greater than zero for a timed vote".to_string(),
            ));
        }
        Ok(())
    }

    pub fn chamber_settings(&self) -> ChamberSettings {
        ChamberSettings {
            agencies_to_vote: self.simulation.agencies_to_vote,
            floor_summary_lines: self.simulation.floor_summary_lines,
            peer_reasoning_in_prompt: self.simulation.peer_reasoning_in_prompt,
            max_revisions: self.simulation.max_revisions,
            parse_tokens: self.oracle.parse_tokens,
            parse_retry_tokens: self.oracle.parse_retry_tokens,
            revise_tokens: self.oracle.revise_tokens,
        }
    }

    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            turn_policy: TurnPolicy {
                mode: self.simulation.turn_parse_mode,
                budget: TokenBudget {
                    first: self.oracle.turn_tokens,
                    retry: self.oracle.retry_tokens,
                },
                known_reps_limit: self.simulation.known_reps_in_prompt,
            },
            judge_budget: TokenBudget {
                first: self.oracle.judge_tokens,
                retry: self.oracle.judge_retry_tokens,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Loop-backs allowed after a KILLED vote
    pub max_revisions: u32,
    /// Agencies sampled for the floor debate
    pub agencies_to_vote: usize,
    /// Lines kept in the rolling floor summary
    pub floor_summary_lines: usize,
    pub peer_log_capacity: usize,
    /// Peer statements shown in each turn prompt
    pub peer_reasoning_in_prompt: usize,
    /// Colleagues listed in each politician's social memory
    pub known_reps_in_prompt: usize,
    /// How a turn reply that fails validation twice is treated
    pub turn_parse_mode: ParseMode,
    /// Where the run's artifacts are written
    pub output_dir: PathBuf,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_revisions: 1,
            agencies_to_vote: 7,
            floor_summary_lines: 12,
            peer_log_capacity: 30,
            peer_reasoning_in_prompt: 8,
            known_reps_in_prompt: 10,
            turn_parse_mode: ParseMode::Lenient,
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Which oracle backs the agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OracleKind {
    /// Ollama-compatible HTTP endpoint
    #[default]
    Ollama,
    /// Canned offline replies
    Scripted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub kind: OracleKind,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Budget used when a caller does not name one
    pub default_tokens: u32,
    pub turn_tokens: u32,
    pub retry_tokens: u32,
    pub judge_tokens: u32,
    pub judge_retry_tokens: u32,
    pub parse_tokens: u32,
    pub parse_retry_tokens: u32,
    pub revise_tokens: u32,
}

impl OracleConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            kind: OracleKind::Ollama,
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.1".to_string(),
            timeout_secs: 120,
            default_tokens: 256,
            turn_tokens: 500,
            retry_tokens: 800,
            judge_tokens: 200,
            judge_retry_tokens: 800,
            parse_tokens: 400,
            parse_retry_tokens: 600,
            revise_tokens: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub bill: PathBuf,
    pub agencies: PathBuf,
    pub representatives: PathBuf,
    /// Optional; a missing file means no facts
    pub facts: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bill: PathBuf::from("data/bill.txt"),
            agencies: PathBuf::from("data/agencies.json"),
            representatives: PathBuf::from("data/representatives.json"),
            facts: Some(PathBuf::from("data/facts.json")),
        }
    }
}

/// How tie-break ballots are gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PopularVoteMode {
    /// Ties kill the bill
    #[default]
    Disabled,
    /// yes/no lines on standard input until `close`
    Stdin,
    /// Ballots accepted for a fixed window
    Timed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularVoteConfig {
    pub mode: PopularVoteMode,
    pub window_secs: u64,
}

impl Default for PopularVoteConfig {
    fn default() -> Self {
        Self {
            mode: PopularVoteMode::Disabled,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
