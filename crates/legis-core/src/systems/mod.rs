//! Stage Systems
//!
//! One module per stage. [`Chamber`] owns the legislature and the oracle
//! and dispatches each stage to its system.

pub mod assign;
pub mod committee;
pub mod finalize;
pub mod floor;
pub mod lobbying;
pub mod mingle;
pub mod parse_bill;
pub mod revise;
pub mod threshold;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::info;

use crate::agents::{AgentContext, TurnMode};
use crate::contract::AgentOutput;
use crate::error::SimulationError;
use crate::oracle::Oracle;
use crate::pipeline::{StageName, StageRunner};
use crate::setup::Legislature;
use crate::state::SimulationState;
use crate::status::{speech_excerpt, StatusSink};
use crate::voting::PopularVote;

/// Tunables the stage systems read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChamberSettings {
    /// Agencies sampled for the floor debate
    pub agencies_to_vote: usize,
    /// Speech lines kept in the rolling floor summary
    pub floor_summary_lines: usize,
    pub peer_reasoning_in_prompt: usize,
    pub max_revisions: u32,
    pub parse_tokens: u32,
    pub parse_retry_tokens: u32,
    pub revise_tokens: u32,
}

impl Default for ChamberSettings {
    fn default() -> Self {
        Self {
            agencies_to_vote: 7,
            floor_summary_lines: 12,
            peer_reasoning_in_prompt: 8,
            max_revisions: 1,
            parse_tokens: 400,
            parse_retry_tokens: 600,
            revise_tokens: 600,
        }
    }
}

/// Seed derived from a bill id with 64-bit FNV-1a, so a bill always replays
/// the same random choices.
pub fn bill_seed(bill_id: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bill_id
        .bytes()
        .fold(OFFSET, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(PRIME))
}

/// Fresh generator for one stage's random choices.
pub fn bill_rng(bill_id: &str) -> SmallRng {
    SmallRng::seed_from_u64(bill_seed(bill_id))
}

/// Runs the chamber's stages against a simulation state.
pub struct Chamber {
    pub(crate) legislature: Legislature,
    pub(crate) oracle: Arc<dyn Oracle>,
    pub(crate) status: Arc<dyn StatusSink>,
    pub(crate) popular_vote: Option<PopularVote>,
    pub(crate) settings: ChamberSettings,
}

impl Chamber {
    pub fn new(
        legislature: Legislature,
        oracle: Arc<dyn Oracle>,
        status: Arc<dyn StatusSink>,
        settings: ChamberSettings,
    ) -> Self {
        Self {
            legislature,
            oracle,
            status,
            popular_vote: None,
            settings,
        }
    }

    pub fn with_popular_vote(mut self, popular_vote: PopularVote) -> Self {
        self.popular_vote = Some(popular_vote);
        self
    }

    pub fn legislature(&self) -> &Legislature {
        &self.legislature
    }

    pub fn settings(&self) -> &ChamberSettings {
        &self.settings
    }

    /// Run one politician turn against the current state and report the
    /// speaker. The caller records the output.
    pub(crate) fn take_turn(
        &mut self,
        rep_id: &str,
        state: &SimulationState,
        floor_summary: &str,
        debate_target: Option<&str>,
        mode: TurnMode,
        read_inbox: bool,
    ) -> Result<AgentOutput, SimulationError> {
        let ctx = AgentContext {
            bill: &state.bill,
            floor_summary,
            facts_pack: &state.facts_pack,
            peer_reasoning: state.peer_reasoning.recent(self.settings.peer_reasoning_in_prompt),
            debate_target,
            direct_messages: if read_inbox { state.inbox(rep_id) } else { None },
        };

        let (politician, social) = self
            .legislature
            .turn_parts(rep_id)
            .ok_or_else(|| SimulationError::UnknownRepresentative(rep_id.to_string()))?;
        let name = crate::agents::Agent::name(politician).to_string();
        info!(rep = %name, ?mode, "taking turn");

        let output = politician
            .run_turn(&ctx, social, mode)
            .map_err(|source| SimulationError::Turn {
                rep_id: rep_id.to_string(),
                rep_name: name.clone(),
                source,
            })?;
        self.status
            .speaker(rep_id, &name, &speech_excerpt(output.speech()));
        Ok(output)
    }
}

impl StageRunner for Chamber {
    type Error = SimulationError;

    fn run_stage(&mut self, stage: StageName, state: &mut SimulationState) -> Result<(), SimulationError> {
        match stage {
            StageName::SessionMingle => mingle::run(self, state),
            StageName::ParseBill => parse_bill::run(self, state),
            StageName::AssignAgency => assign::run(self, state),
            StageName::CommitteeDeliberation => committee::run(self, state),
            StageName::PreFloorLobbying => lobbying::run(self, state),
            StageName::PrimaryFloorDebate => floor::run(self, state),
            StageName::ThresholdDecision => threshold::run(self, state),
            StageName::ReviseFailedBill => revise::run(self, state),
            StageName::Finalize => finalize::run(self, state),
        }
    }
}

/// One line for the peer reasoning log, e.g.
/// `Ada Park (Energy): oppose (vote NO) - Too costly. | No offsets.`
pub(crate) fn peer_line(name: &str, committee: &str, output: &AgentOutput) -> String {
    let mut line = format!(
        "{} ({}): {} (vote {})",
        name,
        committee,
        output.stance(),
        output.vote_intent()
    );
    if !output.reasons().is_empty() {
        line.push_str(" - ");
        line.push_str(&output.reasons().join(" | "));
    }
    line
}

/// One line of a committee or floor summary.
pub(crate) fn summary_line(name: &str, output: &AgentOutput) -> String {
    let mut line = format!("{}: {} (vote {})", name, output.stance(), output.vote_intent());
    let reason = output.headline_reason().trim();
    if !reason.is_empty() {
        line.push_str(" - ");
        line.push_str(reason);
    }
    line
}

/// Relationship diagnostics line, e.g.
/// `[Graph] Ada Park knows Lee Chen committee=Health met=1 lobbied=0`.
pub(crate) fn graph_line(legislature: &Legislature, owner_id: &str, other_id: &str) -> Option<String> {
    let rel = legislature.social().relationship(owner_id, other_id)?;
    let committee = if rel.other_committee_name.trim().is_empty() {
        "(unknown)"
    } else {
        rel.other_committee_name.as_str()
    };
    Some(format!(
        "[Graph] {} knows {} committee={} met={} lobbied={}",
        legislature.rep_name(owner_id),
        rel.other_name,
        committee,
        rel.times_met,
        rel.times_lobbied
    ))
}

/// Log the lobby targets a turn named.
pub(crate) fn log_lobby_intents(
    state: &mut SimulationState,
    stage: StageName,
    speaker: &str,
    output: &AgentOutput,
) {
    for target in output.targets_to_lobby() {
        state.log_interaction(
            stage,
            legis_events::EventKind::LobbyIntent,
            format!("[Lobby] {} -> {}", speaker, target),
        );
    }
}
