//! Simulation Driver
//!
//! Wires the chamber to the pipeline, runs one bill end to end and writes
//! the run's artifacts whether or not a stage failed.

use legis_events::RunReport;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use crate::components::Bill;
use crate::config::{PopularVoteMode, SimConfig};
use crate::error::SimulationError;
use crate::oracle::Oracle;
use crate::output::{write_artifacts, ArtifactPaths};
use crate::pipeline::PipelineExecutor;
use crate::setup::{facts_to_prompt_block, load_bill, load_facts, Legislature, Roster};
use crate::state::SimulationState;
use crate::status::StatusSink;
use crate::systems::Chamber;
use crate::voting::{PopularVote, StdinBallots, TimedWindow, VoteBox, VoteCollector};

/// Popular vote for a configured mode, if any, tallied by `collector`.
pub fn popular_vote_for(config: &SimConfig, collector: Arc<dyn VoteCollector>) -> Option<PopularVote> {
    match config.popular_vote.mode {
        PopularVoteMode::Disabled => None,
        PopularVoteMode::Stdin => Some(PopularVote::new(collector, Box::new(StdinBallots::stdin()))),
        PopularVoteMode::Timed => Some(PopularVote::new(
            collector,
            Box::new(TimedWindow::new(Duration::from_secs(config.popular_vote.window_secs))),
        )),
    }
}

/// Result of a run that reached the end of the pipeline.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: RunReport,
    pub artifacts: ArtifactPaths,
}

pub struct Simulation {
    chamber: Chamber,
    executor: PipelineExecutor,
    output_dir: PathBuf,
    peer_log_capacity: usize,
}

impl Simulation {
    /// The standard pipeline over `chamber`. The loop-back bound comes from
    /// the chamber settings so the executor and the revise stage agree.
    pub fn new(chamber: Chamber, status: Arc<dyn StatusSink>, output_dir: impl Into<PathBuf>) -> Self {
        let executor = PipelineExecutor::standard(chamber.settings().max_revisions, status);
        Self {
            chamber,
            executor,
            output_dir: output_dir.into(),
            peer_log_capacity: crate::state::PEER_LOG_CAPACITY,
        }
    }

    /// Build the legislature from the configured roster files.
    pub fn from_config(
        config: &SimConfig,
        oracle: Arc<dyn Oracle>,
        status: Arc<dyn StatusSink>,
    ) -> Result<Self, SimulationError> {
        let roster = Roster::load(&config.paths.agencies, &config.paths.representatives)?;
        let legislature = Legislature::build(roster, oracle.clone(), config.agent_settings())
            .map_err(crate::setup::SetupError::from)?;
        info!(
            agencies = legislature.agencies().len(),
            representatives = legislature.politicians().len(),
            "legislature ready"
        );

        let mut chamber = Chamber::new(legislature, oracle, status.clone(), config.chamber_settings());
        if let Some(popular_vote) = popular_vote_for(config, Arc::new(VoteBox::new())) {
            chamber = chamber.with_popular_vote(popular_vote);
        }
        let mut simulation = Self::new(chamber, status, &config.simulation.output_dir);
        simulation.peer_log_capacity = config.simulation.peer_log_capacity;
        Ok(simulation)
    }

    /// Initial state for a bill, with the facts pack rendered for prompts.
    pub fn prepare_state(&self, bill: Bill, facts_path: Option<&Path>) -> Result<SimulationState, SimulationError> {
        let facts = match facts_path {
            Some(path) => load_facts(path)?,
            None => Vec::new(),
        };
        Ok(SimulationState::new(bill)
            .with_facts_pack(facts_to_prompt_block(&facts))
            .with_peer_capacity(self.peer_log_capacity))
    }

    /// Load the configured bill and facts.
    pub fn load_state(&self, config: &SimConfig) -> Result<SimulationState, SimulationError> {
        let bill = load_bill(&config.paths.bill)?;
        self.prepare_state(bill, config.paths.facts.as_deref())
    }

    pub fn chamber(&self) -> &Chamber {
        &self.chamber
    }

    /// The collector tallying the tie-break popular vote. Other threads may
    /// record ballots into it while the vote is open.
    pub fn vote_collector(&self) -> Option<Arc<dyn VoteCollector>> {
        self.chamber.popular_vote.as_ref().map(|p| p.collector())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Run the pipeline, then write the artifacts. A stage error is returned
    /// after the artifacts of the aborted run have been written.
    pub fn run(&mut self, state: &mut SimulationState) -> Result<RunSummary, SimulationError> {
        info!(bill = %state.bill.id(), title = %state.bill.title(), "starting run");
        let result = self.executor.run(&mut self.chamber, state);

        let mut report = RunReport::new(state.bill.id(), state.bill.title());
        report.selected_agency_id = state.selected_agency_id.clone();
        report.outcome = state.outcome();
        report.vote_result = state.vote_result.clone();
        report.revisions = state.revisions_taken;
        report.interaction_count = state.interactions().len();
        if let Err(e) = &result {
            report.aborted = Some(e.to_string());
        }

        let written = write_artifacts(&self.output_dir, state, self.chamber.legislature().social(), &report);
        match (result, written) {
            (Ok(run), Ok(artifacts)) => {
                info!(
                    outcome = %report.outcome,
                    stages = run.stages_executed,
                    revisions = run.revisions,
                    "run complete"
                );
                Ok(RunSummary { report, artifacts })
            }
            (Ok(_), Err(e)) => Err(SimulationError::Artifacts(e)),
            (Err(stage_error), Err(e)) => {
                error!(error = %e, "could not write artifacts of aborted run");
                Err(stage_error)
            }
            (Err(stage_error), Ok(_)) => Err(stage_error),
        }
    }
}
