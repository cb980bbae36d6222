//! Stage Pipeline
//!
//! A closed set of named stages executed in order. After each stage the
//! executor checks whether the stage asked to rerun from an earlier one and
//! jumps back, at most `max_revisions` times per run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::state::SimulationState;
use crate::status::StatusSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageName {
    SessionMingle,
    ParseBill,
    #[serde(rename = "JudgeAssignAgency")]
    AssignAgency,
    CommitteeDeliberation,
    PreFloorLobbying,
    PrimaryFloorDebate,
    ThresholdDecision,
    ReviseFailedBill,
    Finalize,
}

impl StageName {
    pub fn as_str(self) -> &'static str {
        match self {
            StageName::SessionMingle => "SessionMingle",
            StageName::ParseBill => "ParseBill",
            StageName::AssignAgency => "JudgeAssignAgency",
            StageName::CommitteeDeliberation => "CommitteeDeliberation",
            StageName::PreFloorLobbying => "PreFloorLobbying",
            StageName::PrimaryFloorDebate => "PrimaryFloorDebate",
            StageName::ThresholdDecision => "ThresholdDecision",
            StageName::ReviseFailedBill => "ReviseFailedBill",
            StageName::Finalize => "Finalize",
        }
    }

    /// The standard pipeline, in execution order.
    pub fn all() -> &'static [StageName] {
        &[
            StageName::SessionMingle,
            StageName::ParseBill,
            StageName::AssignAgency,
            StageName::CommitteeDeliberation,
            StageName::PreFloorLobbying,
            StageName::PrimaryFloorDebate,
            StageName::ThresholdDecision,
            StageName::ReviseFailedBill,
            StageName::Finalize,
        ]
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageName::all()
            .iter()
            .copied()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown stage: {}", s))
    }
}

/// Executes one stage against the shared state.
pub trait StageRunner {
    type Error: std::error::Error;

    fn run_stage(&mut self, stage: StageName, state: &mut SimulationState) -> Result<(), Self::Error>;
}

/// Summary of a completed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineRun {
    pub stages_executed: usize,
    pub revisions: u32,
}

pub struct PipelineExecutor {
    stages: Vec<StageName>,
    max_revisions: u32,
    status: Arc<dyn StatusSink>,
}

impl PipelineExecutor {
    pub fn new(stages: Vec<StageName>, max_revisions: u32, status: Arc<dyn StatusSink>) -> Self {
        Self {
            stages,
            max_revisions,
            status,
        }
    }

    /// The standard pipeline.
    pub fn standard(max_revisions: u32, status: Arc<dyn StatusSink>) -> Self {
        Self::new(StageName::all().to_vec(), max_revisions, status)
    }

    pub fn stages(&self) -> &[StageName] {
        &self.stages
    }

    pub fn max_revisions(&self) -> u32 {
        self.max_revisions
    }

    /// Run every stage in order, honoring loop-back requests. The first
    /// stage error stops the run and is returned.
    pub fn run<R: StageRunner>(
        &self,
        runner: &mut R,
        state: &mut SimulationState,
    ) -> Result<PipelineRun, R::Error> {
        let mut run = PipelineRun::default();
        let mut index = 0;

        while let Some(&stage) = self.stages.get(index) {
            info!(%stage, "=== stage ===");
            self.status.stage_started(stage);
            if let Err(e) = runner.run_stage(stage, state) {
                error!(%stage, error = %e, "stage failed; aborting run");
                return Err(e);
            }
            self.status.stage_finished(stage);
            run.stages_executed += 1;
            index += 1;

            let Some(target) = state.rerun_from.take() else {
                continue;
            };
            match self.stages.iter().position(|s| *s == target) {
                None => warn!(%stage, %target, "loop-back target not in pipeline; ignored"),
                Some(_) if run.revisions >= self.max_revisions => {
                    warn!(%stage, %target, max = self.max_revisions, "revision budget exhausted; loop-back ignored")
                }
                Some(position) => {
                    run.revisions += 1;
                    state.revisions_taken = run.revisions;
                    info!(%stage, %target, revision = run.revisions, "looping back");
                    index = position;
                }
            }
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Bill;
    use crate::status::{RecordingStatus, StatusEvent};

    #[derive(Debug, thiserror::Error)]
    #[error("stage {0} failed")]
    struct StageFailed(StageName);

    /// Records the stages it runs and always asks to loop back after
    /// `loop_from`.
    struct LoopingRunner {
        loop_from: StageName,
        loop_to: StageName,
        fail_at: Option<StageName>,
        trace: Vec<StageName>,
    }

    impl StageRunner for LoopingRunner {
        type Error = StageFailed;

        fn run_stage(&mut self, stage: StageName, state: &mut SimulationState) -> Result<(), StageFailed> {
            self.trace.push(stage);
            if self.fail_at == Some(stage) {
                return Err(StageFailed(stage));
            }
            if stage == self.loop_from {
                state.rerun_from = Some(self.loop_to);
            }
            Ok(())
        }
    }

    fn runner(loop_from: StageName, loop_to: StageName) -> LoopingRunner {
        LoopingRunner {
            loop_from,
            loop_to,
            fail_at: None,
            trace: Vec::new(),
        }
    }

    fn state() -> SimulationState {
        SimulationState::new(Bill::new("hr-1", "T", "text"))
    }

    #[test]
    fn test_loop_back_is_bounded() {
        let executor = PipelineExecutor::standard(2, Arc::new(RecordingStatus::new()));
        let mut runner = runner(StageName::ReviseFailedBill, StageName::CommitteeDeliberation);
        let mut state = state();

        let run = executor.run(&mut runner, &mut state).unwrap();
        assert_eq!(run.revisions, 2);
        assert_eq!(state.revisions_taken, 2);

        let committee_runs = runner
            .trace
            .iter()
            .filter(|s| **s == StageName::CommitteeDeliberation)
            .count();
        assert_eq!(committee_runs, 3);
        assert_eq!(runner.trace.last(), Some(&StageName::Finalize));
        assert_eq!(run.stages_executed, runner.trace.len());
        assert!(state.rerun_from.is_none());
    }

    #[test]
    fn test_zero_budget_never_loops() {
        let executor = PipelineExecutor::standard(0, Arc::new(RecordingStatus::new()));
        let mut runner = runner(StageName::ReviseFailedBill, StageName::CommitteeDeliberation);
        let run = executor.run(&mut runner, &mut state()).unwrap();
        assert_eq!(run.revisions, 0);
        assert_eq!(runner.trace, StageName::all().to_vec());
    }

    #[test]
    fn test_unknown_target_is_ignored() {
        let executor = PipelineExecutor::new(
            vec![StageName::ThresholdDecision, StageName::ReviseFailedBill, StageName::Finalize],
            3,
            Arc::new(RecordingStatus::new()),
        );
        let mut runner = runner(StageName::ReviseFailedBill, StageName::CommitteeDeliberation);
        let run = executor.run(&mut runner, &mut state()).unwrap();
        assert_eq!(run.revisions, 0);
        assert_eq!(run.stages_executed, 3);
    }

    #[test]
    fn test_stage_error_stops_run() {
        let status = Arc::new(RecordingStatus::new());
        let executor = PipelineExecutor::standard(1, status.clone());
        let mut runner = runner(StageName::Finalize, StageName::Finalize);
        runner.fail_at = Some(StageName::ParseBill);

        let err = executor.run(&mut runner, &mut state()).unwrap_err();
        assert_eq!(err.to_string(), "stage ParseBill failed");
        assert_eq!(runner.trace, vec![StageName::SessionMingle, StageName::ParseBill]);
        assert_eq!(
            status.events().last(),
            Some(&StatusEvent::StageStarted(StageName::ParseBill))
        );
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(StageName::AssignAgency.to_string(), "JudgeAssignAgency");
        assert_eq!("committeedeliberation".parse::<StageName>(), Ok(StageName::CommitteeDeliberation));
        assert!("Recess".parse::<StageName>().is_err());
        assert_eq!(
            serde_json::to_string(&StageName::AssignAgency).unwrap(),
            "\"JudgeAssignAgency\""
        );
    }
}
