//! Threshold Decision
//!
//! Reads the floor vote. A tie goes to the public when a popular vote is
//! configured; without one a tie kills the bill. This is the only stage that
//! sets a final PASS, KILLED or UNKNOWN.

use legis_events::{EventKind, Outcome, VoteResult};
use tracing::{info, warn};

use super::Chamber;
use crate::error::SimulationError;
use crate::pipeline::StageName;
use crate::state::SimulationState;

const STAGE: StageName = StageName::ThresholdDecision;

/// What the floor tally alone says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloorVerdict {
    Pass,
    Killed,
    Tied,
}

pub fn floor_verdict(result: &VoteResult) -> FloorVerdict {
    use std::cmp::Ordering;
    match result.yes_count().cmp(&result.no_count()) {
        Ordering::Greater => FloorVerdict::Pass,
        Ordering::Less => FloorVerdict::Killed,
        Ordering::Equal => FloorVerdict::Tied,
    }
}

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    let Some(result) = state.vote_result.as_ref() else {
        warn!("no floor vote recorded; outcome unknown");
        state.final_outcome = Some(Outcome::Unknown);
        return Ok(());
    };

    let verdict = floor_verdict(result);
    let line = format!(
        "[Decision] Outcome: {} (yes={}, no={}, abstain={})",
        match verdict {
            FloorVerdict::Pass => "PASS",
            FloorVerdict::Killed => "KILLED",
            FloorVerdict::Tied => "POPULAR_VOTE_REQUIRED",
        },
        result.yes_count(),
        result.no_count(),
        result.abstain_count()
    );
    info!("{}", line);
    state.log_interaction(STAGE, EventKind::Decision, line);

    let outcome = match verdict {
        FloorVerdict::Pass => Outcome::Pass,
        FloorVerdict::Killed => Outcome::Killed,
        FloorVerdict::Tied => match chamber.popular_vote.as_mut() {
            Some(popular_vote) => {
                let tally = popular_vote.run();
                let outcome = if tally.passed() {
                    Outcome::Pass
                } else {
                    Outcome::Killed
                };
                state.log_interaction(
                    STAGE,
                    EventKind::Decision,
                    format!(
                        "[Decision] Final outcome after popular vote: {} (yes={}, no={})",
                        outcome, tally.yes, tally.no
                    ),
                );
                outcome
            }
            None => {
                warn!("floor vote tied and no popular vote is configured");
                Outcome::Killed
            }
        },
    };

    info!(%outcome, "threshold decision");
    state.final_outcome = Some(outcome);
    Ok(())
}
