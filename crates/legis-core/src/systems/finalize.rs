//! Finalize
//!
//! Settles the outcome and announces it. A revision still pending here never
//! got its second vote, so the bill stays KILLED.

use legis_events::Outcome;
use tracing::info;

use super::Chamber;
use crate::error::SimulationError;
use crate::state::SimulationState;

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    if state.final_outcome == Some(Outcome::RevisionPending) {
        state.final_outcome = Some(Outcome::Killed);
    }
    let outcome = state.outcome();

    match state.vote_result.as_ref() {
        Some(result) => info!(
            %outcome,
            yes = result.yes_count(),
            no = result.no_count(),
            abstain = result.abstain_count(),
            revisions = state.revisions_taken,
            "[Final] {}",
            state.bill.title()
        ),
        None => info!(%outcome, revisions = state.revisions_taken, "[Final] {}", state.bill.title()),
    }
    chamber.status.outcome(outcome);
    Ok(())
}
