//! Parse Bill
//!
//! Asks the analyst for topics, cost, attributes and a one-pager. When the
//! analyst cannot produce a valid reply the bill keeps a truncated copy of
//! its raw text as the one-pager and the run continues.

use tracing::{info, warn};

use super::Chamber;
use crate::agents::{consult, prompts, TokenBudget};
use crate::contract::analysis::fallback_analysis;
use crate::contract::parse_bill_analysis;
use crate::error::SimulationError;
use crate::state::SimulationState;

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    if state.bill.is_analyzed() {
        return Ok(());
    }

    let prompt = prompts::parse_bill(&state.bill);
    let budget = TokenBudget {
        first: chamber.settings.parse_tokens,
        retry: chamber.settings.parse_retry_tokens,
    };
    let analysis = match consult(chamber.oracle.as_ref(), &prompt, budget, "analyst", parse_bill_analysis) {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!(error = %e, "bill analysis failed; using raw text as one-pager");
            fallback_analysis(state.bill.raw_text())
        }
    };

    info!(
        topics = analysis.topics.len(),
        estimated_cost = analysis.estimated_cost,
        "[ParseBill] one-pager ready"
    );
    state.bill.apply_analysis(analysis);
    Ok(())
}
