//! Revise Failed Bill
//!
//! After a KILLED outcome the owning agency's drafting staff redraft the
//! one-pager and the pipeline loops back to committee. Any drafting failure
//! leaves KILLED standing.

use legis_events::{EventKind, Outcome};
use tracing::{info, warn};

use super::Chamber;
use crate::agents::prompts;
use crate::contract::RevisionDraft;
use crate::error::SimulationError;
use crate::pipeline::StageName;
use crate::state::SimulationState;

const STAGE: StageName = StageName::ReviseFailedBill;

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    if state.final_outcome != Some(Outcome::Killed) {
        return Ok(());
    }
    if state.revisions_taken >= chamber.settings.max_revisions {
        info!(
            revisions = state.revisions_taken,
            "[Revise] Revision budget spent. KILLED stands."
        );
        return Ok(());
    }
    let Some(agency) = state
        .selected_agency_id
        .as_deref()
        .and_then(|id| chamber.legislature.agency(id))
    else {
        info!("[Revise] No agency assigned. Skipping revisions.");
        return Ok(());
    };

    let prompt = prompts::revise(agency, &state.bill, &state.committee_summary, &state.floor_summary);
    let agency_name = agency.name().to_string();
    let raw = match chamber
        .oracle
        .generate_json(&prompt, Some(chamber.settings.revise_tokens))
    {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "[Revise] Drafting call failed. Skipping revisions.");
            return Ok(());
        }
    };
    let Some(draft) = RevisionDraft::parse(&raw) else {
        warn!("[Revise] Draft had no revised text. Skipping revisions.");
        return Ok(());
    };

    info!("[Revise] Drafted revisions by {}.", agency_name);
    let mut line = format!("[Revise] {} redrafted the bill", agency_name);
    if !draft.summary.is_empty() {
        line.push_str(": ");
        line.push_str(&draft.summary);
    }
    if !draft.key_changes.is_empty() {
        info!("[Revise] Key changes: {}", draft.key_changes.join("; "));
    }
    state.log_interaction(STAGE, EventKind::Revision, line);

    state.bill.replace_one_pager(draft.one_pager());
    state.revision = Some(draft);
    state.floor_summary.clear();
    state.last_turn_outputs.clear();
    state.vote_result = None;
    state.final_outcome = Some(Outcome::RevisionPending);
    state.rerun_from = Some(StageName::CommitteeDeliberation);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::AgentOutput;
    use crate::oracle::{OracleError, ScriptedOracle};
    use crate::systems::tests::{chamber_with, sample_state};
    use legis_events::{Vote, VoteResult};
    use std::sync::Arc;

    const DRAFTING: &str = "drafting staff";
    const DRAFT: &str = r#"{"revisedBillText":"Pilot in ten districts.","revisionSummary":"Smaller pilot.","keyChanges":["Ten districts"]}"#;

    fn killed_state() -> SimulationState {
        let mut state = sample_state();
        state.selected_agency_id = Some("energy".to_string());
        state.final_outcome = Some(Outcome::Killed);
        state.floor_summary = "Lee Chen: oppose (vote NO) - Too costly.".to_string();
        state.vote_result = Some(VoteResult::from_iter([("r2", Vote::No)]));
        state
            .last_turn_outputs
            .insert("r2", AgentOutput::new("No.", Vote::No, 0.9, vec![]));
        state
    }

    #[test]
    fn test_successful_revision_requests_loop_back() {
        let oracle = Arc::new(ScriptedOracle::new().on(DRAFTING, DRAFT));
        let mut chamber = chamber_with(oracle.clone());
        let mut state = killed_state();
        run(&mut chamber, &mut state).unwrap();

        assert_eq!(state.rerun_from, Some(StageName::CommitteeDeliberation));
        assert_eq!(state.final_outcome, Some(Outcome::RevisionPending));
        assert!(state.bill.one_pager().contains("Revision summary: Smaller pilot."));
        assert_eq!(state.bill.raw_text(), "Funds rooftop solar for schools.");
        assert!(state.floor_summary.is_empty());
        assert!(state.last_turn_outputs.is_empty());
        assert!(state.vote_result.is_none());
        assert_eq!(state.interactions().of_kind(EventKind::Revision).count(), 1);
        assert_eq!(oracle.calls()[0].max_tokens, Some(600));
        assert!(oracle.calls()[0].prompt.contains("Too costly."));
    }

    #[test]
    fn test_failed_drafting_is_a_no_op() {
        for oracle in [
            ScriptedOracle::new().failing(DRAFTING, OracleError::Transport("down".to_string())),
            ScriptedOracle::new().on(DRAFTING, r#"{"revisedBillText":"   ","summary":"x"}"#),
            ScriptedOracle::new().on(DRAFTING, "no json here"),
        ] {
            let mut chamber = chamber_with(Arc::new(oracle));
            let mut state = killed_state();
            run(&mut chamber, &mut state).unwrap();
            assert_eq!(state.final_outcome, Some(Outcome::Killed));
            assert!(state.rerun_from.is_none());
            assert!(state.vote_result.is_some());
        }
    }

    #[test]
    fn test_revision_needs_killed_agency_and_budget() {
        let oracle = Arc::new(ScriptedOracle::new().on(DRAFTING, DRAFT));

        let mut chamber = chamber_with(oracle.clone());
        let mut passed = killed_state();
        passed.final_outcome = Some(Outcome::Pass);
        run(&mut chamber, &mut passed).unwrap();

        let mut unassigned = killed_state();
        unassigned.selected_agency_id = None;
        run(&mut chamber, &mut unassigned).unwrap();

        let mut spent = killed_state();
        spent.revisions_taken = 1;
        run(&mut chamber, &mut spent).unwrap();

        assert_eq!(oracle.call_count(), 0);
        assert!(passed.rerun_from.is_none() && unassigned.rerun_from.is_none() && spent.rerun_from.is_none());
    }
}
