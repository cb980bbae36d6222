//! Committee Deliberation
//!
//! The owning agency's three members speak in seat order. Each member may be
//! handed a debate target, a statement drawn from the peer reasoning log, to
//! rebut or back. The committee recap becomes the starting floor summary.

use legis_events::EventKind;
use rand::Rng;
use tracing::info;

use super::{bill_rng, log_lobby_intents, peer_line, summary_line, Chamber};
use crate::agents::TurnMode;
use crate::error::SimulationError;
use crate::pipeline::StageName;
use crate::state::{SimulationState, TurnOutputs};

const STAGE: StageName = StageName::CommitteeDeliberation;

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    let agency_id = state
        .selected_agency_id
        .clone()
        .ok_or(SimulationError::NoAgencyAssigned)?;
    let agency = chamber
        .legislature
        .agency(&agency_id)
        .cloned()
        .ok_or_else(|| SimulationError::UnknownAgency(agency_id.clone()))?;
    info!(agency = %agency.name(), "== COMMITTEE DELIBERATION ==");

    let mut rng = bill_rng(state.bill.id());
    let mut outputs = TurnOutputs::new();
    let mut summary = format!("Committee Summary ({})", agency.name());

    for rep_id in agency.representative_ids() {
        let debate_target = if state.peer_reasoning.is_empty() {
            None
        } else {
            let index = rng.gen_range(0..state.peer_reasoning.len());
            state.peer_reasoning.get(index).map(str::to_string)
        };

        let output = chamber.take_turn(
            rep_id,
            state,
            &state.floor_summary,
            debate_target.as_deref(),
            TurnMode::Ordinary,
            false,
        )?;

        let name = chamber.legislature.rep_name(rep_id).to_string();
        state.peer_reasoning.push(peer_line(&name, agency.name(), &output));
        state.log_interaction(
            STAGE,
            EventKind::CommitteeTurn,
            format!(
                "[Committee] {} speaks: {} (vote {})",
                name,
                output.stance(),
                output.vote_intent()
            ),
        );
        log_lobby_intents(state, STAGE, &name, &output);

        summary.push_str("\n- ");
        summary.push_str(&summary_line(&name, &output));
        outputs.insert(rep_id.clone(), output);
    }

    state.committee_summary = summary.clone();
    state.floor_summary = summary;
    state.last_turn_outputs = outputs;
    Ok(())
}
