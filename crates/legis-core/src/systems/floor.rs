//! Primary Floor Debate
//!
//! An advocate from the owning agency opens, then one randomly chosen member
//! from each of a sample of agencies takes the floor. The floor vote is read
//! off the sampled speakers.

use legis_events::EventKind;
use rand::seq::SliceRandom;
use tracing::info;

use super::{bill_rng, log_lobby_intents, summary_line, Chamber};
use crate::agents::TurnMode;
use crate::components::Agency;
use crate::contract::AgentOutput;
use crate::error::SimulationError;
use crate::pipeline::StageName;
use crate::state::{SimulationState, TurnOutputs};

const STAGE: StageName = StageName::PrimaryFloorDebate;

/// Append a line to a summary and keep only the last `max_lines` lines.
pub fn append_summary(existing: &str, line: &str, max_lines: usize) -> String {
    let combined = if existing.trim().is_empty() {
        line.to_string()
    } else {
        format!("{}\n{}", existing, line)
    };
    let lines: Vec<&str> = combined.lines().collect();
    if lines.len() <= max_lines {
        return combined;
    }
    lines[lines.len() - max_lines..].join("\n")
}

fn log_reason(prefix: &str, output: &AgentOutput) {
    let reason = output.headline_reason().trim();
    if !reason.is_empty() {
        info!("[{}] Reason ({}): {}", prefix, output.vote_intent().label(), reason);
    }
}

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    info!("== PRIMARY FLOOR DEBATE ==");
    let max_lines = chamber.settings.floor_summary_lines.max(1);
    let mut rng = bill_rng(state.bill.id());
    let mut summary = state.committee_summary.clone();

    let owning_agency = state
        .selected_agency_id
        .as_deref()
        .and_then(|id| chamber.legislature.agency(id));
    let advocate_id = match owning_agency {
        Some(agency) => agency.representative_ids().choose(&mut rng).cloned(),
        None => chamber.legislature.rep_ids_sorted().choose(&mut rng).cloned(),
    };

    let mut advocate_output: Option<AgentOutput> = None;
    if let Some(advocate_id) = advocate_id.as_deref() {
        let name = chamber.legislature.rep_name(advocate_id).to_string();
        info!("[Advocate] {} is advocating for the bill...", name);
        let output = chamber.take_turn(advocate_id, state, &summary, None, TurnMode::Advocate, true)?;
        log_reason("Advocate", &output);

        state.log_interaction(
            STAGE,
            EventKind::AdvocateTurn,
            format!("[Advocate] {} speaks: {}", name, output.stance()),
        );
        log_lobby_intents(state, STAGE, &name, &output);
        summary = append_summary(&summary, &summary_line(&name, &output), max_lines);
        advocate_output = Some(output);
    }

    let mut agencies: Vec<Agency> = chamber.legislature.agencies().to_vec();
    agencies.sort_by(|a, b| a.id().cmp(b.id()));
    agencies.shuffle(&mut rng);
    agencies.truncate(chamber.settings.agencies_to_vote.min(agencies.len()));
    info!(
        "[Floor] Agencies voting: {:?}",
        agencies.iter().map(Agency::name).collect::<Vec<_>>()
    );

    let mut outputs = TurnOutputs::new();
    for agency in &agencies {
        let Some(rep_id) = agency.representative_ids().choose(&mut rng) else {
            continue;
        };
        let name = chamber.legislature.rep_name(rep_id).to_string();
        info!("[Floor] {} -> {} is taking the floor...", agency.name(), name);

        let output = match (&advocate_output, advocate_id.as_deref()) {
            (Some(output), Some(advocate)) if advocate == rep_id => output.clone(),
            _ => chamber.take_turn(rep_id, state, &summary, None, TurnMode::Ordinary, true)?,
        };
        log_reason("Floor", &output);

        summary = append_summary(&summary, &summary_line(&name, &output), max_lines);
        state.log_interaction(
            STAGE,
            EventKind::FloorTurn,
            format!(
                "[Floor] {} speaks: {} (vote {})",
                name,
                output.stance(),
                output.vote_intent()
            ),
        );
        log_lobby_intents(state, STAGE, &name, &output);
        outputs.insert(rep_id.clone(), output);
    }

    state.floor_summary = summary;
    state.vote_result = Some(outputs.to_vote_result());
    state.last_turn_outputs = outputs;
    Ok(())
}
