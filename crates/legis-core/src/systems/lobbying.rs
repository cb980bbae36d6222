//! Pre-Floor Lobbying
//!
//! Turns the lobby targets named during committee into one-to-one notes
//! delivered before the floor debate. No oracle calls: each note summarizes
//! the lobbyist's own stance and first reason.

use legis_events::EventKind;
use tracing::{debug, info};

use super::{graph_line, Chamber};
use crate::contract::normalize::truncate_chars;
use crate::contract::AgentOutput;
use crate::error::SimulationError;
use crate::pipeline::StageName;
use crate::state::SimulationState;

const STAGE: StageName = StageName::PreFloorLobbying;

/// Longest first reason quoted in a note
pub const NOTE_REASON_CHARS: usize = 220;

/// Persuasion note, e.g.
/// `I'm support (vote YES). From Energy Committee, It creates jobs.`
pub fn lobby_note(committee_name: &str, output: &AgentOutput) -> String {
    let mut note = format!("I'm {} (vote {}). ", output.stance(), output.vote_intent());
    if !committee_name.trim().is_empty() {
        note.push_str("From ");
        note.push_str(committee_name.trim());
        note.push_str(", ");
    }
    note.push_str(&truncate_chars(output.headline_reason().trim(), NOTE_REASON_CHARS));
    note.trim().to_string()
}

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    if state.last_turn_outputs.is_empty() {
        return Ok(());
    }
    info!("== SESSION: PRE-FLOOR LOBBYING ==");

    // (lobbyist id, target id, note)
    let mut deliveries: Vec<(String, String, String)> = Vec::new();
    for (lobbyist_id, output) in state.last_turn_outputs.iter() {
        if output.targets_to_lobby().is_empty() {
            continue;
        }
        let legislature = &chamber.legislature;
        let committee_name = legislature
            .committee_of(lobbyist_id)
            .map(|c| c.name())
            .unwrap_or_default();

        for target in output.targets_to_lobby() {
            let Some(target_id) = legislature.resolve_rep_name(target) else {
                debug!(lobbyist = lobbyist_id, target = %target, "unresolved lobby target");
                continue;
            };
            if target_id == lobbyist_id {
                continue;
            }
            deliveries.push((
                lobbyist_id.to_string(),
                target_id.to_string(),
                lobby_note(committee_name, output),
            ));
        }
    }

    for (lobbyist_id, target_id, note) in deliveries {
        chamber
            .legislature
            .social_mut()
            .record_lobby(&lobbyist_id, &target_id, &note)?;

        let legislature = &chamber.legislature;
        let lobbyist_name = legislature.rep_name(&lobbyist_id).to_string();
        let target_name = legislature.rep_name(&target_id).to_string();
        let graph = graph_line(legislature, &lobbyist_id, &target_id);

        let line = format!("[{}] persuades [{}]: {}", lobbyist_name, target_name, note);
        info!("{}", line);
        state.log_interaction(STAGE, EventKind::Persuasion, line);
        state.log_relationship(format!("[DM] {} -> {}: {}", lobbyist_name, target_name, note));
        if let Some(graph) = graph {
            state.log_relationship(graph);
        }
        state.deliver(&target_id, &lobbyist_name, note);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ScriptedOracle;
    use crate::systems::tests::{chamber_with, sample_state};
    use legis_events::Vote;
    use std::sync::Arc;

    fn lobbying(targets: &[&str]) -> AgentOutput {
        AgentOutput::new("speech", Vote::Yes, 0.8, vec!["It creates jobs.".to_string()])
            .with_lobby_targets(targets.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_note_format() {
        assert_eq!(
            lobby_note("Energy Committee", &lobbying(&[])),
            "I'm support (vote YES). From Energy Committee, It creates jobs."
        );
        let quiet = AgentOutput::new("", Vote::No, 0.5, vec![]);
        assert!(lobby_note("", &quiet).starts_with("I'm oppose (vote NO). "));
        let long = AgentOutput::new("", Vote::Yes, 0.5, vec!["x".repeat(300)]);
        assert!(lobby_note("", &long).ends_with("..."));
    }

    #[test]
    fn test_lobbying_delivers_and_records() {
        let mut chamber = chamber_with(Arc::new(ScriptedOracle::new()));
        let mut state = sample_state();
        state
            .last_turn_outputs
            .insert("r1", lobbying(&["Rep. Rosa Diaz", "Ortiz"]));
        run(&mut chamber, &mut state).unwrap();

        let inbox = state.inbox("r4").unwrap();
        assert_eq!(
            inbox["Ada Park"],
            "I'm support (vote YES). From energy Committee, It creates jobs."
        );
        assert!(state.inbox("r3").is_some());

        let social = chamber.legislature().social();
        let rel = social.relationship("r1", "r4").unwrap();
        assert_eq!(rel.times_lobbied, 1);
        assert!(social.relationship("r4", "r1").is_none());

        let lines: Vec<&str> = state
            .interactions()
            .of_kind(EventKind::Persuasion)
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[Ada Park] persuades [Rosa Diaz]: I'm support"));
        assert!(state.relationship_log().lines()[0].starts_with("[DM] Ada Park -> Rosa Diaz: "));
        assert!(state.relationship_log().lines()[1].starts_with("[Graph] Ada Park knows Rosa Diaz"));
    }

    #[test]
    fn test_unmatched_and_self_targets_are_dropped() {
        let mut chamber = chamber_with(Arc::new(ScriptedOracle::new()));
        let mut state = sample_state();
        state
            .last_turn_outputs
            .insert("r1", lobbying(&["Nobody Known", "Ada Park"]));
        state.last_turn_outputs.insert("r2", lobbying(&["Park"]));
        run(&mut chamber, &mut state).unwrap();

        assert!(state.direct_messages.is_empty());
        assert!(state.interactions().is_empty());
        assert_eq!(chamber.legislature().social().clock(), 0);
    }
}
