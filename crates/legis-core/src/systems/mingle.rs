//! Session Mingle
//!
//! Early-session introductions. Representatives are shuffled and paired off
//! for up to two rounds so everyone learns a few other committees before
//! lobbying starts.

use legis_events::EventKind;
use rand::seq::SliceRandom;
use std::collections::HashSet;
use tracing::info;

use super::{bill_rng, graph_line, Chamber};
use crate::error::SimulationError;
use crate::pipeline::StageName;
use crate::state::SimulationState;

const STAGE: StageName = StageName::SessionMingle;
const MAX_ROUNDS: usize = 2;

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    let rep_ids = chamber.legislature.rep_ids_sorted();
    if rep_ids.len() < 2 {
        return Ok(());
    }
    info!("== SESSION: NETWORKING ==");

    let mut rng = bill_rng(state.bill.id());
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let rounds = MAX_ROUNDS.min(rep_ids.len() - 1).max(1);

    for _ in 0..rounds {
        let mut shuffled = rep_ids.clone();
        shuffled.shuffle(&mut rng);

        for pair in shuffled.chunks_exact(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let key = if a < b {
                (a.clone(), b.clone())
            } else {
                (b.clone(), a.clone())
            };
            if !seen.insert(key) {
                continue;
            }

            chamber.legislature.social_mut().record_meet(a, b)?;

            let legislature = &chamber.legislature;
            let committee_name = |id: &str| {
                legislature
                    .committee_of(id)
                    .map(|c| c.name().to_string())
                    .unwrap_or_else(|| "(unknown committee)".to_string())
            };
            let line = format!(
                "[Meet] {} meets {} (committees: {} / {})",
                legislature.rep_name(a),
                legislature.rep_name(b),
                committee_name(a),
                committee_name(b)
            );
            info!("{}", line);
            let graph_lines = [graph_line(legislature, a, b), graph_line(legislature, b, a)];

            state.log_interaction(STAGE, EventKind::Meet, line.clone());
            state.log_relationship(line);
            for graph in graph_lines.into_iter().flatten() {
                state.log_relationship(graph);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::ScriptedOracle;
    use crate::systems::tests::{chamber_with, sample_state};
    use std::sync::Arc;

    #[test]
    fn test_mingle_pairs_are_unique_and_symmetric() {
        let mut chamber = chamber_with(Arc::new(ScriptedOracle::new()));
        let mut state = sample_state();
        run(&mut chamber, &mut state).unwrap();

        let meets: Vec<&str> = state
            .interactions()
            .of_kind(EventKind::Meet)
            .map(|e| e.text.as_str())
            .collect();
        // Six reps, two rounds of three pairs, minus any repeated pair
        assert!(!meets.is_empty() && meets.len() <= 6);
        assert!(meets.iter().all(|m| m.starts_with("[Meet] ")));

        let social = chamber.legislature().social();
        for rep in social.representatives() {
            for rel in social.relationships_for(&rep.id) {
                let back = social.relationship(&rel.other_id, &rep.id).unwrap();
                assert_eq!(back.times_met, rel.times_met);
                assert_eq!(rel.times_met, 1);
            }
        }
        assert_eq!(social.clock() as usize, meets.len());
        assert_eq!(state.relationship_log().len(), meets.len() * 3);
    }

    #[test]
    fn test_mingle_is_deterministic_per_bill() {
        let lines = |bill_state: &mut SimulationState| {
            let mut chamber = chamber_with(Arc::new(ScriptedOracle::new()));
            run(&mut chamber, bill_state).unwrap();
            bill_state
                .interactions()
                .events()
                .iter()
                .map(|e| e.text.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(lines(&mut sample_state()), lines(&mut sample_state()));
    }
}
