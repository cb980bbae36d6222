//! Judge Assign Agency
//!
//! The judge picks the agency that owns the bill. A complete score map
//! outranks the judge's named pick; an unknown pick or a failed judge falls
//! back to scope-keyword matching against the raw text.

use tracing::{info, warn};

use super::Chamber;
use crate::components::Agency;
use crate::contract::JudgeDecision;
use crate::error::SimulationError;
use crate::state::SimulationState;

/// How the owning agency was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentSource {
    ScoreMap,
    NamedPick,
    KeywordFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub agency_id: String,
    pub decision: JudgeDecision,
    pub source: AssignmentSource,
}

/// Agency with the most scope-keyword hits in the text. Ties go to the
/// agency listed first.
pub fn keyword_match<'a>(agencies: &'a [Agency], text: &str) -> Option<&'a Agency> {
    let lower = text.to_lowercase();
    let mut best: Option<(&Agency, usize)> = None;
    for agency in agencies {
        let hits = agency.keyword_hits(&lower);
        if best.map_or(true, |(_, top)| hits > top) {
            best = Some((agency, hits));
        }
    }
    best.map(|(agency, _)| agency)
}

/// Turn the judge's answer (if any) into an assignment.
pub fn resolve_assignment(
    decision: Option<JudgeDecision>,
    agencies: &[Agency],
    bill_text: &str,
) -> Option<Assignment> {
    if let Some(decision) = decision {
        if let Some(agency) = decision.best_scored(agencies) {
            return Some(Assignment {
                agency_id: agency.id().to_string(),
                decision,
                source: AssignmentSource::ScoreMap,
            });
        }
        let named = decision
            .selected_agency_id
            .as_deref()
            .and_then(|id| agencies.iter().find(|a| a.id() == id));
        if let Some(agency) = named {
            return Some(Assignment {
                agency_id: agency.id().to_string(),
                decision,
                source: AssignmentSource::NamedPick,
            });
        }
        warn!(
            selected = ?decision.selected_agency_id,
            "judge picked an unknown agency; using keyword match"
        );
        let agency = keyword_match(agencies, bill_text)?;
        return Some(Assignment {
            agency_id: agency.id().to_string(),
            decision,
            source: AssignmentSource::KeywordFallback,
        });
    }

    let agency = keyword_match(agencies, bill_text)?;
    Some(Assignment {
        agency_id: agency.id().to_string(),
        decision: JudgeDecision::fallback(agency.id(), "Fallback keyword match due to judge error."),
        source: AssignmentSource::KeywordFallback,
    })
}

pub fn run(chamber: &mut Chamber, state: &mut SimulationState) -> Result<(), SimulationError> {
    info!("[Judge] Selecting agency...");
    let agencies = chamber.legislature.agencies();

    let decision = match chamber.legislature.judge().decide(&state.bill, agencies) {
        Ok(decision) => Some(decision),
        Err(e) => {
            warn!(error = %e, "judge failed; using keyword match");
            None
        }
    };

    let assignment = resolve_assignment(decision, agencies, state.bill.raw_text())
        .ok_or(SimulationError::NoAgencyAssigned)?;
    let agency_name = chamber
        .legislature
        .agency(&assignment.agency_id)
        .map(|a| a.name().to_string())
        .unwrap_or_default();
    info!(
        agency = %agency_name,
        source = ?assignment.source,
        confidence = assignment.decision.confidence,
        "[Judge] Assigned agency: {}",
        assignment.agency_id
    );
    info!("[Judge] Rationale: {}", assignment.decision.rationale);

    state.selected_agency_id = Some(assignment.agency_id);
    state.judge_decision = Some(assignment.decision);
    Ok(())
}
