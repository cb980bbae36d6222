//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use legis_core::agents::TurnPolicy;
use legis_core::setup::{AgencyConfig, AgentSettings, Legislature, RepresentativeConfig, Roster};
use legis_core::voting::ScriptedBallots;
use legis_core::{
    Bill, Chamber, ChamberSettings, ParseMode, PopularVote, ScriptedOracle, Simulation, StatusSink,
    VoteBox,
};
use std::path::Path;
use std::sync::Arc;

pub const ENERGY: [(&str, &str); 3] = [("r1", "Ada Park"), ("r2", "Lee Chen"), ("r3", "Sam Ortiz")];
pub const HEALTH: [(&str, &str); 3] = [("r4", "Rosa Diaz"), ("r5", "Tom Reyes"), ("r6", "Kim Lowe")];

pub const ANALYSIS: &str = r#"{"topics":["energy"],"estimatedCost":2500000,"attributes":{"sponsor":"r1"},"onePager":"Grants for rooftop solar on public schools."}"#;
pub const PICK_ENERGY: &str = r#"{"selectedAgencyId":"energy","rationale":"Solar is energy policy.","confidence":0.8}"#;
pub const DRAFT: &str = r#"{"revisedBillText":"A two-year pilot in ten districts.","revisionSummary":"Cut to a pilot.","keyChanges":["Ten districts","Two years"]}"#;

fn agency(id: &str, keywords: &[&str], reps: &[(&str, &str)]) -> AgencyConfig {
    AgencyConfig {
        id: id.to_string(),
        name: format!("{} Committee", capitalize(id)),
        scope_keywords: keywords.iter().map(|k| k.to_string()).collect(),
        representative_ids: reps.iter().map(|(rep_id, _)| rep_id.to_string()).collect(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn roster() -> Roster {
    Roster {
        agencies: vec![
            agency("energy", &["solar", "grid", "energy"], &ENERGY),
            agency("health", &["hospital", "clinic", "health"], &HEALTH),
        ],
        representatives: ENERGY
            .iter()
            .chain(HEALTH.iter())
            .map(|(id, name)| RepresentativeConfig {
                id: id.to_string(),
                name: name.to_string(),
                party: "Independent".to_string(),
                ..Default::default()
            })
            .collect(),
    }
}

pub fn solar_bill() -> Bill {
    Bill::new(
        "hr-101",
        "School Solar Act",
        "School Solar Act\nProvides grants for solar panels on public school roofs.",
    )
}

/// A politician turn reply.
pub fn turn(vote: &str, targets: &[&str]) -> String {
    serde_json::json!({
        "speech": format!("My vote is {}.", vote),
        "proposedAmendments": [],
        "stance": "undecided",
        "voteIntent": vote,
        "confidence": 0.7,
        "reasons": [format!("Position {}", vote)],
        "targetsToLobby": targets
    })
    .to_string()
}

/// Prompt marker matching both ordinary and advocate turns of one member.
pub fn member(name: &str) -> String {
    format!("You are {},", name)
}

/// Scripted oracle where every member of a committee votes the same way.
pub fn bloc_oracle(energy_vote: &str, health_vote: &str) -> ScriptedOracle {
    let mut oracle = ScriptedOracle::new()
        .on("legislative analyst", ANALYSIS)
        .on("LLM Judge", PICK_ENERGY)
        .on("drafting staff", DRAFT);
    for (_, name) in ENERGY {
        oracle = oracle.on(member(name), turn(energy_vote, &[]));
    }
    for (_, name) in HEALTH {
        oracle = oracle.on(member(name), turn(health_vote, &[]));
    }
    oracle
}

pub fn settings(max_revisions: u32) -> ChamberSettings {
    ChamberSettings {
        max_revisions,
        ..ChamberSettings::default()
    }
}

pub fn chamber(
    oracle: Arc<ScriptedOracle>,
    settings: ChamberSettings,
    mode: ParseMode,
    status: Arc<dyn StatusSink>,
) -> Chamber {
    let agent_settings = AgentSettings {
        turn_policy: TurnPolicy {
            mode,
            ..TurnPolicy::default()
        },
        ..AgentSettings::default()
    };
    let legislature =
        Legislature::build(roster(), oracle.clone(), agent_settings).expect("roster is valid");
    Chamber::new(legislature, oracle, status, settings)
}

pub fn simulation(chamber: Chamber, status: Arc<dyn StatusSink>, dir: &Path) -> Simulation {
    Simulation::new(chamber, status, dir)
}

pub fn public_vote(yes: u32, no: u32) -> PopularVote {
    PopularVote::new(Arc::new(VoteBox::new()), Box::new(ScriptedBallots::counts(yes, no)))
}
