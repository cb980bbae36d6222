//! Roster and Legislature
//!
//! The roster is the on-disk description of agencies and representatives.
//! The legislature is the live registry built from it: agencies, politician
//! agents, the judge and the shared social graph.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use super::{read_file, SetupError};
use crate::agents::{Agent, Judge, Politician, TokenBudget, TurnPolicy};
use crate::components::{Agency, PoliticianProfile, RepInfo, RosterError, SocialGraph};
use crate::oracle::Oracle;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AgencyConfig {
    pub id: String,
    pub name: String,
    pub scope_keywords: Vec<String>,
    pub representative_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepresentativeConfig {
    pub id: String,
    pub name: String,
    pub party: String,
    pub ideology: BTreeMap<String, f64>,
    pub red_lines: Vec<String>,
    pub pet_issues: Vec<String>,
    pub speaking_style: String,
}

impl RepresentativeConfig {
    fn profile(&self) -> PoliticianProfile {
        PoliticianProfile {
            party: self.party.clone(),
            ideology: self.ideology.clone(),
            red_lines: self.red_lines.clone(),
            pet_issues: self.pet_issues.clone(),
            speaking_style: self.speaking_style.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub agencies: Vec<AgencyConfig>,
    pub representatives: Vec<RepresentativeConfig>,
}

impl Roster {
    /// Load the two roster files, each a JSON array.
    pub fn load(
        agencies_path: impl AsRef<Path>,
        representatives_path: impl AsRef<Path>,
    ) -> Result<Self, SetupError> {
        Ok(Self {
            agencies: load_json_array(agencies_path.as_ref())?,
            representatives: load_json_array(representatives_path.as_ref())?,
        })
    }
}

fn load_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, SetupError> {
    let raw = read_file(path)?;
    serde_json::from_str(&raw).map_err(|source| SetupError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings the legislature passes on to its agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSettings {
    pub turn_policy: TurnPolicy,
    pub judge_budget: TokenBudget,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            turn_policy: TurnPolicy::default(),
            judge_budget: TokenBudget {
                first: 200,
                retry: 800,
            },
        }
    }
}

const HONORIFICS: &[&str] = &[
    "rep",
    "representative",
    "sen",
    "senator",
    "congressman",
    "congresswoman",
    "hon",
    "honorable",
    "mr",
    "mrs",
    "ms",
    "dr",
];

/// Lowercased name tokens without punctuation or leading honorifics.
fn name_tokens(name: &str) -> Vec<String> {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .skip_while(|t| HONORIFICS.contains(t))
        .map(str::to_string)
        .collect()
}

pub struct Legislature {
    agencies: Vec<Agency>,
    agency_index: HashMap<String, usize>,
    politicians: Vec<Politician>,
    rep_index: HashMap<String, usize>,
    /// rep id -> index of the first agency seating them
    committee_of: HashMap<String, usize>,
    judge: Judge,
    social: SocialGraph,
}

impl Legislature {
    /// Build the legislature. Every agency must seat exactly three known
    /// representatives; a representative seated twice belongs to the first
    /// agency that lists them. Representatives no agency seats are skipped.
    pub fn build(
        roster: Roster,
        oracle: Arc<dyn Oracle>,
        settings: AgentSettings,
    ) -> Result<Self, RosterError> {
        if roster.agencies.is_empty() {
            return Err(RosterError::NoAgencies);
        }

        let mut reps_by_id: HashMap<String, RepresentativeConfig> = HashMap::new();
        for rep in roster.representatives {
            if reps_by_id.contains_key(&rep.id) {
                return Err(RosterError::DuplicateRepresentative(rep.id));
            }
            reps_by_id.insert(rep.id.clone(), rep);
        }

        let mut legislature = Self {
            agencies: Vec::new(),
            agency_index: HashMap::new(),
            politicians: Vec::new(),
            rep_index: HashMap::new(),
            committee_of: HashMap::new(),
            judge: Judge::new(Arc::clone(&oracle), settings.judge_budget),
            social: SocialGraph::new(),
        };

        for config in roster.agencies {
            if legislature.agency_index.contains_key(&config.id) {
                return Err(RosterError::DuplicateAgency(config.id));
            }
            let agency = Agency::new(
                config.id,
                config.name,
                config.scope_keywords,
                config.representative_ids,
            )?;
            let agency_pos = legislature.agencies.len();

            for rep_id in agency.representative_ids() {
                let rep = reps_by_id
                    .get(rep_id)
                    .ok_or_else(|| RosterError::UnknownRepresentative {
                        agency_id: agency.id().to_string(),
                        rep_id: rep_id.clone(),
                    })?;
                if legislature.rep_index.contains_key(rep_id) {
                    warn!(rep_id = %rep_id, agency = agency.id(), "representative already seated; keeping first committee");
                    continue;
                }

                let politician = Politician::new(
                    rep.id.clone(),
                    rep.name.clone(),
                    rep.profile(),
                    Arc::clone(&oracle),
                    settings.turn_policy,
                )
                .with_committee(agency.id(), agency.name());
                legislature.social.register_representative(RepInfo::new(
                    rep.id.clone(),
                    rep.name.clone(),
                    agency.id(),
                    agency.name(),
                ));
                legislature
                    .rep_index
                    .insert(rep_id.clone(), legislature.politicians.len());
                legislature.committee_of.insert(rep_id.clone(), agency_pos);
                legislature.politicians.push(politician);
            }

            legislature
                .agency_index
                .insert(agency.id().to_string(), agency_pos);
            legislature.agencies.push(agency);
        }

        let seated: HashSet<&str> = legislature.rep_index.keys().map(String::as_str).collect();
        for id in reps_by_id.keys().filter(|id| !seated.contains(id.as_str())) {
            warn!(rep_id = %id, "representative is not seated on any agency; skipped");
        }

        Ok(legislature)
    }

    pub fn agencies(&self) -> &[Agency] {
        &self.agencies
    }

    pub fn agency(&self, agency_id: &str) -> Option<&Agency> {
        self.agency_index.get(agency_id).map(|&i| &self.agencies[i])
    }

    pub fn politicians(&self) -> &[Politician] {
        &self.politicians
    }

    pub fn politician(&self, rep_id: &str) -> Option<&Politician> {
        self.rep_index.get(rep_id).map(|&i| &self.politicians[i])
    }

    /// Representative ids in ascending order.
    pub fn rep_ids_sorted(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rep_index.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Display name, falling back to the id.
    pub fn rep_name<'a>(&'a self, rep_id: &'a str) -> &'a str {
        self.politician(rep_id).map(|p| p.name()).unwrap_or(rep_id)
    }

    pub fn committee_of(&self, rep_id: &str) -> Option<&Agency> {
        self.committee_of.get(rep_id).map(|&i| &self.agencies[i])
    }

    pub fn judge(&self) -> &Judge {
        &self.judge
    }

    pub fn social(&self) -> &SocialGraph {
        &self.social
    }

    pub fn social_mut(&mut self) -> &mut SocialGraph {
        &mut self.social
    }

    /// A politician together with the graph its prompt reads from.
    pub fn turn_parts(&mut self, rep_id: &str) -> Option<(&mut Politician, &SocialGraph)> {
        let index = *self.rep_index.get(rep_id)?;
        Some((&mut self.politicians[index], &self.social))
    }

    /// Resolve a free-text name to a representative id.
    ///
    /// Tries an exact name match (ignoring case, punctuation and honorifics),
    /// then an exact id match, then a surname match when only one
    /// representative carries that surname.
    pub fn resolve_rep_name(&self, target: &str) -> Option<&str> {
        let wanted = name_tokens(target);
        let last = wanted.last()?;

        if let Some(p) = self.politicians.iter().find(|p| name_tokens(p.name()) == wanted) {
            return Some(p.id());
        }
        if let Some(p) = self
            .politicians
            .iter()
            .find(|p| p.id().eq_ignore_ascii_case(target.trim()))
        {
            return Some(p.id());
        }

        let mut surname_matches = self
            .politicians
            .iter()
            .filter(|p| name_tokens(p.name()).last() == Some(last));
        match (surname_matches.next(), surname_matches.next()) {
            (Some(p), None) => Some(p.id()),
            _ => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::oracle::ScriptedOracle;

    pub(crate) fn agency_config(id: &str, reps: &[&str]) -> AgencyConfig {
        AgencyConfig {
            id: id.to_string(),
            name: format!("{} Committee", id),
            scope_keywords: vec![id.to_string()],
            representative_ids: reps.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub(crate) fn rep_config(id: &str, name: &str) -> RepresentativeConfig {
        RepresentativeConfig {
            id: id.to_string(),
            name: name.to_string(),
            party: "Independent".to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn sample_roster() -> Roster {
        Roster {
            agencies: vec![
                agency_config("energy", &["r1", "r2", "r3"]),
                agency_config("health", &["r4", "r5", "r6"]),
            ],
            representatives: vec![
                rep_config("r1", "Ada Park"),
                rep_config("r2", "Lee Chen"),
                rep_config("r3", "Sam Ortiz"),
                rep_config("r4", "Rosa Diaz"),
                rep_config("r5", "Tom Park"),
                rep_config("r6", "Kim Lowe"),
            ],
        }
    }

    fn build(roster: Roster) -> Result<Legislature, RosterError> {
        Legislature::build(roster, Arc::new(ScriptedOracle::new()), AgentSettings::default())
    }

    #[test]
    fn test_build_registers_everyone() {
        let legislature = build(sample_roster()).unwrap();
        assert_eq!(legislature.agencies().len(), 2);
        assert_eq!(legislature.politicians().len(), 6);
        assert_eq!(legislature.social().len(), 6);
        assert_eq!(legislature.committee_of("r5").map(|a| a.id()), Some("health"));
        assert_eq!(legislature.politician("r1").unwrap().committee_name(), "energy Committee");
        assert_eq!(legislature.rep_ids_sorted()[0], "r1");
        assert_eq!(legislature.rep_name("r2"), "Lee Chen");
        assert_eq!(legislature.rep_name("ghost"), "ghost");
    }

    #[test]
    fn test_build_rejects_bad_rosters() {
        let mut roster = sample_roster();
        roster.agencies[1].representative_ids.pop();
        assert!(matches!(build(roster), Err(RosterError::CommitteeSize { count: 2, .. })));

        let mut roster = sample_roster();
        roster.agencies[1].representative_ids[2] = "r99".to_string();
        assert!(matches!(build(roster), Err(RosterError::UnknownRepresentative { .. })));

        let mut roster = sample_roster();
        roster.agencies[1].id = "energy".to_string();
        assert_eq!(build(roster).err(), Some(RosterError::DuplicateAgency("energy".to_string())));

        let mut roster = sample_roster();
        roster.representatives.push(rep_config("r1", "Ada Again"));
        assert!(matches!(build(roster), Err(RosterError::DuplicateRepresentative(_))));

        assert_eq!(build(Roster::default()).err(), Some(RosterError::NoAgencies));
    }

    #[test]
    fn test_shared_seat_keeps_first_committee() {
        let mut roster = sample_roster();
        roster.agencies.push(agency_config("water", &["r1", "r4", "r6"]));
        let legislature = build(roster).unwrap();
        assert_eq!(legislature.politicians().len(), 6);
        assert_eq!(legislature.committee_of("r1").map(|a| a.id()), Some("energy"));
        assert!(legislature.agency("water").unwrap().seats("r1"));
    }

    #[test]
    fn test_resolve_rep_name() {
        let legislature = build(sample_roster()).unwrap();
        assert_eq!(legislature.resolve_rep_name("Lee Chen"), Some("r2"));
        assert_eq!(legislature.resolve_rep_name("  rep. lee   chen "), Some("r2"));
        assert_eq!(legislature.resolve_rep_name("Senator Ortiz"), Some("r3"));
        assert_eq!(legislature.resolve_rep_name("R4"), Some("r4"));
        // Two Parks: surname alone is ambiguous
        assert_eq!(legislature.resolve_rep_name("Rep. Park"), None);
        assert_eq!(legislature.resolve_rep_name("Ada Park"), Some("r1"));
        assert_eq!(legislature.resolve_rep_name("Nobody Known"), None);
        assert_eq!(legislature.resolve_rep_name("   "), None);
    }

    #[test]
    fn test_roster_loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let agencies = dir.path().join("agencies.json");
        let reps = dir.path().join("representatives.json");
        std::fs::write(
            &agencies,
            r#"[{"id":"energy","name":"Energy","scopeKeywords":["solar"],"representativeIds":["a","b","c"]}]"#,
        )
        .unwrap();
        std::fs::write(
            &reps,
            r#"[{"id":"a","name":"A","ideology":{"economic":0.3}},{"id":"b","name":"B"},{"id":"c","name":"C","redLines":["x"]}]"#,
        )
        .unwrap();

        let roster = Roster::load(&agencies, &reps).unwrap();
        assert_eq!(roster.agencies[0].scope_keywords, vec!["solar"]);
        assert_eq!(roster.representatives[2].red_lines, vec!["x"]);
        assert_eq!(roster.representatives[0].ideology["economic"], 0.3);

        assert!(matches!(
            Roster::load(dir.path().join("nope.json"), &reps),
            Err(SetupError::Io { .. })
        ));
    }
}
