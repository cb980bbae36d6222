//! Politician Agent

use std::sync::Arc;
use tracing::{debug, warn};

use super::memory::{render_social_memory, TurnMemory};
use super::{consult, prompts, Agent, AgentContext, AgentError, TokenBudget};
use crate::components::{PoliticianProfile, SocialGraph};
use crate::contract::{AgentOutput, ParseMode};
use crate::oracle::Oracle;

/// Ordinary turn or the bill advocate's opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnMode {
    Ordinary,
    Advocate,
}

/// How politician turns are requested and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnPolicy {
    pub mode: ParseMode,
    pub budget: TokenBudget,
    /// Colleagues rendered in the social-memory section
    pub known_reps_limit: usize,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            mode: ParseMode::Lenient,
            budget: TokenBudget {
                first: 500,
                retry: 800,
            },
            known_reps_limit: 10,
        }
    }
}

pub struct Politician {
    id: String,
    name: String,
    profile: PoliticianProfile,
    committee_id: String,
    committee_name: String,
    memory: TurnMemory,
    oracle: Arc<dyn Oracle>,
    policy: TurnPolicy,
}

impl std::fmt::Debug for Politician {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Politician")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("committee_id", &self.committee_id)
            .finish_non_exhaustive()
    }
}

impl Politician {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        profile: PoliticianProfile,
        oracle: Arc<dyn Oracle>,
        policy: TurnPolicy,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            profile,
            committee_id: String::new(),
            committee_name: String::new(),
            memory: TurnMemory::default(),
            oracle,
            policy,
        }
    }

    pub fn with_committee(mut self, committee_id: &str, committee_name: &str) -> Self {
        self.committee_id = committee_id.to_string();
        self.committee_name = committee_name.to_string();
        self
    }

    pub fn profile(&self) -> &PoliticianProfile {
        &self.profile
    }

    pub fn committee_id(&self) -> &str {
        &self.committee_id
    }

    pub fn committee_name(&self) -> &str {
        &self.committee_name
    }

    pub fn memory(&self) -> &TurnMemory {
        &self.memory
    }

    pub fn act(
        &mut self,
        ctx: &AgentContext<'_>,
        social: &SocialGraph,
    ) -> Result<AgentOutput, AgentError> {
        self.run_turn(ctx, social, TurnMode::Ordinary)
    }

    pub fn advocate(
        &mut self,
        ctx: &AgentContext<'_>,
        social: &SocialGraph,
    ) -> Result<AgentOutput, AgentError> {
        self.run_turn(ctx, social, TurnMode::Advocate)
    }

    pub fn run_turn(
        &mut self,
        ctx: &AgentContext<'_>,
        social: &SocialGraph,
        mode: TurnMode,
    ) -> Result<AgentOutput, AgentError> {
        let memory = format!(
            "{}\n\n{}",
            self.memory.render(),
            render_social_memory(
                social,
                &self.id,
                &self.committee_name,
                &self.committee_id,
                self.policy.known_reps_limit,
            )
        );
        let prompt = match mode {
            TurnMode::Ordinary => prompts::politician_turn(&self.name, &self.profile, ctx, &memory),
            TurnMode::Advocate => prompts::advocate_turn(&self.name, &self.profile, ctx, &memory),
        };

        let result = consult(
            self.oracle.as_ref(),
            &prompt,
            self.policy.budget,
            &self.name,
            AgentOutput::parse_strict,
        );
        let output = match (result, self.policy.mode) {
            (Ok(output), _) => output,
            (Err(AgentError::Validation { source, raw }), ParseMode::Lenient) => {
                warn!(agent = %self.name, error = %source, "reading retry reply leniently");
                AgentOutput::parse_lenient(&raw)
            }
            (Err(e), _) => return Err(e),
        };

        debug!(agent = %self.name, stance = %output.stance(), vote = %output.vote_intent(), "turn complete");
        self.memory.update_from_turn(&output);
        Ok(output)
    }
}

impl Agent for Politician {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Bill, RepInfo};
    use crate::oracle::{OracleError, ScriptedOracle, COMPACT_JSON_SUFFIX};
    use legis_events::Vote;

    const YES_TURN: &str = r#"{"speech":"Good bill.","stance":"support","voteIntent":"YES","confidence":0.9,"reasons":["Jobs"],"targetsToLobby":[],"proposedAmendments":[]}"#;

    fn graph() -> SocialGraph {
        let mut graph = SocialGraph::new();
        graph.register_representative(RepInfo::new("a", "Ada Park", "energy", "Energy"));
        graph
    }

    fn run(oracle: Arc<ScriptedOracle>, mode: ParseMode) -> (Politician, Result<AgentOutput, AgentError>) {
        let policy = TurnPolicy {
            mode,
            ..TurnPolicy::default()
        };
        let mut politician = Politician::new("a", "Ada Park", PoliticianProfile::default(), oracle, policy)
            .with_committee("energy", "Energy");
        let bill = Bill::new("hr-1", "Solar", "Solar for schools.");
        let ctx = AgentContext {
            bill: &bill,
            floor_summary: "",
            facts_pack: "",
            peer_reasoning: Vec::new(),
            debate_target: None,
            direct_messages: None,
        };
        let result = politician.act(&ctx, &graph());
        (politician, result)
    }

    #[test]
    fn test_turn_updates_memory() {
        let oracle = Arc::new(ScriptedOracle::new().with_fallback(YES_TURN));
        let (politician, result) = run(oracle.clone(), ParseMode::Strict);
        assert_eq!(result.unwrap().vote_intent(), Vote::Yes);
        assert_eq!(politician.memory().len(), 1);

        let calls = oracle.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_tokens, Some(500));
        assert!(calls[0].prompt.contains("YOUR_COMMITTEE: Energy (energy)"));
    }

    #[test]
    fn test_lenient_policy_reads_bad_retry() {
        let oracle = Arc::new(ScriptedOracle::new().with_fallback("I oppose this bill entirely."));
        let (_, result) = run(oracle.clone(), ParseMode::Lenient);
        let output = result.unwrap();
        assert_eq!(output.vote_intent(), Vote::No);
        assert_eq!(oracle.call_count(), 2);
        assert_eq!(oracle.calls()[1].max_tokens, Some(800));
    }

    #[test]
    fn test_strict_policy_surfaces_validation_error() {
        let oracle = Arc::new(ScriptedOracle::new().with_fallback("I oppose this bill entirely."));
        let (politician, result) = run(oracle, ParseMode::Strict);
        assert!(matches!(result, Err(AgentError::Validation { .. })));
        assert!(politician.memory().is_empty());
    }

    #[test]
    fn test_oracle_failure_on_retry_propagates() {
        let oracle = Arc::new(
            ScriptedOracle::new()
                .failing(COMPACT_JSON_SUFFIX, OracleError::Transport("down".to_string()))
                .with_fallback("garbage"),
        );
        let (_, result) = run(oracle, ParseMode::Lenient);
        assert!(matches!(result, Err(AgentError::Oracle(_))));
    }
}
