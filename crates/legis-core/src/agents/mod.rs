//! Agents
//!
//! Politicians take turns in committee and on the floor; the judge routes
//! bills to agencies. Both talk to the oracle through [`consult`], which
//! retries once with a compact-JSON reminder and a larger budget.

pub mod judge;
pub mod memory;
pub mod politician;
pub mod prompts;

pub use judge::Judge;
pub use memory::{render_social_memory, TurnMemory};
pub use politician::{Politician, TurnMode, TurnPolicy};

use thiserror::Error;
use tracing::warn;

use crate::components::Bill;
use crate::contract::ValidationError;
use crate::oracle::{Oracle, OracleError, COMPACT_JSON_SUFFIX};
use crate::state::Inbox;

/// Anything that takes part in the simulation under a name.
pub trait Agent {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// The retry reply still failed validation. `raw` is that reply.
    #[error("{source}")]
    Validation {
        #[source]
        source: ValidationError,
        raw: String,
    },
}

/// Everything an agent may read during a turn.
#[derive(Debug, Clone)]
pub struct AgentContext<'a> {
    pub bill: &'a Bill,
    pub floor_summary: &'a str,
    pub facts_pack: &'a str,
    /// Most recent peer statements, oldest first
    pub peer_reasoning: Vec<&'a str>,
    pub debate_target: Option<&'a str>,
    pub direct_messages: Option<&'a Inbox>,
}

/// Output budgets for the first attempt and the retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    pub first: u32,
    pub retry: u32,
}

/// Ask the oracle and validate the reply, retrying once.
///
/// Oracle errors on the first attempt also trigger the retry; only the
/// retry's failure is returned.
pub fn consult<T>(
    oracle: &dyn Oracle,
    prompt: &str,
    budget: TokenBudget,
    who: &str,
    parse: impl Fn(&str) -> Result<T, ValidationError>,
) -> Result<T, AgentError> {
    match oracle.generate_json(prompt, Some(budget.first)) {
        Ok(raw) => match parse(&raw) {
            Ok(value) => return Ok(value),
            Err(e) => warn!(agent = who, error = %e, "invalid reply, retrying"),
        },
        Err(e) => warn!(agent = who, error = %e, "oracle call failed, retrying"),
    }

    let retry_prompt = format!("{}\n{}", prompt, COMPACT_JSON_SUFFIX);
    let raw = oracle.generate_json(&retry_prompt, Some(budget.retry))?;
    parse(&raw).map_err(|source| AgentError::Validation { source, raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::JudgeDecision;
    use crate::oracle::ScriptedOracle;

    const BUDGET: TokenBudget = TokenBudget { first: 10, retry: 20 };

    #[test]
    fn test_consult_first_attempt() {
        let oracle = ScriptedOracle::new().with_fallback(r#"{"selectedAgencyId":"energy"}"#);
        let decision = consult(&oracle, "judge", BUDGET, "judge", JudgeDecision::parse_strict).unwrap();
        assert_eq!(decision.selected_agency_id.as_deref(), Some("energy"));
        assert_eq!(oracle.call_count(), 1);
        assert_eq!(oracle.calls()[0].max_tokens, Some(10));
    }

    #[test]
    fn test_consult_retries_with_suffix_and_budget() {
        let oracle = ScriptedOracle::new()
            .on(COMPACT_JSON_SUFFIX, r#"{"selectedAgencyId":"water"}"#)
            .with_fallback("not json");
        let decision = consult(&oracle, "judge", BUDGET, "judge", JudgeDecision::parse_strict).unwrap();
        assert_eq!(decision.selected_agency_id.as_deref(), Some("water"));

        let calls = oracle.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].prompt.ends_with(COMPACT_JSON_SUFFIX));
        assert_eq!(calls[1].max_tokens, Some(20));
    }

    #[test]
    fn test_consult_retries_after_oracle_error() {
        let oracle = ScriptedOracle::new()
            .on(COMPACT_JSON_SUFFIX, r#"{"selectedAgencyId":"water"}"#)
            .failing("judge", OracleError::Transport("reset".to_string()));
        assert!(consult(&oracle, "judge", BUDGET, "judge", JudgeDecision::parse_strict).is_ok());
    }

    #[test]
    fn test_consult_reports_second_failure() {
        let oracle = ScriptedOracle::new().with_fallback("still not json");
        let err = consult(&oracle, "judge", BUDGET, "judge", JudgeDecision::parse_strict).unwrap_err();
        match err {
            AgentError::Validation { raw, .. } => assert_eq!(raw, "still not json"),
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(oracle.call_count(), 2);
    }
}
