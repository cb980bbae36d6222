//! Judge Agent

use std::sync::Arc;

use super::{consult, prompts, Agent, AgentError, TokenBudget};
use crate::components::{Agency, Bill};
use crate::contract::JudgeDecision;
use crate::oracle::Oracle;

pub const JUDGE_ID: &str = "judge";
pub const JUDGE_NAME: &str = "LLM Judge";

/// Routes a bill to the agency that should own it. Replies are parsed
/// strictly; the caller decides what to do on failure.
pub struct Judge {
    oracle: Arc<dyn Oracle>,
    budget: TokenBudget,
}

impl Judge {
    pub fn new(oracle: Arc<dyn Oracle>, budget: TokenBudget) -> Self {
        Self { oracle, budget }
    }

    pub fn decide(&self, bill: &Bill, agencies: &[Agency]) -> Result<JudgeDecision, AgentError> {
        let prompt = prompts::judge(bill, agencies);
        consult(
            self.oracle.as_ref(),
            &prompt,
            self.budget,
            JUDGE_NAME,
            JudgeDecision::parse_strict,
        )
    }
}

impl Agent for Judge {
    fn id(&self) -> &str {
        JUDGE_ID
    }

    fn name(&self) -> &str {
        JUDGE_NAME
    }
}
