//! Scripted oracle for offline runs and tests.
//!
//! Replies are chosen by the first rule whose marker appears in the prompt.
//! A rule hands out its replies in order and then keeps repeating the last
//! one. Every call is recorded.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Oracle, OracleError};

type Reply = Result<String, OracleError>;

/// A recorded oracle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    pub prompt: String,
    pub max_tokens: Option<u32>,
}

#[derive(Debug)]
struct Rule {
    marker: String,
    pending: VecDeque<Reply>,
    last: Reply,
}

impl Rule {
    fn next(&mut self) -> Reply {
        match self.pending.pop_front() {
            Some(reply) => {
                self.last = reply.clone();
                reply
            }
            None => self.last.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScriptedOracle {
    rules: Mutex<Vec<Rule>>,
    fallback: Option<String>,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used when no rule matches.
    pub fn with_fallback(mut self, reply: impl Into<String>) -> Self {
        self.fallback = Some(reply.into());
        self
    }

    /// Answer prompts containing `marker` with `reply`.
    pub fn on(self, marker: impl Into<String>, reply: impl Into<String>) -> Self {
        self.on_sequence(marker, vec![Ok(reply.into())])
    }

    /// Fail prompts containing `marker`.
    pub fn failing(self, marker: impl Into<String>, error: OracleError) -> Self {
        self.on_sequence(marker, vec![Err(error)])
    }

    /// Answer prompts containing `marker` with each reply in turn.
    pub fn on_sequence(self, marker: impl Into<String>, replies: Vec<Reply>) -> Self {
        let mut pending: VecDeque<Reply> = replies.into();
        let Some(first) = pending.pop_front() else {
            return self;
        };
        {
            let mut rules = self.rules.lock().unwrap_or_else(|e| e.into_inner());
            rules.push(Rule {
                marker: marker.into(),
                pending: std::iter::once(first.clone()).chain(pending).collect(),
                last: first,
            });
        }
        self
    }

    /// Canned replies for a dry run without a model. The judge names no
    /// real agency, so assignment falls back to keyword matching.
    pub fn offline() -> Self {
        let turn = |vote: &str, stance: &str, reason: &str| {
            serde_json::json!({
                "speech": format!("Offline dry run: I am {} this bill.", stance),
                "proposedAmendments": [],
                "stance": stance,
                "voteIntent": vote,
                "confidence": 0.6,
                "reasons": [reason],
                "targetsToLobby": []
            })
            .to_string()
        };
        let turns = [
            ("YES", "support", "It addresses a real need in my district."),
            ("NO", "oppose", "The cost is not offset anywhere."),
            ("YES", "support", "The pilot scope keeps the risk small."),
            ("NO", "oppose", "Oversight provisions are too weak."),
            ("ABSTAIN", "undecided", "I need the budget office score first."),
        ];
        let politician_replies = turns
            .iter()
            .cycle()
            .take(turns.len() * 8)
            .map(|(vote, stance, reason)| Ok(turn(vote, stance, reason)))
            .collect();

        Self::new()
            .on(
                "legislative analyst",
                r#"{"topics":["general"],"estimatedCost":0,"attributes":{},"onePager":"Offline dry run: the bill text is used as-is."}"#,
            )
            .on("LLM Judge", r#"{"selectedAgencyId":"offline","rationale":"Offline dry run.","confidence":0.3}"#)
            .on("drafting staff", r#"{"revisedBillText":"Offline revision: a narrower pilot.","revisionSummary":"Scope reduced to a pilot.","keyChanges":["Pilot only"]}"#)
            .on("the bill advocate", turn("YES", "support", "This bill delivers for working families."))
            .on_sequence("a government representative", politician_replies)
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Calls whose prompt contains `marker`.
    pub fn calls_matching(&self, marker: &str) -> Vec<OracleCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.prompt.contains(marker))
            .collect()
    }
}

impl Oracle for ScriptedOracle {
    fn generate_json(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String, OracleError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(OracleCall {
                prompt: prompt.to_string(),
                max_tokens,
            });

        let mut rules = self.rules.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(rule) = rules.iter_mut().find(|r| prompt.contains(&r.marker)) {
            return rule.next();
        }
        match &self.fallback {
            Some(reply) => Ok(reply.clone()),
            None => Err(OracleError::NoScript(prompt.chars().take(60).collect())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_match_by_marker() {
        let oracle = ScriptedOracle::new()
            .on("JUDGE", "{\"selectedAgencyId\":\"energy\"}")
            .with_fallback("{}");
        assert_eq!(
            oracle.generate_json("You are the JUDGE", None).unwrap(),
            "{\"selectedAgencyId\":\"energy\"}"
        );
        assert_eq!(oracle.generate_json("anything", Some(5)).unwrap(), "{}");
        assert_eq!(oracle.call_count(), 2);
        assert_eq!(oracle.calls()[1].max_tokens, Some(5));
    }

    #[test]
    fn test_sequence_repeats_last_reply() {
        let oracle = ScriptedOracle::new().on_sequence(
            "turn",
            vec![Ok("first".to_string()), Ok("second".to_string())],
        );
        assert_eq!(oracle.generate_json("turn", None).unwrap(), "first");
        assert_eq!(oracle.generate_json("turn", None).unwrap(), "second");
        assert_eq!(oracle.generate_json("turn", None).unwrap(), "second");
    }

    #[test]
    fn test_failures_and_missing_script() {
        let oracle = ScriptedOracle::new()
            .failing("boom", OracleError::Transport("connection refused".to_string()));
        assert!(matches!(
            oracle.generate_json("boom", None),
            Err(OracleError::Transport(_))
        ));
        assert!(matches!(
            oracle.generate_json("unscripted", None),
            Err(OracleError::NoScript(_))
        ));
        assert_eq!(oracle.calls_matching("boom").len(), 1);
    }

    #[test]
    fn test_offline_script_answers_every_prompt_kind() {
        let oracle = ScriptedOracle::offline();
        for prompt in [
            "You are a legislative analyst.",
            "You are the LLM Judge.",
            "You are the drafting staff of the Energy Committee.",
            "You are Ada Park, the bill advocate on the primary floor.",
            "You are Ada Park, a government representative.",
        ] {
            let reply = oracle.generate_json(prompt, None).unwrap();
            assert!(serde_json::from_str::<serde_json::Value>(&reply).is_ok());
        }
        let first = oracle.generate_json("a government representative", None).unwrap();
        let second = oracle.generate_json("a government representative", None).unwrap();
        assert_ne!(first, second);
    }
}
