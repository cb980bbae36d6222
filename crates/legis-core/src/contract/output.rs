//! Agent Turn Output
//!
//! The validated record of one politician turn. Stance and vote intent are
//! always consistent once a record exists; when the reply disagrees with
//! itself, the vote wins.

use legis_events::Vote;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use tracing::debug;

use super::normalize::{number_field, parse_reply, string_list, text_field, truncate_chars, NumberField, Reply};
use super::{FieldProblem, ParseMode, ValidationError};

/// Amendments and lobby targets kept per turn
pub const MAX_LIST_ITEMS: usize = 2;

/// Speech length kept when a reply is plain text
pub const MAX_LITERAL_SPEECH: usize = 1200;

const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Position on the bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Support,
    Oppose,
    Undecided,
}

impl Stance {
    pub fn as_str(self) -> &'static str {
        match self {
            Stance::Support => "support",
            Stance::Oppose => "oppose",
            Stance::Undecided => "undecided",
        }
    }

    /// Accepts any casing and surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "support" => Some(Stance::Support),
            "oppose" => Some(Stance::Oppose),
            "undecided" => Some(Stance::Undecided),
            _ => None,
        }
    }

    pub fn from_vote(vote: Vote) -> Self {
        match vote {
            Vote::Yes => Stance::Support,
            Vote::No => Stance::Oppose,
            Vote::Abstain => Stance::Undecided,
        }
    }

    pub fn vote(self) -> Vote {
        match self {
            Stance::Support => Vote::Yes,
            Stance::Oppose => Vote::No,
            Stance::Undecided => Vote::Abstain,
        }
    }

    fn default_reason(self) -> &'static str {
        match self {
            Stance::Support => "The bill's benefits outweigh its costs.",
            Stance::Oppose => "The bill's costs outweigh its benefits.",
            Stance::Undecided => "Needs more information before deciding.",
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn parse_vote(text: &str) -> Option<Vote> {
    text.trim().to_uppercase().parse().ok()
}

/// Word sequences read as a stance. Negations and explicit votes are
/// checked first.
const NEGATED_SUPPORT: &[&[&str]] = &[
    &["not", "support"],
    &["cannot", "support"],
    &["can't", "support"],
    &["don't", "support"],
    &["won't", "support"],
];
const EXPLICIT_NO: &[&[&str]] = &[&["vote", "no"], &["voting", "no"], &["vote", "against"]];
const EXPLICIT_YES: &[&[&str]] = &[&["vote", "yes"], &["voting", "yes"], &["vote", "for"]];
const SUPPORT: &[&[&str]] = &[
    &["support"],
    &["supports"],
    &["endorse"],
    &["endorses"],
    &["in", "favor"],
    &["in", "favour"],
];
const OPPOSE: &[&[&str]] = &[&["oppose"], &["opposes"], &["reject"], &["rejects"]];
/// Only consulted when nothing stronger matched
const WEAK_OPPOSE: &[&[&str]] = &[&["against"]];

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Position of the earliest whole-word match of any phrase.
fn first_match(words: &[String], phrases: &[&[&str]]) -> Option<usize> {
    phrases
        .iter()
        .filter_map(|phrase| {
            words
                .windows(phrase.len())
                .position(|window| window.iter().zip(phrase.iter()).all(|(w, p)| w == p))
        })
        .min()
}

/// Keyword read of free text, used when a reply carries no JSON object.
pub fn infer_stance_from_text(text: &str) -> Stance {
    let words = words(text);
    if first_match(&words, NEGATED_SUPPORT).is_some() {
        return Stance::Oppose;
    }
    match (first_match(&words, EXPLICIT_YES), first_match(&words, EXPLICIT_NO)) {
        (Some(yes), Some(no)) => return if yes < no { Stance::Support } else { Stance::Oppose },
        (Some(_), None) => return Stance::Support,
        (None, Some(_)) => return Stance::Oppose,
        (None, None) => {}
    }
    match (first_match(&words, SUPPORT), first_match(&words, OPPOSE)) {
        (Some(support), Some(oppose)) if oppose < support => Stance::Oppose,
        (Some(_), _) => Stance::Support,
        (None, Some(_)) => Stance::Oppose,
        (None, None) if first_match(&words, WEAK_OPPOSE).is_some() => Stance::Oppose,
        (None, None) => Stance::Undecided,
    }
}

/// One politician turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentOutput {
    speech: String,
    proposed_amendments: Vec<String>,
    stance: Stance,
    vote_intent: Vote,
    confidence: f64,
    reasons: Vec<String>,
    targets_to_lobby: Vec<String>,
}

impl AgentOutput {
    /// Build a turn from a vote. Stance follows the vote, confidence is
    /// clamped and an empty reason list gets a default entry.
    pub fn new(speech: impl Into<String>, vote: Vote, confidence: f64, reasons: Vec<String>) -> Self {
        let stance = Stance::from_vote(vote);
        Self {
            speech: speech.into(),
            proposed_amendments: Vec::new(),
            stance,
            vote_intent: vote,
            confidence: clamp_confidence(confidence),
            reasons: with_default_reason(reasons, stance),
            targets_to_lobby: Vec::new(),
        }
    }

    pub fn with_amendments(mut self, amendments: Vec<String>) -> Self {
        self.proposed_amendments = cap_list(amendments);
        self
    }

    pub fn with_lobby_targets(mut self, targets: Vec<String>) -> Self {
        self.targets_to_lobby = cap_list(targets);
        self
    }

    pub fn speech(&self) -> &str {
        &self.speech
    }

    pub fn proposed_amendments(&self) -> &[String] {
        &self.proposed_amendments
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    pub fn vote_intent(&self) -> Vote {
        self.vote_intent
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }

    pub fn targets_to_lobby(&self) -> &[String] {
        &self.targets_to_lobby
    }

    /// First reason, used for one-line summaries.
    pub fn headline_reason(&self) -> &str {
        self.reasons.first().map(String::as_str).unwrap_or("")
    }

    pub fn parse(raw: &str, mode: ParseMode) -> Result<Self, ValidationError> {
        match mode {
            ParseMode::Lenient => Ok(Self::parse_lenient(raw)),
            ParseMode::Strict => Self::parse_strict(raw),
        }
    }

    /// Never fails. Plain text becomes the speech and its stance is read
    /// from keywords.
    pub fn parse_lenient(raw: &str) -> Self {
        match parse_reply(raw) {
            Reply::Object(obj) => {
                let (output, problems) = normalize_object(&obj);
                if !problems.is_empty() {
                    debug!(problems = problems.len(), "lenient turn parse filled defaults");
                }
                output
            }
            Reply::Literal(text) => {
                let stance = infer_stance_from_text(&text);
                Self {
                    speech: truncate_chars(&text, MAX_LITERAL_SPEECH),
                    proposed_amendments: Vec::new(),
                    stance,
                    vote_intent: stance.vote(),
                    confidence: DEFAULT_CONFIDENCE,
                    reasons: with_default_reason(Vec::new(), stance),
                    targets_to_lobby: Vec::new(),
                }
            }
        }
    }

    /// Rejects replies with missing or malformed fields.
    pub fn parse_strict(raw: &str) -> Result<Self, ValidationError> {
        match parse_reply(raw) {
            Reply::Object(obj) => {
                let (output, problems) = normalize_object(&obj);
                if problems.is_empty() {
                    Ok(output)
                } else {
                    Err(ValidationError::new("agent output", problems))
                }
            }
            Reply::Literal(_) => Err(ValidationError::not_an_object("agent output")),
        }
    }
}

/// Normalize an object, collecting every strict-mode problem along the way.
/// The returned record is the lenient reading.
fn normalize_object(obj: &Map<String, Value>) -> (AgentOutput, Vec<FieldProblem>) {
    let mut problems = Vec::new();

    let speech = text_field(obj, &["speech"]).unwrap_or_else(|| {
        problems.push(FieldProblem::Missing("speech"));
        String::new()
    });

    let raw_stance = obj.get("stance").and_then(Value::as_str);
    let raw_vote = obj.get("voteIntent").and_then(Value::as_str);
    let stance = raw_stance.and_then(Stance::parse);
    let vote = raw_vote.and_then(parse_vote);

    let (stance, vote) = match (stance, vote) {
        (Some(s), Some(v)) if s.vote() != v => {
            debug!(stance = %s, vote = %v, "stance contradicts vote; vote wins");
            (Stance::from_vote(v), v)
        }
        (Some(s), Some(v)) => (s, v),
        (Some(s), None) => {
            if let Some(text) = raw_vote {
                debug!(vote = text, "unreadable vote intent; derived from stance");
            }
            (s, s.vote())
        }
        (None, Some(v)) => (Stance::from_vote(v), v),
        (None, None) => {
            problems.push(match raw_stance {
                Some(text) => FieldProblem::Invalid {
                    field: "stance",
                    value: text.to_string(),
                },
                None => FieldProblem::Missing("stance"),
            });
            problems.push(match raw_vote {
                Some(text) => FieldProblem::Invalid {
                    field: "voteIntent",
                    value: text.to_string(),
                },
                None => FieldProblem::Missing("voteIntent"),
            });
            (Stance::Undecided, Vote::Abstain)
        }
    };

    let confidence = match number_field(obj, &["confidence"]) {
        NumberField::Valid(c) if (0.0..=1.0).contains(&c) => c,
        NumberField::Valid(c) => {
            problems.push(FieldProblem::OutOfRange {
                field: "confidence",
                value: c.to_string(),
            });
            clamp_confidence(c)
        }
        NumberField::Invalid(text) => {
            problems.push(FieldProblem::Invalid {
                field: "confidence",
                value: text,
            });
            DEFAULT_CONFIDENCE
        }
        NumberField::Absent => {
            problems.push(FieldProblem::Missing("confidence"));
            DEFAULT_CONFIDENCE
        }
    };

    let output = AgentOutput {
        speech,
        proposed_amendments: cap_list(string_list(obj.get("proposedAmendments"))),
        stance,
        vote_intent: vote,
        confidence,
        reasons: with_default_reason(string_list(obj.get("reasons")), stance),
        targets_to_lobby: cap_list(string_list(obj.get("targetsToLobby"))),
    };
    (output, problems)
}

fn clamp_confidence(c: f64) -> f64 {
    if c.is_finite() {
        c.clamp(0.0, 1.0)
    } else {
        DEFAULT_CONFIDENCE
    }
}

fn cap_list(mut items: Vec<String>) -> Vec<String> {
    items.retain(|s| !s.trim().is_empty());
    items.truncate(MAX_LIST_ITEMS);
    items
}

fn with_default_reason(mut reasons: Vec<String>, stance: Stance) -> Vec<String> {
    reasons.retain(|r| !r.trim().is_empty());
    if reasons.is_empty() {
        reasons.push(stance.default_reason().to_string());
    }
    reasons
}
