//! Judge Decision
//!
//! The judge names the agency that should own a bill and may attach a score
//! for every agency. Judge replies are always parsed strictly.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::normalize::{as_number, number_field, parse_reply, text_field, NumberField, Reply};
use super::{FieldProblem, ValidationError};
use crate::components::Agency;

const DEFAULT_RATIONALE: &str = "No rationale provided.";

/// Confidence attached to a keyword-fallback decision
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgeDecision {
    pub selected_agency_id: Option<String>,
    pub rationale: String,
    pub confidence: f64,
    pub scores: Option<BTreeMap<String, f64>>,
}

impl JudgeDecision {
    /// Decision recorded when the judge could not be used.
    pub fn fallback(agency_id: impl Into<String>, rationale: impl Into<String>) -> Self {
        Self {
            selected_agency_id: Some(agency_id.into()),
            rationale: rationale.into(),
            confidence: FALLBACK_CONFIDENCE,
            scores: None,
        }
    }

    pub fn parse_strict(raw: &str) -> Result<Self, ValidationError> {
        let obj = match parse_reply(raw) {
            Reply::Object(obj) => obj,
            Reply::Literal(_) => return Err(ValidationError::not_an_object("judge decision")),
        };

        let selected_agency_id =
            text_field(&obj, &["selectedAgencyId", "agencyId", "selectedAgency"]);
        let scores = obj.get("scores").and_then(Value::as_object).map(|map| {
            map.iter()
                .filter_map(|(id, v)| as_number(v).filter(|n| n.is_finite()).map(|n| (id.clone(), n)))
                .collect::<BTreeMap<_, _>>()
        });
        let scores = scores.filter(|s| !s.is_empty());

        let mut problems = Vec::new();
        if selected_agency_id.is_none() && scores.is_none() {
            problems.push(FieldProblem::Missing("selectedAgencyId"));
        }
        let confidence = match number_field(&obj, &["confidence"]) {
            NumberField::Valid(c) => c.clamp(0.0, 1.0),
            NumberField::Absent => 0.5,
            NumberField::Invalid(value) => {
                problems.push(FieldProblem::Invalid {
                    field: "confidence",
                    value,
                });
                0.5
            }
        };
        if !problems.is_empty() {
            return Err(ValidationError::new("judge decision", problems));
        }

        Ok(Self {
            selected_agency_id,
            rationale: text_field(&obj, &["rationale", "reason"])
                .unwrap_or_else(|| DEFAULT_RATIONALE.to_string()),
            confidence,
            scores,
        })
    }

    /// Highest-scored agency, but only when every agency has a score. Ties
    /// go to the agency listed first.
    pub fn best_scored<'a>(&self, agencies: &'a [Agency]) -> Option<&'a Agency> {
        let scores = self.scores.as_ref()?;
        if agencies.is_empty() || !agencies.iter().all(|a| scores.contains_key(a.id())) {
            return None;
        }
        let mut best: Option<(&Agency, f64)> = None;
        for agency in agencies {
            let score = scores[agency.id()];
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((agency, score));
            }
        }
        best.map(|(agency, _)| agency)
    }
}
