//! Bill Analysis Replies

use serde_json::Value;
use std::collections::BTreeMap;

use super::normalize::{number_field, parse_reply, string_list, text_field, truncate_chars, NumberField, Reply};
use super::{FieldProblem, ValidationError};
use crate::components::BillAnalysis;

/// One-pager length used when analysis fails
pub const FALLBACK_ONE_PAGER_CHARS: usize = 600;

/// Parse the analyst's reply. Every field is required.
pub fn parse_bill_analysis(raw: &str) -> Result<BillAnalysis, ValidationError> {
    let obj = match parse_reply(raw) {
        Reply::Object(obj) => obj,
        Reply::Literal(_) => return Err(ValidationError::not_an_object("bill analysis")),
    };

    let mut problems = Vec::new();

    if !obj.contains_key("topics") {
        problems.push(FieldProblem::Missing("topics"));
    }
    let topics = string_list(obj.get("topics"));

    let estimated_cost = match number_field(&obj, &["estimatedCost"]) {
        NumberField::Valid(c) => c,
        NumberField::Absent => {
            problems.push(FieldProblem::Missing("estimatedCost"));
            0.0
        }
        NumberField::Invalid(value) => {
            problems.push(FieldProblem::Invalid {
                field: "estimatedCost",
                value,
            });
            0.0
        }
    };

    let attributes: BTreeMap<String, Value> = match obj.get("attributes") {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Some(other) => {
            problems.push(FieldProblem::Invalid {
                field: "attributes",
                value: other.to_string(),
            });
            BTreeMap::new()
        }
        None => {
            problems.push(FieldProblem::Missing("attributes"));
            BTreeMap::new()
        }
    };

    let one_pager = text_field(&obj, &["onePager"]).unwrap_or_else(|| {
        problems.push(FieldProblem::Missing("onePager"));
        String::new()
    });

    if !problems.is_empty() {
        return Err(ValidationError::new("bill analysis", problems));
    }
    Ok(BillAnalysis {
        topics,
        estimated_cost,
        attributes,
        one_pager,
    })
}

/// Analysis used when the analyst never produced a valid reply.
pub fn fallback_analysis(raw_text: &str) -> BillAnalysis {
    BillAnalysis {
        topics: Vec::new(),
        estimated_cost: 0.0,
        attributes: BTreeMap::new(),
        one_pager: truncate_chars(raw_text.trim(), FALLBACK_ONE_PAGER_CHARS),
    }
}
