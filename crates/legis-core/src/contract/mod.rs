//! Reply Contracts
//!
//! Everything the oracle says comes back as text. This module turns that text
//! into validated domain records: agent turns, judge decisions, bill analyses
//! and revision drafts.
//!
//! Two policies exist. `Lenient` always yields a usable record, filling
//! defaults and reading literal text when no JSON object can be found.
//! `Strict` returns a [`ValidationError`] listing every field problem.

pub mod analysis;
pub mod judge;
pub mod normalize;
pub mod output;
pub mod revision;

pub use analysis::parse_bill_analysis;
pub use judge::JudgeDecision;
pub use output::{AgentOutput, Stance};
pub use revision::RevisionDraft;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How forgiving a parse is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    #[default]
    Lenient,
    Strict,
}

/// A single problem found while validating a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// No JSON object could be located in the reply
    NotAnObject,
    Missing(&'static str),
    Invalid { field: &'static str, value: String },
    OutOfRange { field: &'static str, value: String },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::NotAnObject => f.write_str("reply is not a JSON object"),
            FieldProblem::Missing(field) => write!(f, "missing {}", field),
            FieldProblem::Invalid { field, value } => write!(f, "invalid {}: {}", field, value),
            FieldProblem::OutOfRange { field, value } => {
                write!(f, "{} out of range: {}", field, value)
            }
        }
    }
}

/// Strict-mode rejection of a reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {target}: {}", join_problems(.problems))]
pub struct ValidationError {
    pub target: &'static str,
    pub problems: Vec<FieldProblem>,
}

impl ValidationError {
    pub fn new(target: &'static str, problems: Vec<FieldProblem>) -> Self {
        Self { target, problems }
    }

    pub fn not_an_object(target: &'static str) -> Self {
        Self::new(target, vec![FieldProblem::NotAnObject])
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.problems.iter().any(|p| match p {
            FieldProblem::NotAnObject => false,
            FieldProblem::Missing(f) => *f == field,
            FieldProblem::Invalid { field: f, .. } => *f == field,
            FieldProblem::OutOfRange { field: f, .. } => *f == field,
        })
    }
}

fn join_problems(problems: &[FieldProblem]) -> String {
    problems
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
