//! Oracle Port
//!
//! The single seam to the language model. Callers hand over a prompt and an
//! optional token budget and get raw text back; validation happens in
//! [`crate::contract`].

pub mod ollama;
pub mod scripted;

pub use ollama::OllamaOracle;
pub use scripted::{OracleCall, ScriptedOracle};

use thiserror::Error;

/// Appended to a prompt when the first reply could not be used
pub const COMPACT_JSON_SUFFIX: &str = "Return compact JSON only. No extra text.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Transport(String),

    #[error("oracle returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle reply is missing the `{0}` field")]
    MissingField(&'static str),

    #[error("scripted oracle has no reply for prompt starting {0:?}")]
    NoScript(String),
}

/// Produces JSON-shaped text for a prompt.
pub trait Oracle {
    /// `max_tokens` overrides the oracle's default output budget.
    fn generate_json(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String, OracleError>;
}

impl<T: Oracle + ?Sized> Oracle for std::sync::Arc<T> {
    fn generate_json(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String, OracleError> {
        (**self).generate_json(prompt, max_tokens)
    }
}

impl<T: Oracle + ?Sized> Oracle for &T {
    fn generate_json(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String, OracleError> {
        (**self).generate_json(prompt, max_tokens)
    }
}
