//! Facts pack loading.

use serde::Deserialize;
use std::path::Path;

use super::{read_file, SetupError};

pub const NO_FACTS: &str = "(no facts provided)";

/// A citable statistic offered to every politician.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Fact {
    pub id: String,
    pub source: String,
    pub text: String,
}

/// Load facts from a JSON array. A missing or blank file yields none.
pub fn load_facts(path: impl AsRef<Path>) -> Result<Vec<Fact>, SetupError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(Vec::new());
    }
    let raw = read_file(path)?;
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|source| SetupError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Render facts as a prompt block, one `- [id] (source) text` line each.
pub fn facts_to_prompt_block(facts: &[Fact]) -> String {
    let lines: Vec<String> = facts
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .map(|f| {
            let mut line = String::from("- ");
            if !f.id.trim().is_empty() {
                line.push_str(&format!("[{}] ", f.id.trim()));
            }
            if !f.source.trim().is_empty() {
                line.push_str(&format!("({}) ", f.source.trim()));
            }
            line.push_str(f.text.trim());
            line
        })
        .collect();
    if lines.is_empty() {
        NO_FACTS.to_string()
    } else {
        lines.join("\n")
    }
}
