//! Representative Profiles

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Political profile that shapes a representative's prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoliticianProfile {
    pub party: String,
    /// Axis name to position, conventionally -1.0..=1.0
    pub ideology: BTreeMap<String, f64>,
    pub red_lines: Vec<String>,
    pub pet_issues: Vec<String>,
    pub speaking_style: String,
}

impl PoliticianProfile {
    /// One-line ideology rendering, e.g. `economic=0.60, social=-0.20`.
    pub fn ideology_summary(&self) -> String {
        if self.ideology.is_empty() {
            return "unspecified".to_string();
        }
        self.ideology
            .iter()
            .map(|(axis, value)| format!("{}={:.2}", axis, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
