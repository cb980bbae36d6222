//! Bill Components
//!
//! The bill under deliberation. Raw text is fixed at load time; the analysis
//! fields are filled once by the parsing stage and the one-pager may later be
//! replaced by a revision.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Structured analysis produced by the parsing stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillAnalysis {
    pub topics: Vec<String>,
    pub estimated_cost: f64,
    pub attributes: BTreeMap<String, Value>,
    pub one_pager: String,
}

/// A bill moving through the chamber.
#[derive(Debug, Clone, Serialize)]
pub struct Bill {
    id: String,
    title: String,
    raw_text: String,
    topics: Vec<String>,
    estimated_cost: f64,
    attributes: BTreeMap<String, Value>,
    one_pager: String,
    analyzed: bool,
}

impl Bill {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            raw_text: raw_text.into(),
            topics: Vec::new(),
            estimated_cost: 0.0,
            attributes: BTreeMap::new(),
            one_pager: String::new(),
            analyzed: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn estimated_cost(&self) -> f64 {
        self.estimated_cost
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn one_pager(&self) -> &str {
        &self.one_pager
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    /// Text agents should read: the one-pager once one exists, otherwise the
    /// raw text.
    pub fn briefing(&self) -> &str {
        if self.one_pager.trim().is_empty() {
            &self.raw_text
        } else {
            &self.one_pager
        }
    }

    /// Store the parsing stage's analysis. Only the first call takes effect.
    pub fn apply_analysis(&mut self, analysis: BillAnalysis) -> bool {
        if self.analyzed {
            return false;
        }
        self.topics = analysis.topics;
        self.estimated_cost = analysis.estimated_cost;
        self.attributes = analysis.attributes;
        self.one_pager = analysis.one_pager;
        self.analyzed = true;
        true
    }

    /// Swap in a revised one-pager. Raw text is never touched.
    pub fn replace_one_pager(&mut self, one_pager: impl Into<String>) {
        self.one_pager = one_pager.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(one_pager: &str) -> BillAnalysis {
        BillAnalysis {
            topics: vec!["water".to_string()],
            estimated_cost: 1_500_000.0,
            attributes: BTreeMap::new(),
            one_pager: one_pager.to_string(),
        }
    }

    #[test]
    fn test_briefing_falls_back_to_raw_text() {
        let mut bill = Bill::new("hr-1", "Clean Water", "Section 1. Funds pipes.");
        assert_eq!(bill.briefing(), "Section 1. Funds pipes.");

        assert!(bill.apply_analysis(analysis("Funds lead pipe removal.")));
        assert_eq!(bill.briefing(), "Funds lead pipe removal.");
        assert_eq!(bill.topics(), ["water".to_string()]);
    }

    #[test]
    fn test_analysis_applies_once() {
        let mut bill = Bill::new("hr-1", "Clean Water", "text");
        assert!(bill.apply_analysis(analysis("first")));
        assert!(!bill.apply_analysis(analysis("second")));
        assert_eq!(bill.one_pager(), "first");
    }

    #[test]
    fn test_revision_keeps_raw_text() {
        let mut bill = Bill::new("hr-1", "Clean Water", "original text");
        bill.apply_analysis(analysis("first"));
        bill.replace_one_pager("revised");
        assert_eq!(bill.one_pager(), "revised");
        assert_eq!(bill.raw_text(), "original text");
    }
}
