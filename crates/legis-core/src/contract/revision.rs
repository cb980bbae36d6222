//! Revision Drafts

use serde::Serialize;

use super::normalize::{parse_reply, string_list, text_field, Reply};

/// A redraft produced after a failed vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionDraft {
    pub revised_text: String,
    pub summary: String,
    pub key_changes: Vec<String>,
}

impl RevisionDraft {
    /// Returns `None` unless the reply carries non-blank revised text.
    pub fn parse(raw: &str) -> Option<Self> {
        let Reply::Object(obj) = parse_reply(raw) else {
            return None;
        };
        let revised_text = text_field(&obj, &["revisedBillText", "revisedText"])?;
        Some(Self {
            revised_text,
            summary: text_field(&obj, &["revisionSummary", "summary"]).unwrap_or_default(),
            key_changes: string_list(obj.get("keyChanges")),
        })
    }

    /// One-pager text that replaces the bill's current one.
    pub fn one_pager(&self) -> String {
        let mut text = self.revised_text.clone();
        if !self.summary.is_empty() {
            text.push_str("\n\nRevision summary: ");
            text.push_str(&self.summary);
        }
        if !self.key_changes.is_empty() {
            text.push_str("\nKey changes:");
            for change in &self.key_changes {
                text.push_str("\n- ");
                text.push_str(change);
            }
        }
        text
    }
}
