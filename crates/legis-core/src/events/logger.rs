//! Interaction and relationship logs.

use legis_events::{EventKind, InteractionEvent};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ordered record of every interaction line emitted by the stages.
#[derive(Debug, Clone, Default)]
pub struct InteractionLog {
    events: Vec<InteractionEvent>,
    next_sequence: u64,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            next_sequence: 1,
        }
    }

    /// Append a line. Blank lines are dropped.
    pub fn log(&mut self, stage: &str, kind: EventKind, text: impl Into<String>) -> Option<u64> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        let sequence = self.next_sequence.max(1);
        self.next_sequence = sequence + 1;
        self.events
            .push(InteractionEvent::new(sequence, stage, kind, text.trim()));
        Some(sequence)
    }

    pub fn events(&self) -> &[InteractionEvent] {
        &self.events
    }

    pub fn of_kind(&self, kind: EventKind) -> impl Iterator<Item = &InteractionEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Write one line per event, replacing any existing file.
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        write_lines(path, self.events.iter().map(|e| e.text.as_str()))
    }
}

/// Direct messages and relationship changes, one line each.
#[derive(Debug, Clone, Default)]
pub struct RelationshipLog {
    lines: Vec<String>,
}

impl RelationshipLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, line: impl Into<String>) {
        let line = line.into();
        if !line.trim().is_empty() {
            self.lines.push(line.trim().to_string());
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        write_lines(path, self.lines.iter().map(String::as_str))
    }
}

fn write_lines<'a>(
    path: impl AsRef<Path>,
    lines: impl Iterator<Item = &'a str>,
) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_interaction_log_sequences() {
        let mut log = InteractionLog::new();
        assert_eq!(log.log("SessionMingle", EventKind::Meet, "[Mingle] A meets B"), Some(1));
        assert_eq!(log.log("SessionMingle", EventKind::Meet, "   "), None);
        assert_eq!(log.log("ThresholdDecision", EventKind::Decision, "[Decision] PASS"), Some(2));

        assert_eq!(log.len(), 2);
        assert_eq!(log.of_kind(EventKind::Decision).count(), 1);
        assert_eq!(log.events()[1].stage, "ThresholdDecision");
    }

    #[test]
    fn test_default_log_starts_at_one() {
        let mut log = InteractionLog::default();
        assert_eq!(log.log("Finalize", EventKind::Decision, "done"), Some(1));
    }

    #[test]
    fn test_logs_write_one_line_per_entry() {
        let dir = tempfile::tempdir().unwrap();

        let mut interactions = InteractionLog::new();
        interactions.log("SessionMingle", EventKind::Meet, "[Mingle] A meets B");
        interactions.log("SessionMingle", EventKind::Meet, "[Mingle] C meets D");
        let path = dir.path().join("interaction.log");
        interactions.write_to(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[Mingle] A meets B\n[Mingle] C meets D\n");

        let mut relationships = RelationshipLog::new();
        relationships.log("[DM] A -> B: hi");
        relationships.log("");
        let path = dir.path().join("relationships.log");
        relationships.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[DM] A -> B: hi\n");
    }
}
