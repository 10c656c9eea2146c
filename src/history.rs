use std::fmt;

use crate::movegen::Move;

/// Who played a recorded move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribution {
    Human,
    Remote,
}

impl Attribution {
    pub fn label(self) -> &'static str {
        match self {
            Attribution::Human => "Player",
            Attribution::Remote => "Opponent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub attribution: Attribution,
    pub description: String,
}

impl HistoryEntry {
    pub fn new(attribution: Attribution, mv: &Move) -> Self {
        Self {
            attribution,
            description: mv.to_string(),
        }
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.attribution.label(), self.description)
    }
}

/// Append-only record of the moves played this session, oldest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Only used when the whole session is reset.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
