use std::collections::VecDeque;

use tracing::{debug, info};

use crate::analysis::Analysis;

/// In-memory log of analyses for one session, newest first.
/// Nothing is persisted; the log lives as long as the store.
/// Readers get copies, never the underlying container.
#[derive(Debug, Default)]
pub struct AnalysisHistory {
    entries: VecDeque<Analysis>,
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front of the log.
    pub fn append(&mut self, analysis: Analysis) {
        debug!("Appending analysis {} to history", analysis.id);
        self.entries.push_front(analysis);
    }

    pub fn find_by_id(&self, id: i64) -> Option<Analysis> {
        self.entries.iter().find(|a| a.id == id).cloned()
    }

    pub fn most_recent(&self) -> Option<Analysis> {
        self.entries.front().cloned()
    }

    /// Snapshot of every analysis, newest first.
    pub fn all(&self) -> Vec<Analysis> {
        self.entries.iter().cloned().collect()
    }

    /// Drop every entry. Calling this on an empty store is a no-op.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        info!("Cleared {} analyses from history", removed);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
