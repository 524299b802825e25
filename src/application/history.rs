use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::entities::report::QueryReport;

/// Process-wide chat history, oldest first.
pub struct ChatHistory {
    entries: Mutex<VecDeque<QueryReport>>,
    capacity: Option<usize>,
}

impl ChatHistory {
    /// `capacity` of `None` keeps everything.
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    pub fn push(&self, report: QueryReport) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push_back(report);
        if let Some(cap) = self.capacity {
            while entries.len() > cap {
                entries.pop_front();
            }
        }
    }

    pub fn list(&self) -> Vec<QueryReport> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().cloned().collect()
    }

    /// Empties the history and returns how many entries were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let n = entries.len();
        entries.clear();
        n
    }
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new(None)
    }
}
