//! Sender roster: display names keyed by sender index

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: u64,
    pub name: String,
}

/// Display names for sender indices. Unknown indices fall back to `User <n>`.
#[derive(Debug, Clone, Default)]
pub struct SenderRoster {
    names: HashMap<u64, String>,
}

impl SenderRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<RosterEntry>) -> Self {
        Self {
            names: entries.into_iter().map(|e| (e.id, e.name)).collect(),
        }
    }

    pub fn insert(&mut self, index: u64, name: impl Into<String>) {
        self.names.insert(index, name.into());
    }

    pub fn display_name(&self, index: u64) -> String {
        self.names
            .get(&index)
            .cloned()
            .unwrap_or_else(|| format!("User {}", index))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
