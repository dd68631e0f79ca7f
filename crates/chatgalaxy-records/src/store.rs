//! Read-only access to persisted datasets

use crate::error::{GalaxyError, Result};
use crate::graph::Graph;
use crate::io::read_jsonl_values;
use crate::sender::{RosterEntry, SenderRoster};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const MESSAGES_FILE: &str = "messages.jsonl";
pub const SENDERS_FILE: &str = "senders.json";
pub const GRAPH_FILE: &str = "graph.json";

/// Everything the engine reads for one dataset
#[derive(Debug, Clone, Default)]
pub struct DatasetRecords {
    /// Wire tuples in storage order, not yet validated
    pub records: Vec<Value>,
    /// Lines the store could not parse at all
    pub unreadable: usize,
    pub roster: SenderRoster,
    /// Precomputed graph persisted alongside the dataset, if any
    pub graph: Option<Graph>,
}

/// Keyed collection of tagged messages per dataset
pub trait MessageStore {
    fn load(&self, dataset_id: &str) -> Result<DatasetRecords>;

    fn dataset_ids(&self) -> Result<Vec<String>>;
}

/// Directory layout: `<root>/<dataset>/{messages.jsonl, senders.json, graph.json}`
#[derive(Debug, Clone)]
pub struct JsonlStore {
    root: PathBuf,
}

impl JsonlStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(GalaxyError::storage(format!(
                "dataset directory {} does not exist",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Optional display names. A corrupt roster only costs the names, so
    /// senders fall back to `User <n>`.
    fn read_roster(dir: &Path) -> SenderRoster {
        let path = dir.join(SENDERS_FILE);
        let Some(contents) = read_optional(&path) else {
            return SenderRoster::new();
        };
        match serde_json::from_str::<Vec<RosterEntry>>(&contents) {
            Ok(entries) => SenderRoster::from_entries(entries),
            Err(e) => {
                tracing::warn!("ignoring unreadable {}: {}", path.display(), e);
                SenderRoster::new()
            }
        }
    }

    fn read_graph(dir: &Path) -> Option<Graph> {
        let path = dir.join(GRAPH_FILE);
        let contents = read_optional(&path)?;
        match serde_json::from_str(&contents) {
            Ok(graph) => Some(graph),
            Err(e) => {
                tracing::warn!("ignoring unreadable {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Contents of an optional side file. Absence is silent; any other read
/// failure is logged and treated as absent.
fn read_optional(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            None
        }
    }
}

impl MessageStore for JsonlStore {
    fn load(&self, dataset_id: &str) -> Result<DatasetRecords> {
        let dir = self.root.join(dataset_id);
        if !dir.is_dir() {
            return Err(GalaxyError::DatasetNotFound(dataset_id.to_string()));
        }

        let messages_path = dir.join(MESSAGES_FILE);
        let (records, unreadable) = if messages_path.exists() {
            let lines = read_jsonl_values(&messages_path).map_err(|e| unavailable(&messages_path, e))?;
            (lines.values, lines.unparsable)
        } else {
            (Vec::new(), 0)
        };

        tracing::debug!(
            "loaded {} records ({} unreadable) from {}",
            records.len(),
            unreadable,
            dir.display()
        );

        Ok(DatasetRecords {
            records,
            unreadable,
            roster: Self::read_roster(&dir),
            graph: Self::read_graph(&dir),
        })
    }

    fn dataset_ids(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| unavailable(&self.root, e))?;
        let mut ids: Vec<String> = entries
            .flatten()
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().map(String::from))
            .collect();
        ids.sort();
        Ok(ids)
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> GalaxyError {
    GalaxyError::storage(format!("cannot read {}: {}", path.display(), err))
}

/// In-memory store, mainly for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    datasets: HashMap<String, DatasetRecords>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dataset_id: impl Into<String>, records: DatasetRecords) {
        self.datasets.insert(dataset_id.into(), records);
    }
}

impl MessageStore for MemoryStore {
    fn load(&self, dataset_id: &str) -> Result<DatasetRecords> {
        self.datasets
            .get(dataset_id)
            .cloned()
            .ok_or_else(|| GalaxyError::DatasetNotFound(dataset_id.to_string()))
    }

    fn dataset_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.datasets.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
