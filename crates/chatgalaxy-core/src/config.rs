//! Engine configuration

use crate::graph::{
    DEFAULT_MAX_NODES, DEFAULT_MIN_EDGE_WEIGHT, EDGE_DENSITY_FACTOR, MAX_KEYWORDS_PER_MESSAGE,
};
use chatgalaxy_records::{GalaxyError, Result};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CHUNK_SIZE: usize = 5000;

/// Tunables for one aggregation run. Every field has a default, so a config
/// file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Messages per chunk between cooperative yields
    pub chunk_size: usize,

    /// Node cap for the co-occurrence graph
    pub max_nodes: usize,

    /// Pairs seen fewer times than this are dropped
    pub min_edge_weight: u64,

    /// Matched keywords considered per message when pairing
    pub max_keywords_per_message: usize,

    /// Edge cap as a multiple of the node count
    pub edge_density_factor: usize,

    /// Length of the keyword ranking
    pub ranking_size: usize,

    /// Keywords listed in the report
    pub report_keywords: usize,

    /// Senders listed in the report
    pub top_senders: usize,

    /// Fixed offset applied before bucketing timestamps into hours/days
    pub utc_offset_minutes: i32,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_nodes: DEFAULT_MAX_NODES,
            min_edge_weight: DEFAULT_MIN_EDGE_WEIGHT,
            max_keywords_per_message: MAX_KEYWORDS_PER_MESSAGE,
            edge_density_factor: EDGE_DENSITY_FACTOR,
            ranking_size: 50,
            report_keywords: 20,
            top_senders: 10,
            utc_offset_minutes: 0,
        }
    }

    /// Load from a JSON file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(GalaxyError::InvalidConfig("chunk_size must be positive".into()));
        }
        if self.max_nodes == 0 {
            return Err(GalaxyError::InvalidConfig("max_nodes must be positive".into()));
        }
        if self.offset().is_none() {
            return Err(GalaxyError::InvalidConfig(format!(
                "utc_offset_minutes {} out of range",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
