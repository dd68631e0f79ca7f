pub mod datasets;
pub mod graph;
pub mod insights;
pub mod replay;
pub mod version;

use anyhow::Context;
use chatgalaxy_core::{generate_insights, EngineConfig, Insights};
use chatgalaxy_records::{JsonlStore, Paths};
use std::path::Path;

pub fn resolve_paths(data_dir: Option<&Path>) -> anyhow::Result<Paths> {
    match data_dir {
        Some(dir) => Ok(Paths::with_root(dir)),
        None => Paths::new().context("cannot resolve storage root"),
    }
}

pub fn load_config(paths: &Paths, config: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let path = config.map(Path::to_path_buf).unwrap_or_else(|| paths.config_file());
    EngineConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}

/// Run the pipeline over one stored dataset
pub fn run_pipeline(paths: &Paths, dataset: &str, config: &EngineConfig) -> anyhow::Result<Insights> {
    let store = JsonlStore::open(paths.datasets_dir())?;
    let outcome = generate_insights(&store, dataset, config, |p| {
        tracing::debug!("aggregating {}%", p.percent);
    });
    outcome
        .into_result()
        .map_err(|reason| anyhow::anyhow!("insights for '{}' failed: {}", dataset, reason))
}
