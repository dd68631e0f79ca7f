use super::resolve_paths;
use chatgalaxy_records::{JsonlStore, MessageStore};
use std::path::Path;

pub fn run(data_dir: Option<&Path>) -> anyhow::Result<()> {
    let paths = resolve_paths(data_dir)?;
    let datasets_dir = paths.datasets_dir();
    if !datasets_dir.exists() {
        println!("No datasets found under {}", datasets_dir.display());
        return Ok(());
    }

    let store = JsonlStore::open(datasets_dir)?;
    let ids = store.dataset_ids()?;
    if ids.is_empty() {
        println!("No datasets found.");
        return Ok(());
    }
    for id in ids {
        println!("{}", id);
    }
    Ok(())
}
