use super::{load_config, resolve_paths, run_pipeline};
use std::path::Path;

pub fn run(data_dir: Option<&Path>, dataset: &str, top: usize) -> anyhow::Result<()> {
    let paths = resolve_paths(data_dir)?;
    let config = load_config(&paths, None)?;
    let insights = run_pipeline(&paths, dataset, &config)?;
    let graph = &insights.graph;

    println!("Keyword Graph");
    println!("=============");

    if graph.is_empty() {
        println!("No keywords in this dataset yet.");
        return Ok(());
    }

    let name = |id: &str| {
        graph
            .node(id)
            .map(|n| n.name.clone())
            .unwrap_or_else(|| id.to_string())
    };
    for link in graph.links.iter().take(top) {
        println!(
            "  {} <-> {} ({})",
            name(link.source.as_str()),
            name(link.target.as_str()),
            link.value
        );
    }

    let stats = &insights.report.network_stats;
    println!(
        "\n{} nodes, {} links, {} clusters, most connected: {} ({})",
        stats.total_nodes,
        stats.total_edges,
        stats.clusters,
        stats.most_connected.node,
        stats.most_connected.connections
    );
    Ok(())
}
