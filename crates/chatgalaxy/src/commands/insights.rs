use super::{load_config, resolve_paths, run_pipeline};
use chatgalaxy_records::atomic_write;
use std::path::Path;

pub fn run(
    data_dir: Option<&Path>,
    dataset: &str,
    out: Option<&Path>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let paths = resolve_paths(data_dir)?;
    let config = load_config(&paths, config)?;
    let insights = run_pipeline(&paths, dataset, &config)?;

    let out_path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| paths.report_file(dataset));
    let json = serde_json::to_vec_pretty(&insights.report)?;
    atomic_write(&out_path, &json)?;

    let diagnostics = &insights.diagnostics;
    let summary = serde_json::json!({
        "report": out_path.display().to_string(),
        "total_messages": insights.report.basic_stats.total_messages,
        "nodes": insights.report.network_stats.total_nodes,
        "links": insights.report.network_stats.total_edges,
        "skipped_records": diagnostics.skipped_records,
        "unreadable_lines": diagnostics.unreadable_lines,
        "graph_reused": diagnostics.graph_reused,
    });
    println!("{summary}");
    Ok(())
}
