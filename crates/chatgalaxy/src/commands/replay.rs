use super::{load_config, resolve_paths, run_pipeline};
use chatgalaxy_core::{filter_as_of, ReplayTimeline, SPEEDS};
use std::path::Path;
use std::time::Duration;

pub fn run(data_dir: Option<&Path>, dataset: &str, steps: u32, speed: f64) -> anyhow::Result<()> {
    if !SPEEDS.contains(&speed) {
        anyhow::bail!("speed must be one of {:?}", SPEEDS);
    }
    let paths = resolve_paths(data_dir)?;
    let config = load_config(&paths, None)?;
    let insights = run_pipeline(&paths, dataset, &config)?;

    let Some(timeline) = ReplayTimeline::from_graph(&insights.graph) else {
        println!("Nothing to replay: the graph has no nodes.");
        return Ok(());
    };

    // One frame at 1x covers span / steps seconds of history
    let frame = Duration::from_secs_f64(timeline.span() as f64 / f64::from(steps.max(1)));
    let mut cutoff = timeline.cutoff_at(0.0);
    loop {
        let snapshot = filter_as_of(&insights.graph, cutoff);
        let when = chrono::DateTime::from_timestamp(cutoff, 0)
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let line = serde_json::json!({
            "cutoff": cutoff,
            "at": when,
            "percent": chatgalaxy_core::round1(timeline.percent_at(cutoff)),
            "nodes": snapshot.nodes.len(),
            "links": snapshot.links.len(),
        });
        println!("{line}");

        if cutoff >= timeline.end {
            break;
        }
        let (next, finished) = timeline.advance(cutoff, frame, speed);
        if next == cutoff && !finished {
            // frame shorter than a second of history
            cutoff = timeline.end;
        } else {
            cutoff = next;
        }
    }
    Ok(())
}
