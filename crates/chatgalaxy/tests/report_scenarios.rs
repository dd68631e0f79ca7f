mod common;

use chatgalaxy_core::{aggregate, assemble, build_graph, EngineConfig, GraphLimits, InsightsReport};
use chatgalaxy_records::{ingest, Graph, Message, SenderRoster, Sentiment};
use common::{conversation, message, JAN_1_2024};
use std::collections::HashSet;

fn run(messages: &[Message], config: &EngineConfig) -> (InsightsReport, Graph) {
    let output = aggregate(messages, &SenderRoster::new(), config, |_| {});
    let graph = build_graph(&output.keywords, messages, &GraphLimits::from(config));
    (assemble(&output, &graph, config), graph)
}

#[test]
fn test_alternating_senders_all_neutral() {
    let messages: Vec<Message> = (0..6)
        .map(|i| message(i, i % 2, JAN_1_2024 + i as i64 * 60, Sentiment::Neutral, &[]))
        .collect();
    let (report, _) = run(&messages, &EngineConfig::default());
    assert_eq!(report.basic_stats.dialog_turns, 5);
    assert_eq!(report.sentiment.overall.neutral, 100.0);
}

#[test]
fn test_two_message_graph_thresholds() {
    let messages = vec![
        message(1, 0, JAN_1_2024, Sentiment::Neutral, &["a", "b"]),
        message(2, 0, JAN_1_2024 + 1, Sentiment::Neutral, &["a", "c"]),
    ];
    let loose = EngineConfig {
        min_edge_weight: 1,
        ..EngineConfig::default()
    };
    let (_, graph) = run(&messages, &loose);
    let names: HashSet<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, HashSet::from(["a", "b", "c"]));
    assert_eq!(graph.links.len(), 2);
    assert!(graph.links.iter().all(|l| l.value == 1));

    let (_, strict) = run(&messages, &EngineConfig::default());
    assert!(strict.links.is_empty());
}

#[test]
fn test_empty_message_list() {
    let (report, graph) = run(&[], &EngineConfig::default());
    assert_eq!(report.basic_stats.total_messages, 0);
    assert_eq!(report.basic_stats.date_range.start, report.basic_stats.date_range.end);
    assert_eq!(
        report.basic_stats.date_range.start,
        report.generated_at.format("%Y-%m-%d").to_string()
    );
    assert!(graph.is_empty());
    assert_eq!(report.network_stats.most_connected.node, "N/A");
}

#[test]
fn test_totals_match_input() {
    let ingested = ingest(&conversation(500));
    assert_eq!(ingested.skipped, 0);
    let messages = ingested.messages;
    let (report, _) = run(&messages, &EngineConfig::default());

    let senders: HashSet<u64> = messages.iter().map(|m| m.sender_index).collect();
    assert_eq!(report.basic_stats.total_messages, messages.len());
    assert_eq!(report.basic_stats.unique_senders, senders.len());

    let hourly: u64 = report.time_analysis.hourly.values().sum();
    let daily: u64 = report.time_analysis.daily.values().sum();
    assert_eq!(hourly, 500);
    assert_eq!(daily, 500);
}

#[test]
fn test_repeat_runs_are_identical() {
    let messages = ingest(&conversation(300)).messages;
    let config = EngineConfig {
        chunk_size: 64,
        ..EngineConfig::default()
    };
    let (first, first_graph) = run(&messages, &config);
    let (second, second_graph) = run(&messages, &config);
    assert!(first.same_content(&second));
    assert_eq!(first_graph, second_graph);
}

#[test]
fn test_graph_invariants_under_caps() {
    // every message carries 12 distinct keywords drawn from a large vocabulary
    let messages: Vec<Message> = (0..400u64)
        .map(|i| {
            let words: Vec<String> = (0..12).map(|j| format!("w{}", (i * 7 + j * 13) % 90)).collect();
            let refs: Vec<&str> = words.iter().map(String::as_str).collect();
            message(i, i % 5, JAN_1_2024 + i as i64, Sentiment::Positive, &refs)
        })
        .collect();
    let config = EngineConfig {
        max_nodes: 40,
        ..EngineConfig::default()
    };
    let (report, graph) = run(&messages, &config);

    assert!(graph.nodes.len() <= 40);
    assert!(graph.links.len() <= 3 * graph.nodes.len());
    let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for link in &graph.links {
        assert!(ids.contains(link.source.as_str()));
        assert!(ids.contains(link.target.as_str()));
        assert!(link.value >= config.min_edge_weight);
    }
    assert!(graph.links.windows(2).all(|w| w[0].value >= w[1].value));
    assert_eq!(report.network_stats.total_edges, graph.links.len());
}
