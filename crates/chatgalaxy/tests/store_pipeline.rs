mod common;

use chatgalaxy_core::{generate_insights, EngineConfig, InsightsOutcome, InsightsReport};
use chatgalaxy_records::{atomic_write, JsonlStore, Paths, GRAPH_FILE, MESSAGES_FILE, SENDERS_FILE};
use common::{conversation, seed_dataset, wire, JAN_1_2024};
use tempfile::TempDir;

fn store(temp: &TempDir) -> JsonlStore {
    JsonlStore::open(Paths::with_root(temp.path()).datasets_dir()).unwrap()
}

#[test]
fn test_report_from_disk_uses_roster() {
    let temp = TempDir::new().unwrap();
    seed_dataset(temp.path(), "team", &conversation(90));

    let outcome = generate_insights(&store(&temp), "team", &EngineConfig::default(), |_| {});
    let report = outcome.report().unwrap();
    assert_eq!(report.basic_stats.total_messages, 90);
    assert_eq!(report.basic_stats.unique_senders, 3);
    let names: Vec<&str> = report.basic_stats.top_senders.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["ana", "ben", "cleo"]);
    assert_eq!(report.basic_stats.date_range.start, "2024-01-01");
}

#[test]
fn test_malformed_and_unreadable_lines_are_skipped() {
    let temp = TempDir::new().unwrap();
    seed_dataset(
        temp.path(),
        "messy",
        &[
            wire(1, 0, JAN_1_2024, 0, &["a"]),
            serde_json::json!([2, 1]),
            serde_json::json!([3, 0, JAN_1_2024 + 5, "x", 7, []]),
            wire(4, 1, JAN_1_2024 + 9, 2, &["a"]),
        ],
    );
    let path = temp.path().join("datasets/messy").join(MESSAGES_FILE);
    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("not json at all\n");
    std::fs::write(&path, contents).unwrap();

    let insights = generate_insights(&store(&temp), "messy", &EngineConfig::default(), |_| {})
        .into_result()
        .unwrap();
    assert_eq!(insights.report.basic_stats.total_messages, 2);
    assert_eq!(insights.diagnostics.skipped_records, 2);
    assert_eq!(insights.diagnostics.unreadable_lines, 1);
}

#[test]
fn test_non_utf8_line_does_not_abort_dataset() {
    let temp = TempDir::new().unwrap();
    seed_dataset(temp.path(), "mixed", &conversation(10));
    let path = temp.path().join("datasets/mixed").join(MESSAGES_FILE);
    let mut bytes = std::fs::read(&path).unwrap();
    bytes.extend_from_slice(b"[99, 0, 1704067200, \"bad \xff\xfe\", 0, []]\n");
    std::fs::write(&path, bytes).unwrap();

    let insights = generate_insights(&store(&temp), "mixed", &EngineConfig::default(), |_| {})
        .into_result()
        .unwrap();
    assert_eq!(insights.report.basic_stats.total_messages, 10);
    assert_eq!(insights.diagnostics.unreadable_lines, 1);
}

#[test]
fn test_corrupt_roster_uses_default_names() {
    let temp = TempDir::new().unwrap();
    seed_dataset(temp.path(), "team", &conversation(6));
    std::fs::write(temp.path().join("datasets/team").join(SENDERS_FILE), "{oops").unwrap();

    let outcome = generate_insights(&store(&temp), "team", &EngineConfig::default(), |_| {});
    let report = outcome.report().unwrap();
    assert_eq!(report.basic_stats.total_messages, 6);
    assert!(report.basic_stats.top_senders.iter().all(|s| s.name.starts_with("User ")));
}

#[test]
fn test_missing_storage_root() {
    let temp = TempDir::new().unwrap();
    let err = JsonlStore::open(temp.path().join("gone")).unwrap_err();
    assert!(err.to_string().contains("message store unavailable"));
}

#[test]
fn test_unknown_dataset_is_terminal_failure() {
    let temp = TempDir::new().unwrap();
    seed_dataset(temp.path(), "team", &conversation(3));
    match generate_insights(&store(&temp), "other", &EngineConfig::default(), |_| {}) {
        InsightsOutcome::Failed { reason } => assert!(reason.contains("other")),
        InsightsOutcome::Ready(_) => panic!("expected failure"),
    }
}

#[test]
fn test_stored_graph_with_object_endpoints() {
    let temp = TempDir::new().unwrap();
    seed_dataset(temp.path(), "laid-out", &conversation(20));
    let graph_json = r#"{
        "nodes": [
            {"id": "0", "name": "alpha", "value": 4, "val": 6.2, "x": 1.0},
            {"id": "1", "name": "beta", "count": 3, "val": 5.0}
        ],
        "links": [{"source": {"id": "0", "vx": 0.1}, "target": {"id": "1"}, "value": 2, "count": 2}]
    }"#;
    std::fs::write(temp.path().join("datasets/laid-out").join(GRAPH_FILE), graph_json).unwrap();

    let insights = generate_insights(&store(&temp), "laid-out", &EngineConfig::default(), |_| {})
        .into_result()
        .unwrap();
    assert!(insights.diagnostics.graph_reused);
    assert_eq!(insights.graph.nodes[0].count, 4);
    let stats = &insights.report.network_stats;
    assert_eq!(stats.total_nodes, 2);
    assert_eq!(stats.most_connected.node, "alpha");
    assert_eq!(stats.avg_connections, 1.0);
    assert_eq!(stats.clusters, 1);
}

#[test]
fn test_written_report_reads_back() {
    let temp = TempDir::new().unwrap();
    seed_dataset(temp.path(), "team", &conversation(40));
    let paths = Paths::with_root(temp.path());
    let report = generate_insights(&store(&temp), "team", &EngineConfig::default(), |_| {})
        .into_result()
        .unwrap()
        .report;

    let out = paths.report_file("team");
    atomic_write(&out, &serde_json::to_vec_pretty(&report).unwrap()).unwrap();
    let read: InsightsReport = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
    assert_eq!(read, report);
    assert!(!out.with_file_name("team.insights.json.partial").exists());
}
