#![allow(dead_code)]

use chatgalaxy_records::{append_jsonl, Message, Sentiment, MESSAGES_FILE, SENDERS_FILE};
use serde_json::{json, Value};
use std::path::Path;

/// 2024-01-01T00:00:00Z, a Monday
pub const JAN_1_2024: i64 = 1_704_067_200;

pub fn message(id: u64, sender: u64, timestamp: i64, sentiment: Sentiment, keywords: &[&str]) -> Message {
    Message {
        id,
        sender_index: sender,
        timestamp,
        text: format!("message {}", id),
        sentiment,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

pub fn wire(id: u64, sender: u64, timestamp: i64, sentiment: u8, keywords: &[&str]) -> Value {
    json!([id, sender, timestamp, format!("message {}", id), sentiment, keywords])
}

/// A few hundred messages from three senders over two weeks, with a fixed
/// vocabulary so that some keyword pairs repeat
pub fn conversation(n: u64) -> Vec<Value> {
    let vocabulary = ["rust", "tokio", "graph", "chunk", "lunch", "deploy", "bug"];
    (0..n)
        .map(|i| {
            let a = vocabulary[(i % 7) as usize];
            let b = vocabulary[((i * 3 + 1) % 7) as usize];
            wire(i, i % 3, JAN_1_2024 + (i as i64) * 3_600, (i % 4) as u8, &[a, b])
        })
        .collect()
}

/// Lay out `<root>/datasets/<id>/` with messages and a roster
pub fn seed_dataset(root: &Path, id: &str, records: &[Value]) {
    let dir = root.join("datasets").join(id);
    std::fs::create_dir_all(&dir).unwrap();
    append_jsonl(&dir.join(MESSAGES_FILE), records).unwrap();
    std::fs::write(
        dir.join(SENDERS_FILE),
        r#"[{"id": 0, "name": "ana"}, {"id": 1, "name": "ben"}, {"id": 2, "name": "cleo"}]"#,
    )
    .unwrap();
}
