//! Frames exchanged with the tagger worker
//!
//! Both directions travel as JSON text, so nothing is shared between the
//! caller and the worker thread.

use chatgalaxy_records::RawMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{"type": "process", "payload": [...]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum TaggerRequest {
    Process(Vec<RawMessage>),
}

/// Progress notifications may arrive before the single `result` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum TaggerEvent {
    Progress { percent: u8 },
    /// Wire tuples, validated by the receiver
    Result(Vec<Value>),
    Error { message: String },
}

impl TaggerEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaggerEvent::Progress { .. })
    }
}
