//! Tagged message records and the positional wire format

use crate::error::{GalaxyError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sentiment label assigned by the tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Neutral,
    Positive,
    Question,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Neutral,
        Sentiment::Positive,
        Sentiment::Question,
        Sentiment::Negative,
    ];

    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Sentiment::Neutral),
            1 => Some(Sentiment::Positive),
            2 => Some(Sentiment::Question),
            3 => Some(Sentiment::Negative),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Sentiment::Neutral => 0,
            Sentiment::Positive => 1,
            Sentiment::Question => 2,
            Sentiment::Negative => 3,
        }
    }
}

/// A message after tagging. Read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub sender_index: u64,
    pub timestamp: i64,
    pub text: String,
    pub sentiment: Sentiment,
    pub keywords: Vec<String>,
}

/// `[id, senderIndex, timestampSeconds, text, sentimentCode, keywordList]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage(pub u64, pub u64, pub i64, pub String, pub u8, pub Vec<String>);

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        WireMessage(
            msg.id,
            msg.sender_index,
            msg.timestamp,
            msg.text.clone(),
            msg.sentiment.code(),
            msg.keywords.clone(),
        )
    }
}

impl Message {
    /// Decode one positional wire tuple.
    ///
    /// Sentiment and keyword slots are optional (default neutral / empty);
    /// everything before them is required. Keywords are trimmed and empty
    /// entries dropped.
    pub fn from_wire(value: &Value, position: usize) -> Result<Self> {
        let fields = value
            .as_array()
            .ok_or_else(|| GalaxyError::malformed(position, "record is not an array"))?;
        if fields.len() < 4 {
            return Err(GalaxyError::malformed(
                position,
                format!("expected at least 4 fields, got {}", fields.len()),
            ));
        }

        let id = fields[0]
            .as_u64()
            .ok_or_else(|| GalaxyError::malformed(position, "id must be a non-negative integer"))?;
        let sender_index = fields[1]
            .as_u64()
            .ok_or_else(|| GalaxyError::malformed(position, "sender index must be an integer"))?;
        let timestamp = fields[2]
            .as_i64()
            .filter(|&ts| chrono::DateTime::from_timestamp(ts, 0).is_some())
            .ok_or_else(|| GalaxyError::malformed(position, "timestamp must be an integer in range"))?;
        let text = fields[3]
            .as_str()
            .ok_or_else(|| GalaxyError::malformed(position, "text must be a string"))?
            .to_string();

        let sentiment = match fields.get(4) {
            None | Some(Value::Null) => Sentiment::Neutral,
            Some(v) => v
                .as_u64()
                .and_then(Sentiment::from_code)
                .ok_or_else(|| GalaxyError::malformed(position, format!("bad sentiment {}", v)))?,
        };

        let keywords = match fields.get(5) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|k| k.as_str())
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        };

        Ok(Message {
            id,
            sender_index,
            timestamp,
            text,
            sentiment,
            keywords,
        })
    }

    pub fn to_wire(&self) -> WireMessage {
        WireMessage::from(self)
    }
}

/// Result of decoding a batch of wire records
#[derive(Debug, Default)]
pub struct Ingested {
    pub messages: Vec<Message>,
    pub skipped: usize,
}

/// Decode a batch, skipping and counting malformed records
pub fn ingest(records: &[Value]) -> Ingested {
    let mut out = Ingested {
        messages: Vec::with_capacity(records.len()),
        skipped: 0,
    };
    for (position, record) in records.iter().enumerate() {
        match Message::from_wire(record, position) {
            Ok(msg) => out.messages.push(msg),
            Err(e) => {
                tracing::warn!("skipping record: {}", e);
                out.skipped += 1;
            }
        }
    }
    out
}

/// An untagged message as handed to the tagger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub id: u64,
    pub sender_index: u64,
    pub timestamp: i64,
    pub text: String,
}
