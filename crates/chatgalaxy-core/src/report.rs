//! Insights report shape
//!
//! Key names and nesting are read by the rendering side; renaming a field is
//! a breaking change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DATA_VERSION: &str = "3.0.0";

/// Weekday names, Monday first. `time_analysis.daily` keys index into this.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub generated_at: DateTime<Utc>,
    pub data_version: String,
    pub basic_stats: BasicStats,
    pub time_analysis: TimeAnalysis,
    pub sentiment: SentimentReport,
    pub keywords: Vec<KeywordEntry>,
    pub topics: Vec<Topic>,
    pub activity_patterns: ActivityPatterns,
    pub network_stats: NetworkStats,
}

impl InsightsReport {
    /// Equality ignoring `generated_at`
    pub fn same_content(&self, other: &InsightsReport) -> bool {
        InsightsReport {
            generated_at: other.generated_at,
            ..self.clone()
        } == *other
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// `YYYY-MM-DD`
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicStats {
    pub total_messages: usize,
    pub date_range: DateRange,
    pub unique_senders: usize,
    pub top_senders: Vec<SenderCount>,
    pub dialog_turns: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeAnalysis {
    /// hour 0..=23 -> count
    pub hourly: BTreeMap<u8, u64>,
    /// weekday (Monday = 0) -> count
    pub daily: BTreeMap<u8, u64>,
    /// `YYYY-MM` -> count
    pub monthly: BTreeMap<String, u64>,
    pub peak_hour: u8,
    pub peak_day: u8,
    pub weekday_names: Vec<String>,
}

/// Percentages with one decimal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub happy: f64,
    pub neutral: f64,
    pub question: f64,
    pub sad: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(flatten)]
    pub breakdown: SentimentBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub overall: SentimentBreakdown,
    pub daily_trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub word: String,
    pub count: u64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub topic: String,
    pub relevance: f64,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub date: String,
    pub message_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPatterns {
    pub most_active_hour: u8,
    pub most_active_day: String,
    pub average_messages_per_day: u64,
    pub longest_conversation: Conversation,
    /// `YYYY-MM`
    pub busiest_month: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostConnected {
    pub node: String,
    pub connections: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub avg_connections: f64,
    pub most_connected: MostConnected,
    pub clusters: usize,
    pub modularity: f64,
}

impl Default for NetworkStats {
    fn default() -> Self {
        Self {
            total_nodes: 0,
            total_edges: 0,
            avg_connections: 0.0,
            most_connected: MostConnected {
                node: "N/A".to_string(),
                connections: 0,
            },
            clusters: 0,
            modularity: 0.0,
        }
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole` as a one-decimal percentage; a zero `whole` counts as 1
pub fn percent(part: u64, whole: u64) -> f64 {
    round1(part as f64 / whole.max(1) as f64 * 100.0)
}
