//! Aggregation, co-occurrence graph and insights engine

mod aggregator;
mod config;
mod graph;
mod insights;
mod keywords;
mod network;
mod pipeline;
mod report;
mod timetravel;

pub use aggregator::{
    aggregate, aggregate_cooperative, to_local, AggregateOutput, BatchAggregator, Progress, Sender,
    SentimentTally, TimeHistograms, TrendSegment, TREND_SEGMENTS,
};
pub use config::{EngineConfig, DEFAULT_CHUNK_SIZE};
pub use graph::{
    build_graph, node_size, GraphLimits, DEFAULT_MAX_NODES, DEFAULT_MIN_EDGE_WEIGHT,
    EDGE_DENSITY_FACTOR, MAX_KEYWORDS_PER_MESSAGE,
};
pub use insights::{assemble, assemble_at};
pub use keywords::{KeywordFrequency, KeywordStat};
pub use network::network_stats;
pub use pipeline::{
    generate_insights, generate_insights_cooperative, insights_from_tagged, Diagnostics, Insights,
    InsightsOutcome, TagShortfall,
};
pub use report::{
    percent, round1, ActivityPatterns, BasicStats, Conversation, DateRange, InsightsReport,
    KeywordEntry, MostConnected, NetworkStats, SenderCount, SentimentBreakdown, SentimentReport,
    TimeAnalysis, Topic, TrendPoint, DATA_VERSION, WEEKDAY_NAMES,
};
pub use timetravel::{filter_as_of, GraphSnapshot, ReplayTimeline, SPEEDS};
