//! Chunked single-pass aggregation over a message sequence
//!
//! [`BatchAggregator`] processes one chunk per `next()` and yields a
//! [`Progress`] event, so the caller decides when to hand control back to its
//! scheduler. [`aggregate`] drives it to completion synchronously and
//! [`aggregate_cooperative`] yields to the tokio scheduler between chunks.
//! Dropping the iterator abandons the run; nothing partial escapes.

use crate::config::EngineConfig;
use crate::keywords::KeywordFrequency;
use chatgalaxy_records::{Message, SenderRoster, Sentiment};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use std::collections::{BTreeMap, HashMap};

/// Slices used for the sentiment trend
pub const TREND_SEGMENTS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: String,
    pub display_name: String,
    pub message_count: u64,
}

/// Counts per sentiment code. Sums to the number of scanned messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally([u64; 4]);

impl SentimentTally {
    pub fn add(&mut self, sentiment: Sentiment) {
        self.0[sentiment.code() as usize] += 1;
    }

    pub fn get(&self, sentiment: Sentiment) -> u64 {
        self.0[sentiment.code() as usize]
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeHistograms {
    pub hourly: [u64; 24],
    /// Monday = 0
    pub weekday: [u64; 7],
    /// (year, month) -> count
    pub monthly: BTreeMap<(i32, u32), u64>,
    /// calendar day -> count
    pub daily: BTreeMap<NaiveDate, u64>,
}

impl Default for TimeHistograms {
    fn default() -> Self {
        Self {
            hourly: [0; 24],
            weekday: [0; 7],
            monthly: BTreeMap::new(),
            daily: BTreeMap::new(),
        }
    }
}

/// One index slice of the sentiment trend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendSegment {
    pub first_timestamp: i64,
    pub tally: SentimentTally,
    pub messages: u64,
}

/// Everything a completed scan produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateOutput {
    pub total_messages: usize,
    /// First-seen order
    pub senders: Vec<Sender>,
    pub sentiment: SentimentTally,
    pub keywords: KeywordFrequency,
    pub histograms: TimeHistograms,
    pub dialog_turns: u64,
    /// (min, max) timestamp; `None` for an empty scan
    pub time_span: Option<(i64, i64)>,
    pub trend: Vec<TrendSegment>,
    pub offset: FixedOffset,
}

#[derive(Debug)]
struct SenderTally {
    sender_index: u64,
    count: u64,
}

/// Running state threaded through the chunk loop
#[derive(Debug)]
struct Accumulator {
    offset: FixedOffset,
    total: usize,
    sender_slots: HashMap<u64, usize>,
    senders: Vec<SenderTally>,
    sentiment: SentimentTally,
    keywords: KeywordFrequency,
    histograms: TimeHistograms,
    dialog_turns: u64,
    last_sender: Option<u64>,
    time_span: Option<(i64, i64)>,
    trend: Vec<TrendSegment>,
    trend_segment: Option<usize>,
}

impl Accumulator {
    fn new(total: usize, offset: FixedOffset) -> Self {
        Self {
            offset,
            total,
            sender_slots: HashMap::new(),
            senders: Vec::new(),
            sentiment: SentimentTally::default(),
            keywords: KeywordFrequency::new(),
            histograms: TimeHistograms::default(),
            dialog_turns: 0,
            last_sender: None,
            time_span: None,
            trend: Vec::new(),
            trend_segment: None,
        }
    }

    fn absorb(&mut self, position: usize, msg: &Message) {
        let slot = match self.sender_slots.get(&msg.sender_index) {
            Some(&slot) => slot,
            None => {
                let slot = self.senders.len();
                self.sender_slots.insert(msg.sender_index, slot);
                self.senders.push(SenderTally {
                    sender_index: msg.sender_index,
                    count: 0,
                });
                slot
            }
        };
        self.senders[slot].count += 1;

        if let Some(prev) = self.last_sender {
            if prev != msg.sender_index {
                self.dialog_turns += 1;
            }
        }
        self.last_sender = Some(msg.sender_index);

        self.sentiment.add(msg.sentiment);

        for kw in &msg.keywords {
            self.keywords.record(kw, msg.timestamp);
        }

        self.time_span = Some(match self.time_span {
            Some((lo, hi)) => (lo.min(msg.timestamp), hi.max(msg.timestamp)),
            None => (msg.timestamp, msg.timestamp),
        });

        let local = to_local(msg.timestamp, self.offset);
        self.histograms.hourly[local.hour() as usize] += 1;
        self.histograms.weekday[local.weekday().num_days_from_monday() as usize] += 1;
        *self
            .histograms
            .monthly
            .entry((local.year(), local.month()))
            .or_default() += 1;
        *self.histograms.daily.entry(local.date_naive()).or_default() += 1;

        let segment = trend_segment(position, self.total);
        if self.trend_segment != Some(segment) {
            self.trend_segment = Some(segment);
            self.trend.push(TrendSegment {
                first_timestamp: msg.timestamp,
                tally: SentimentTally::default(),
                messages: 0,
            });
        }
        if let Some(current) = self.trend.last_mut() {
            current.tally.add(msg.sentiment);
            current.messages += 1;
        }
    }

    fn finish(self, roster: &SenderRoster) -> AggregateOutput {
        let senders = self
            .senders
            .into_iter()
            .map(|s| Sender {
                id: s.sender_index.to_string(),
                display_name: roster.display_name(s.sender_index),
                message_count: s.count,
            })
            .collect();

        AggregateOutput {
            total_messages: self.total,
            senders,
            sentiment: self.sentiment,
            keywords: self.keywords,
            histograms: self.histograms,
            dialog_turns: self.dialog_turns,
            time_span: self.time_span,
            trend: self.trend,
            offset: self.offset,
        }
    }
}

/// Shift a unix timestamp into the configured fixed offset
pub fn to_local(timestamp: i64, offset: FixedOffset) -> DateTime<FixedOffset> {
    DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .with_timezone(&offset)
}

/// Segment k covers indices `[k*n/6, (k+1)*n/6)`
fn trend_segment(position: usize, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    // Largest k with floor(k*n/6) <= position
    let mut k = (position * TREND_SEGMENTS) / total;
    while k + 1 < TREND_SEGMENTS && (k + 1) * total / TREND_SEGMENTS <= position {
        k += 1;
    }
    while k > 0 && k * total / TREND_SEGMENTS > position {
        k -= 1;
    }
    k
}

/// Chunked scan. Each `next()` consumes at most `chunk_size` messages.
pub struct BatchAggregator<'a> {
    messages: &'a [Message],
    chunk_size: usize,
    cursor: usize,
    acc: Accumulator,
}

impl<'a> BatchAggregator<'a> {
    pub fn new(messages: &'a [Message], config: &EngineConfig) -> Self {
        let offset = config.offset().unwrap_or_else(|| Utc.fix());
        Self {
            messages,
            chunk_size: config.chunk_size.max(1),
            cursor: 0,
            acc: Accumulator::new(messages.len(), offset),
        }
    }

    pub fn is_done(&self) -> bool {
        self.cursor >= self.messages.len()
    }

    /// Consume the remaining chunks and return the result
    pub fn finish(mut self, roster: &SenderRoster) -> AggregateOutput {
        while self.next().is_some() {}
        self.acc.finish(roster)
    }
}

impl Iterator for BatchAggregator<'_> {
    type Item = Progress;

    fn next(&mut self) -> Option<Progress> {
        if self.is_done() {
            return None;
        }

        let start = self.cursor;
        let end = (start + self.chunk_size).min(self.messages.len());
        for (offset, msg) in self.messages[start..end].iter().enumerate() {
            self.acc.absorb(start + offset, msg);
        }
        self.cursor = end;

        let total = self.messages.len();
        let progress = Progress {
            processed: end,
            total,
            percent: ((end as f64 / total as f64) * 100.0).round() as u8,
        };
        tracing::debug!("aggregated {}/{} messages", end, total);
        Some(progress)
    }
}

/// Drive a scan to completion, reporting progress after every chunk
pub fn aggregate(
    messages: &[Message],
    roster: &SenderRoster,
    config: &EngineConfig,
    mut on_progress: impl FnMut(Progress),
) -> AggregateOutput {
    let mut batches = BatchAggregator::new(messages, config);
    for progress in batches.by_ref() {
        on_progress(progress);
    }
    batches.finish(roster)
}

/// Like [`aggregate`], but yields to the tokio scheduler after every chunk
pub async fn aggregate_cooperative(
    messages: &[Message],
    roster: &SenderRoster,
    config: &EngineConfig,
    mut on_progress: impl FnMut(Progress),
) -> AggregateOutput {
    let mut batches = BatchAggregator::new(messages, config);
    for progress in batches.by_ref() {
        on_progress(progress);
        tokio::task::yield_now().await;
    }
    batches.finish(roster)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(id: u64, sender: u64, ts: i64, sentiment: Sentiment, kws: &[&str]) -> Message {
        Message {
            id,
            sender_index: sender,
            timestamp: ts,
            text: String::new(),
            sentiment,
            keywords: kws.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn config(chunk_size: usize) -> EngineConfig {
        EngineConfig {
            chunk_size,
            ..EngineConfig::default()
        }
    }

    fn sample(n: u64) -> Vec<Message> {
        (0..n)
            .map(|i| {
                let sentiment = Sentiment::from_code(i % 4).unwrap();
                msg(i, i % 3, 1_700_000_000 + (i as i64) * 4_000, sentiment, &["k", "m"])
            })
            .collect()
    }

    #[test]
    fn test_alternating_senders_dialog_turns() {
        let messages: Vec<Message> = (0..6)
            .map(|i| msg(i, i % 2, 100 + i as i64, Sentiment::Neutral, &[]))
            .collect();
        let out = aggregate(&messages, &SenderRoster::new(), &config(5000), |_| {});
        assert_eq!(out.dialog_turns, 5);
        assert_eq!(out.sentiment.get(Sentiment::Neutral), 6);
    }

    #[test]
    fn test_dialog_turns_span_chunk_boundary() {
        let messages = vec![
            msg(1, 0, 1, Sentiment::Neutral, &[]),
            msg(2, 0, 2, Sentiment::Neutral, &[]),
            msg(3, 1, 3, Sentiment::Neutral, &[]),
        ];
        let out = aggregate(&messages, &SenderRoster::new(), &config(2), |_| {});
        assert_eq!(out.dialog_turns, 1);
    }

    #[test]
    fn test_chunk_size_does_not_change_result() {
        let messages = sample(101);
        let roster = SenderRoster::new();
        let whole = aggregate(&messages, &roster, &config(5000), |_| {});
        for chunk in [1, 7, 50, 100, 101] {
            let chunked = aggregate(&messages, &roster, &config(chunk), |_| {});
            assert_eq!(whole, chunked, "chunk size {}", chunk);
        }
    }

    #[test]
    fn test_progress_events_per_chunk() {
        let messages = sample(10);
        let mut events = Vec::new();
        aggregate(&messages, &SenderRoster::new(), &config(4), |p| events.push(p));
        let processed: Vec<usize> = events.iter().map(|p| p.processed).collect();
        assert_eq!(processed, vec![4, 8, 10]);
        assert_eq!(events.last().unwrap().percent, 100);
    }

    #[test]
    fn test_senders_in_first_seen_order() {
        let messages = vec![
            msg(1, 9, 1, Sentiment::Neutral, &[]),
            msg(2, 4, 2, Sentiment::Neutral, &[]),
            msg(3, 4, 3, Sentiment::Neutral, &[]),
        ];
        let mut roster = SenderRoster::new();
        roster.insert(4, "dana");
        let out = aggregate(&messages, &roster, &config(5000), |_| {});
        assert_eq!(out.senders[0].id, "9");
        assert_eq!(out.senders[0].display_name, "User 9");
        assert_eq!(out.senders[1].display_name, "dana");
        assert_eq!(out.senders[1].message_count, 2);
    }

    #[test]
    fn test_sentiment_sums_to_total() {
        let messages = sample(37);
        let out = aggregate(&messages, &SenderRoster::new(), &config(5), |_| {});
        assert_eq!(out.sentiment.total(), 37);
        assert_eq!(out.keywords.count("k"), 37);
    }

    #[test]
    fn test_histograms_use_offset() {
        // 2024-01-01T23:30:00Z is a Monday; +60 minutes moves it to Tuesday 00:30
        let messages = vec![msg(1, 0, 1_704_151_800, Sentiment::Neutral, &[])];
        let utc = aggregate(&messages, &SenderRoster::new(), &config(10), |_| {});
        assert_eq!(utc.histograms.hourly[23], 1);
        assert_eq!(utc.histograms.weekday[0], 1);

        let shifted_config = EngineConfig {
            utc_offset_minutes: 60,
            ..EngineConfig::default()
        };
        let shifted = aggregate(&messages, &SenderRoster::new(), &shifted_config, |_| {});
        assert_eq!(shifted.histograms.hourly[0], 1);
        assert_eq!(shifted.histograms.weekday[1], 1);
        assert_eq!(shifted.histograms.monthly.get(&(2024, 1)), Some(&1));
    }

    #[test]
    fn test_trend_segments_cover_all_messages() {
        let messages = sample(13);
        let out = aggregate(&messages, &SenderRoster::new(), &config(3), |_| {});
        assert_eq!(out.trend.len(), TREND_SEGMENTS);
        let covered: u64 = out.trend.iter().map(|s| s.messages).sum();
        assert_eq!(covered, 13);
        assert_eq!(out.trend[0].first_timestamp, messages[0].timestamp);
    }

    #[test]
    fn test_trend_with_fewer_messages_than_segments() {
        let messages = sample(3);
        let out = aggregate(&messages, &SenderRoster::new(), &config(3), |_| {});
        assert_eq!(out.trend.len(), 3);
    }

    #[test]
    fn test_trend_segment_boundaries() {
        let segments: Vec<usize> = (0..12).map(|i| trend_segment(i, 12)).collect();
        assert_eq!(segments, vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5]);
        let sparse: Vec<usize> = (0..4).map(|i| trend_segment(i, 4)).collect();
        assert_eq!(sparse, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_abandoned_scan_leaves_next_run_untouched() {
        let messages = sample(30);
        let roster = SenderRoster::new();
        let expected = aggregate(&messages, &roster, &config(8), |_| {});

        let mut batches = BatchAggregator::new(&messages, &config(8));
        assert_eq!(batches.next().map(|p| p.processed), Some(8));
        assert!(!batches.is_done());
        drop(batches);

        let fresh = aggregate(&messages, &roster, &config(8), |_| {});
        assert_eq!(fresh, expected);
        assert_eq!(fresh.total_messages, 30);
    }

    #[test]
    fn test_empty_input() {
        let mut batches = BatchAggregator::new(&[], &config(10));
        assert!(batches.next().is_none());
        let out = batches.finish(&SenderRoster::new());
        assert_eq!(out.total_messages, 0);
        assert!(out.time_span.is_none());
        assert!(out.trend.is_empty());
    }

    #[tokio::test]
    async fn test_cooperative_matches_sync() {
        let messages = sample(50);
        let roster = SenderRoster::new();
        let mut chunks = 0;
        let coop = aggregate_cooperative(&messages, &roster, &config(8), |_| chunks += 1).await;
        let sync = aggregate(&messages, &roster, &config(8), |_| {});
        assert_eq!(coop, sync);
        assert_eq!(chunks, 7);
    }
}
