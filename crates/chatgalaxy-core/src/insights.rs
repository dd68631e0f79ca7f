//! Insights assembly
//!
//! Combines a finished scan with its keyword graph into one immutable
//! [`InsightsReport`]. Nothing here has side effects apart from reading the
//! clock for `generated_at`; [`assemble_at`] takes the clock as an argument.

use crate::aggregator::{to_local, AggregateOutput, SentimentTally};
use crate::config::EngineConfig;
use crate::network::network_stats;
use crate::report::{
    percent, ActivityPatterns, BasicStats, Conversation, DateRange, InsightsReport, KeywordEntry,
    SenderCount, SentimentBreakdown, SentimentReport, TimeAnalysis, Topic, TrendPoint,
    DATA_VERSION, WEEKDAY_NAMES,
};
use chatgalaxy_records::{Graph, Sentiment};
use chrono::{DateTime, FixedOffset, Utc};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const KEYWORD_CATEGORY: &str = "keyword";

/// (title, relevance, ranking slice)
const TOPICS: [(&str, f64, usize, usize); 2] = [
    ("Hot topics", 0.89, 0, 5),
    ("Active discussions", 0.75, 5, 10),
];

fn day_string(timestamp: i64, offset: FixedOffset) -> String {
    to_local(timestamp, offset).format("%Y-%m-%d").to_string()
}

/// Index of the largest bucket; the lowest index wins ties
fn peak<'a>(counts: impl IntoIterator<Item = &'a u64>) -> usize {
    let mut best = 0;
    let mut best_count = 0;
    for (i, &count) in counts.into_iter().enumerate() {
        if count > best_count {
            best = i;
            best_count = count;
        }
    }
    best
}

fn breakdown(tally: &SentimentTally, total: u64) -> SentimentBreakdown {
    SentimentBreakdown {
        happy: percent(tally.get(Sentiment::Positive), total),
        neutral: percent(tally.get(Sentiment::Neutral), total),
        question: percent(tally.get(Sentiment::Question), total),
        sad: percent(tally.get(Sentiment::Negative), total),
    }
}

fn basic_stats(output: &AggregateOutput, config: &EngineConfig, now: DateTime<Utc>) -> BasicStats {
    let date_range = match output.time_span {
        Some((lo, hi)) => DateRange {
            start: day_string(lo, output.offset),
            end: day_string(hi, output.offset),
        },
        None => {
            let today = day_string(now.timestamp(), output.offset);
            DateRange {
                start: today.clone(),
                end: today,
            }
        }
    };

    let mut ranked: Vec<_> = output.senders.iter().collect();
    ranked.sort_by_key(|s| std::cmp::Reverse(s.message_count));
    let top_senders = ranked
        .into_iter()
        .take(config.top_senders)
        .map(|s| SenderCount {
            name: s.display_name.clone(),
            count: s.message_count,
        })
        .collect();

    BasicStats {
        total_messages: output.total_messages,
        date_range,
        unique_senders: output.senders.len(),
        top_senders,
        dialog_turns: output.dialog_turns,
    }
}

fn time_analysis(output: &AggregateOutput) -> TimeAnalysis {
    let h = &output.histograms;
    TimeAnalysis {
        hourly: (0u8..).zip(h.hourly.iter().copied()).collect(),
        daily: (0u8..).zip(h.weekday.iter().copied()).collect(),
        monthly: h
            .monthly
            .iter()
            .map(|(&(year, month), &count)| (format!("{:04}-{:02}", year, month), count))
            .collect(),
        peak_hour: peak(&h.hourly) as u8,
        peak_day: peak(&h.weekday) as u8,
        weekday_names: WEEKDAY_NAMES.iter().map(|n| n.to_string()).collect(),
    }
}

fn sentiment(output: &AggregateOutput) -> SentimentReport {
    let daily_trend = output
        .trend
        .iter()
        .map(|segment| TrendPoint {
            date: day_string(segment.first_timestamp, output.offset),
            breakdown: breakdown(&segment.tally, segment.messages),
        })
        .collect();

    SentimentReport {
        overall: breakdown(&output.sentiment, output.total_messages as u64),
        daily_trend,
    }
}

fn keywords_and_topics(output: &AggregateOutput, config: &EngineConfig) -> (Vec<KeywordEntry>, Vec<Topic>) {
    let ranking = output.keywords.top(config.ranking_size);

    let keywords = ranking
        .iter()
        .take(config.report_keywords)
        .map(|stat| KeywordEntry {
            word: stat.keyword.clone(),
            count: stat.count,
            category: KEYWORD_CATEGORY.to_string(),
        })
        .collect();

    let topics = TOPICS
        .iter()
        .map(|&(title, relevance, from, to)| Topic {
            topic: title.to_string(),
            relevance,
            keywords: ranking
                .iter()
                .skip(from)
                .take(to - from)
                .map(|stat| stat.keyword.clone())
                .collect(),
        })
        .collect();

    (keywords, topics)
}

fn activity_patterns(
    output: &AggregateOutput,
    time: &TimeAnalysis,
    date_range: &DateRange,
    now: DateTime<Utc>,
) -> ActivityPatterns {
    let days = match output.time_span {
        Some((lo, hi)) => ((hi - lo) / SECONDS_PER_DAY + 1).max(1),
        None => 1,
    };
    let average = (output.total_messages as f64 / days as f64).round() as u64;

    // BTreeMap iteration is chronological, so strict comparison keeps the earliest
    let mut longest = Conversation {
        date: date_range.start.clone(),
        message_count: 0,
    };
    for (date, &count) in &output.histograms.daily {
        if count > longest.message_count {
            longest = Conversation {
                date: date.format("%Y-%m-%d").to_string(),
                message_count: count,
            };
        }
    }

    let mut busiest: Option<&String> = None;
    let mut busiest_count = 0;
    for (month, &count) in &time.monthly {
        if count > busiest_count {
            busiest = Some(month);
            busiest_count = count;
        }
    }
    let busiest_month = match busiest {
        Some(month) => month.clone(),
        None => now.with_timezone(&output.offset).format("%Y-%m").to_string(),
    };

    ActivityPatterns {
        most_active_hour: time.peak_hour,
        most_active_day: WEEKDAY_NAMES[time.peak_day as usize].to_string(),
        average_messages_per_day: average,
        longest_conversation: longest,
        busiest_month,
    }
}

/// Assemble a report stamped with `now`
pub fn assemble_at(
    output: &AggregateOutput,
    graph: &Graph,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> InsightsReport {
    let basic_stats = basic_stats(output, config, now);
    let time_analysis = time_analysis(output);
    let (keywords, topics) = keywords_and_topics(output, config);
    let activity_patterns = activity_patterns(output, &time_analysis, &basic_stats.date_range, now);

    InsightsReport {
        generated_at: now,
        data_version: DATA_VERSION.to_string(),
        basic_stats,
        sentiment: sentiment(output),
        time_analysis,
        keywords,
        topics,
        activity_patterns,
        network_stats: network_stats(graph),
    }
}

/// Assemble a report stamped with the current time
pub fn assemble(output: &AggregateOutput, graph: &Graph, config: &EngineConfig) -> InsightsReport {
    assemble_at(output, graph, config, Utc::now())
}
