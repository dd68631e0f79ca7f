//! Keyword frequency map that remembers first-seen order

use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordStat {
    pub keyword: String,
    pub count: u64,
    /// Earliest message timestamp carrying the keyword
    pub first_seen: i64,
}

/// Keyword -> occurrence count. Iteration follows first-seen order, which is
/// what ranking ties fall back to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFrequency {
    stats: Vec<KeywordStat>,
    index: HashMap<String, usize>,
}

impl KeywordFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence seen at `timestamp`
    pub fn record(&mut self, keyword: &str, timestamp: i64) {
        match self.index.get(keyword) {
            Some(&i) => {
                let stat = &mut self.stats[i];
                stat.count += 1;
                stat.first_seen = stat.first_seen.min(timestamp);
            }
            None => {
                self.index.insert(keyword.to_string(), self.stats.len());
                self.stats.push(KeywordStat {
                    keyword: keyword.to_string(),
                    count: 1,
                    first_seen: timestamp,
                });
            }
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&KeywordStat> {
        self.index.get(keyword).map(|&i| &self.stats[i])
    }

    pub fn count(&self, keyword: &str) -> u64 {
        self.get(keyword).map(|s| s.count).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// First-seen order
    pub fn iter(&self) -> impl Iterator<Item = &KeywordStat> {
        self.stats.iter()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.stats.iter().map(|s| s.count).sum()
    }

    /// Descending by count; the stable sort keeps first-seen order on ties
    pub fn ranked(&self) -> Vec<&KeywordStat> {
        let mut ranked: Vec<&KeywordStat> = self.stats.iter().collect();
        ranked.sort_by_key(|s| std::cmp::Reverse(s.count));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<&KeywordStat> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}
