//! Token-Jaccard candidate pre-filter.
//!
//! Discards obviously dissimilar pairs before the three metrics run. The
//! right-side token sets are computed once into an immutable [`CandidatePool`]
//! that every query reads concurrently.

use std::collections::HashSet;

use crate::models::DrugRecord;

/// Whitespace tokens of a normalized name.
pub fn tokenize(name: &str) -> HashSet<&str> {
    name.split_whitespace().collect()
}

/// `|a ∩ b| / |a ∪ b|`, 0.0 when either side has no tokens.
pub fn token_jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Right-side records with their precomputed token sets.
pub struct CandidatePool<'a> {
    entries: Vec<PoolEntry<'a>>,
}

struct PoolEntry<'a> {
    record: &'a DrugRecord,
    tokens: HashSet<&'a str>,
}

impl<'a> CandidatePool<'a> {
    /// Tokenize every record's normalized name.
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a DrugRecord>,
    {
        let entries = records
            .into_iter()
            .map(|record| PoolEntry {
                record,
                tokens: tokenize(&record.normalized_name),
            })
            .collect();
        Self { entries }
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Jaccard threshold filter.
#[derive(Debug, Clone, Copy)]
pub struct CandidateFilter {
    threshold: f64,
}

impl CandidateFilter {
    /// Create a filter keeping candidates with Jaccard ≥ `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Candidates whose token overlap with `query` meets the threshold, in pool order.
    pub fn filter<'a>(&self, query: &str, pool: &CandidatePool<'a>) -> Vec<&'a DrugRecord> {
        let query_tokens = tokenize(query);
        pool.entries
            .iter()
            .filter(|entry| token_jaccard(&query_tokens, &entry.tokens) >= self.threshold)
            .map(|entry| entry.record)
            .collect()
    }
}
