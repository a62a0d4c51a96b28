//! Greedy 1:1 resolution of the candidate match list.
//!
//! Sort by similarity (stable, so earlier candidates win ties), keep the
//! first match per left name, then the first match per right name. This is a
//! greedy approximation, not a maximum-weight bipartite matching: a pair can
//! lose its right name in the second pass after surviving the first.

use std::collections::HashSet;

use crate::models::MatchRecord;

/// Reduce candidate matches to a strict one-to-one mapping.
pub fn resolve_one_to_one(mut matches: Vec<MatchRecord>) -> Vec<MatchRecord> {
    matches.sort_by(|a, b| b.similarity().total_cmp(&a.similarity()));

    let by_left = keep_first_by(matches, |m| m.left_name.as_str());
    keep_first_by(by_left, |m| m.right_name.as_str())
}

/// Keep the first record for each key, preserving order.
fn keep_first_by<F>(matches: Vec<MatchRecord>, key: F) -> Vec<MatchRecord>
where
    F: Fn(&MatchRecord) -> &str,
{
    let mut claimed: HashSet<String> = HashSet::new();
    matches
        .into_iter()
        .filter(|m| claimed.insert(key(m).to_string()))
        .collect()
}
