//! The three complementary similarity metrics.
//!
//! - Jaro-Winkler (0.0 - 1.0): strict about prefix alignment
//! - Token-set ratio (0 - 100): tolerates reordering and extra qualifiers
//! - Edit-distance ratio (0 - 100): strict about character-level form
//!
//! Empty input scores zero on every metric so a malformed record can never
//! win a vote.

use std::collections::BTreeSet;

use rapidfuzz::fuzz;
use strsim::jaro_winkler;

use crate::models::SimilarityScores;

/// Compute all three scores for a pair of normalized names.
pub fn score_pair(a: &str, b: &str) -> SimilarityScores {
    SimilarityScores {
        jaro_winkler: jaro_winkler_similarity(a, b),
        token_set: token_set_ratio(a, b),
        ratio: ratio(a, b),
    }
}

/// Jaro-Winkler similarity, 0.0 for empty input.
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    jaro_winkler(a, b)
}

/// Normalized Indel similarity scaled to 0-100.
pub fn ratio(a: &str, b: &str) -> u8 {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    to_percent(indel_similarity(a, b))
}

/// Token-set ratio scaled to 0-100.
///
/// Compares the sorted token intersection against each side's intersection
/// plus remainder, so "aspirin tablet" vs "aspirin 100mg tablet" scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();

    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0;
    }

    let sect: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side is a subset of the other
    if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100;
    }

    let sect_joined = sect.join(" ");
    let combined_ab = join_parts(&sect_joined, &diff_ab.join(" "));
    let combined_ba = join_parts(&sect_joined, &diff_ba.join(" "));

    let mut best = indel_similarity(&combined_ab, &combined_ba);
    if !sect_joined.is_empty() {
        best = best
            .max(indel_similarity(&sect_joined, &combined_ab))
            .max(indel_similarity(&sect_joined, &combined_ba));
    }

    to_percent(best)
}

fn indel_similarity(a: &str, b: &str) -> f64 {
    fuzz::ratio(a.chars(), b.chars())
}

fn join_parts(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Round to a whole percentage. Consensus votes compare this rounded value,
/// so a raw 81.6 meets a threshold of 82.
fn to_percent(similarity: f64) -> u8 {
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}
