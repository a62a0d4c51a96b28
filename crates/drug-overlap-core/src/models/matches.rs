//! Match models produced by the engine.

use serde::{Deserialize, Serialize};

use super::DrugRecord;

/// How a pairing was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    /// Exact shared external identifier, treated as ground truth
    Identifier,
    /// Two-of-three similarity consensus
    Fuzzy,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier => write!(f, "IDENTIFIER"),
            Self::Fuzzy => write!(f, "FUZZY"),
        }
    }
}

/// The three similarity scores computed for a candidate pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SimilarityScores {
    /// Jaro-Winkler similarity (0.0 - 1.0)
    pub jaro_winkler: f64,
    /// Token-set ratio (0 - 100)
    pub token_set: u8,
    /// Edit-distance ratio (0 - 100)
    pub ratio: u8,
}

impl SimilarityScores {
    /// Scores assigned to identifier matches.
    pub fn perfect() -> Self {
        Self {
            jaro_winkler: 1.0,
            token_set: 100,
            ratio: 100,
        }
    }
}

/// One row of the match table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    /// Display name of the left record
    pub left_name: String,
    /// Display name of the right record
    pub right_name: String,
    /// Similarity scores (perfect for identifier matches)
    pub scores: SimilarityScores,
    /// How the pair was established
    pub match_type: MatchType,
    pub left_approval_date: Option<String>,
    pub right_approval_date: Option<String>,
    pub left_indication: Option<String>,
    pub right_indication: Option<String>,
}

impl MatchRecord {
    /// Build a match between two records, carrying their metadata through.
    pub fn new(
        left: &DrugRecord,
        right: &DrugRecord,
        scores: SimilarityScores,
        match_type: MatchType,
    ) -> Self {
        Self {
            left_name: left.name.clone(),
            right_name: right.name.clone(),
            scores,
            match_type,
            left_approval_date: left.approval_date.clone(),
            right_approval_date: right.approval_date.clone(),
            left_indication: left.indication.clone(),
            right_indication: right.indication.clone(),
        }
    }

    /// Identifier match with perfect scores.
    pub fn identifier(left: &DrugRecord, right: &DrugRecord) -> Self {
        Self::new(left, right, SimilarityScores::perfect(), MatchType::Identifier)
    }

    /// Fuzzy match carrying the raw scores.
    pub fn fuzzy(left: &DrugRecord, right: &DrugRecord, scores: SimilarityScores) -> Self {
        Self::new(left, right, scores, MatchType::Fuzzy)
    }

    /// Score the resolver ranks by.
    pub fn similarity(&self) -> f64 {
        self.scores.jaro_winkler
    }
}
