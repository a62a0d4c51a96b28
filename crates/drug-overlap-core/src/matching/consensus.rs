//! Two-of-three consensus vote over the similarity metrics.

use crate::models::SimilarityScores;

use super::MatchConfig;

/// Metrics that must clear their threshold for a pair to be accepted.
pub const REQUIRED_VOTES: usize = 2;

/// Accepts a pair when a majority of the three metrics meet their thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusClassifier {
    jaro_winkler: f64,
    token_set: u8,
    ratio: u8,
}

impl ConsensusClassifier {
    /// Create a classifier with explicit thresholds.
    pub fn new(jaro_winkler: f64, token_set: u8, ratio: u8) -> Self {
        Self {
            jaro_winkler,
            token_set,
            ratio,
        }
    }

    /// Classifier using the metric thresholds of `config`.
    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.jaro_winkler, config.token_set, config.ratio)
    }

    /// Number of metrics meeting or exceeding their threshold (0 - 3).
    pub fn votes(&self, scores: &SimilarityScores) -> usize {
        [
            scores.jaro_winkler >= self.jaro_winkler,
            scores.token_set >= self.token_set,
            scores.ratio >= self.ratio,
        ]
        .into_iter()
        .filter(|passed| *passed)
        .count()
    }

    /// Whether the pair wins the vote.
    pub fn accepts(&self, scores: &SimilarityScores) -> bool {
        self.votes(scores) >= REQUIRED_VOTES
    }
}

impl Default for ConsensusClassifier {
    fn default() -> Self {
        Self::from_config(&MatchConfig::default())
    }
}
