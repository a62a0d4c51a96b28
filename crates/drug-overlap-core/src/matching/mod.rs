//! Two-phase record linkage between a left and a right registry.
//!
//! Pipeline: Identifier join → pool preparation → fuzzy phase → Resolver

mod consensus;
mod filter;
mod fuzzy;
mod identifier;
mod resolver;
mod similarity;

pub use consensus::*;
pub use filter::*;
pub use fuzzy::*;
pub use identifier::*;
pub use resolver::*;
pub use similarity::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{DrugRecord, MatchRecord, Registry};
use crate::normalize::SynonymMap;

/// Default Jaro-Winkler threshold.
pub const DEFAULT_JARO_WINKLER_THRESHOLD: f64 = 0.72;

/// Default token-Jaccard pre-filter threshold.
pub const DEFAULT_JACCARD_THRESHOLD: f64 = 0.10;

/// Default token-set ratio threshold.
pub const DEFAULT_TOKEN_SET_THRESHOLD: u8 = 82;

/// Default edit-distance ratio threshold.
pub const DEFAULT_RATIO_THRESHOLD: u8 = 82;

/// Matching errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("threshold `{name}` = {value} is outside [{min}, {max}]")]
    ThresholdOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type MatchResult<T> = Result<T, MatchError>;

/// Thresholds for one matching run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Jaro-Winkler vote threshold (0.0 - 1.0)
    pub jaro_winkler: f64,
    /// Token-Jaccard pre-filter threshold (0.0 - 1.0)
    pub jaccard: f64,
    /// Token-set ratio vote threshold (0 - 100)
    pub token_set: u8,
    /// Edit-distance ratio vote threshold (0 - 100)
    pub ratio: u8,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            jaro_winkler: DEFAULT_JARO_WINKLER_THRESHOLD,
            jaccard: DEFAULT_JACCARD_THRESHOLD,
            token_set: DEFAULT_TOKEN_SET_THRESHOLD,
            ratio: DEFAULT_RATIO_THRESHOLD,
        }
    }
}

impl MatchConfig {
    /// Reject thresholds outside their metric's range.
    pub fn validate(&self) -> MatchResult<()> {
        check_range("jaro_winkler", self.jaro_winkler, 0.0, 1.0)?;
        check_range("jaccard", self.jaccard, 0.0, 1.0)?;
        check_range("token_set", f64::from(self.token_set), 0.0, 100.0)?;
        check_range("ratio", f64::from(self.ratio), 0.0, 100.0)?;
        Ok(())
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> MatchResult<()> {
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(MatchError::ThresholdOutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Counts describing one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub left_records: usize,
    pub right_records: usize,
    /// Pairs joined on identifier
    pub identifier_matches: usize,
    /// Left records entering the fuzzy phase after dedup
    pub left_pool: usize,
    /// Right candidates after dedup
    pub right_pool: usize,
    /// Pairs accepted by the consensus vote
    pub fuzzy_matches: usize,
    /// Matches kept by the resolver
    pub resolved: usize,
    /// Candidates dropped by the resolver
    pub discarded: usize,
}

/// Final 1:1 matches plus run statistics.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matches: Vec<MatchRecord>,
    pub stats: MatchStats,
}

/// Orchestrates identifier matching, fuzzy matching and resolution.
pub struct MatchEngine {
    config: MatchConfig,
    synonyms: SynonymMap,
}

impl MatchEngine {
    /// Create an engine, validating thresholds before any work is done.
    pub fn new(config: MatchConfig) -> MatchResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            synonyms: SynonymMap::new(),
        })
    }

    /// Use a synonym map for query names.
    pub fn with_synonyms(mut self, synonyms: SynonymMap) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Thresholds in use.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Synonym map in use.
    pub fn synonyms(&self) -> &SynonymMap {
        &self.synonyms
    }

    /// Fuzzy phase over prepared pools: every accepted pair, before resolution.
    pub fn fuzzy_matches(
        &self,
        left_pool: &[&DrugRecord],
        right_pool: &[&DrugRecord],
    ) -> Vec<MatchRecord> {
        let candidates = CandidatePool::new(right_pool.iter().copied());
        FuzzyMatcher::new(&self.config, &self.synonyms).match_all(left_pool, &candidates)
    }

    /// Run the full pipeline on two registries.
    pub fn run(&self, left: &Registry, right: &Registry) -> MatchOutcome {
        let span = tracing::info_span!("match_run", left = %left.label, right = %right.label);
        let _guard = span.enter();

        info!(
            left = left.len(),
            right = right.len(),
            "comparing registries"
        );

        let IdentifierOutcome { matches, remainder } = match_identifiers(left, right);
        let identifier_matches = matches.len();
        info!(identifier_matches, "identifier phase complete");

        let left_pool = prepare_pool(remainder);
        let right_pool = prepare_pool(&right.records);
        info!(
            left_pool = left_pool.len(),
            right_pool = right_pool.len(),
            "fuzzy matching"
        );

        let fuzzy = self.fuzzy_matches(&left_pool, &right_pool);
        let fuzzy_matches = fuzzy.len();
        info!(fuzzy_matches, "fuzzy phase complete");

        let mut candidates = matches;
        candidates.extend(fuzzy);
        let total = candidates.len();

        let resolved = resolve_one_to_one(candidates);
        info!(resolved = resolved.len(), discarded = total - resolved.len(), "resolved matches");

        let stats = MatchStats {
            left_records: left.len(),
            right_records: right.len(),
            identifier_matches,
            left_pool: left_pool.len(),
            right_pool: right_pool.len(),
            fuzzy_matches,
            resolved: resolved.len(),
            discarded: total - resolved.len(),
        };

        MatchOutcome {
            matches: resolved,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MatchType, Side};
    use crate::normalize::Normalizer;

    fn registry(side: Side, names: &[(&str, Option<&str>)]) -> Registry {
        let normalizer = Normalizer::new();
        let records = names
            .iter()
            .map(|(name, id)| {
                let record = DrugRecord::new(side, name.to_string())
                    .with_normalized_name(normalizer.normalize(name));
                match id {
                    Some(id) => record.with_identifier(id.to_string()),
                    None => record,
                }
            })
            .collect();
        Registry::new(side.to_string(), side, true, records)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(MatchConfig::default().validate().is_ok());
        assert!(MatchEngine::new(MatchConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let bad = [
            MatchConfig {
                jaro_winkler: 1.5,
                ..Default::default()
            },
            MatchConfig {
                jaro_winkler: -0.1,
                ..Default::default()
            },
            MatchConfig {
                jaccard: f64::NAN,
                ..Default::default()
            },
            MatchConfig {
                token_set: 101,
                ..Default::default()
            },
            MatchConfig {
                ratio: 200,
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(MatchEngine::new(config).is_err(), "{config:?}");
        }
    }

    #[test]
    fn test_error_names_threshold() {
        let err = MatchConfig {
            jaccard: 2.0,
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "threshold `jaccard` = 2 is outside [0, 1]");
    }

    #[test]
    fn test_config_deserializes_partial() {
        let config: MatchConfig = serde_json::from_str(r#"{"jaro_winkler": 0.8}"#).unwrap();
        assert_eq!(config.jaro_winkler, 0.8);
        assert_eq!(config.token_set, DEFAULT_TOKEN_SET_THRESHOLD);
    }

    #[test]
    fn test_run_combines_phases() {
        let left = registry(
            Side::Left,
            &[
                ("Aspirin", Some("R1")),
                ("Acetylsalicylic Acid", None),
                ("Ibuprofen", None),
            ],
        );
        let right = registry(
            Side::Right,
            &[
                ("ASPIRIN", Some("R1")),
                ("Acetyl Salicylic Acid", None),
                ("Paracetamol", None),
            ],
        );

        let engine = MatchEngine::new(MatchConfig::default()).unwrap();
        let outcome = engine.run(&left, &right);

        assert_eq!(outcome.stats.identifier_matches, 1);
        assert_eq!(outcome.stats.left_pool, 2);
        assert_eq!(outcome.stats.right_pool, 3);
        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[0].match_type, MatchType::Identifier);
        assert_eq!(outcome.matches[1].match_type, MatchType::Fuzzy);
        assert_eq!(outcome.matches[1].left_name, "Acetylsalicylic Acid");
        assert_eq!(
            outcome.stats.resolved + outcome.stats.discarded,
            outcome.stats.identifier_matches + outcome.stats.fuzzy_matches
        );
    }

    #[test]
    fn test_run_applies_synonyms() {
        let left = registry(Side::Left, &[("Tylenol", None)]);
        let right = registry(Side::Right, &[("Paracetamol", None)]);

        let engine = MatchEngine::new(MatchConfig::default()).unwrap();
        assert!(engine.run(&left, &right).matches.is_empty());

        let engine = engine.with_synonyms(SynonymMap::from_pairs([("tylenol", "paracetamol")]));
        let outcome = engine.run(&left, &right);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].left_name, "Tylenol");
        assert_eq!(outcome.matches[0].right_name, "Paracetamol");
    }
}
