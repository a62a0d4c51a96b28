//! Fuzzy phase: per left record, synonym substitution → Jaccard filter →
//! three metrics → consensus vote.
//!
//! Left records are independent of each other, so the phase fans out over
//! rayon and collects in left-pool order.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::debug;

use crate::models::{DrugRecord, MatchRecord};
use crate::normalize::SynonymMap;

use super::filter::{CandidateFilter, CandidatePool};
use super::similarity::score_pair;
use super::{ConsensusClassifier, MatchConfig};

/// Drop records with an empty normalized name and keep the first record per
/// normalized name, preserving input order.
pub fn prepare_pool<'a, I>(records: I) -> Vec<&'a DrugRecord>
where
    I: IntoIterator<Item = &'a DrugRecord>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    records
        .into_iter()
        .filter(|record| record.is_fuzzy_eligible())
        .filter(|&record| seen.insert(record.normalized_name.as_str()))
        .collect()
}

/// Scores left records against a right-side candidate pool.
pub struct FuzzyMatcher<'s> {
    filter: CandidateFilter,
    classifier: ConsensusClassifier,
    synonyms: &'s SynonymMap,
}

impl<'s> FuzzyMatcher<'s> {
    /// Create a matcher from validated thresholds.
    pub fn new(config: &MatchConfig, synonyms: &'s SynonymMap) -> Self {
        Self {
            filter: CandidateFilter::new(config.jaccard),
            classifier: ConsensusClassifier::from_config(config),
            synonyms,
        }
    }

    /// Every accepted candidate for one left record, in pool order.
    ///
    /// A left record may accept several right records; the resolver picks one.
    pub fn match_record(&self, query: &DrugRecord, pool: &CandidatePool<'_>) -> Vec<MatchRecord> {
        let query_name = self.synonyms.resolve(&query.normalized_name);

        let candidates = self.filter.filter(query_name, pool);
        if candidates.is_empty() {
            return Vec::new();
        }

        let accepted: Vec<MatchRecord> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let scores = score_pair(query_name, &candidate.normalized_name);
                self.classifier
                    .accepts(&scores)
                    .then(|| MatchRecord::fuzzy(query, candidate, scores))
            })
            .collect();

        debug!(
            query = %query.name,
            accepted = accepted.len(),
            "scored fuzzy candidates"
        );
        accepted
    }

    /// Match every left record in parallel; output follows left-pool order.
    pub fn match_all(
        &self,
        left_pool: &[&DrugRecord],
        pool: &CandidatePool<'_>,
    ) -> Vec<MatchRecord> {
        left_pool
            .par_iter()
            .map(|query| self.match_record(query, pool))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}
