//! Metadata enrichment for names-only registries.
//!
//! A names-only registry carries no indication or approval date. Both are
//! borrowed from auxiliary registries by normalized name, with a fuzzy
//! fallback restricted to substring-related names.

use std::collections::HashMap;

use tracing::info;

use crate::matching::jaro_winkler_similarity;
use crate::models::{DrugRecord, Registry};

/// Minimum Jaro-Winkler score for a fuzzy metadata lookup.
pub const DEFAULT_LOOKUP_THRESHOLD: f64 = 0.8;

/// Normalized name → metadata value, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MetadataLookup {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl MetadataLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from records that carry the field picked by `field`.
    pub fn from_records<'a, I, F>(records: I, field: F) -> Self
    where
        I: IntoIterator<Item = &'a DrugRecord>,
        F: Fn(&DrugRecord) -> Option<&str>,
    {
        let mut lookup = Self::new();
        for record in records {
            if let Some(value) = field(record) {
                lookup.insert(record.normalized_name.clone(), value.to_string());
            }
        }
        lookup
    }

    /// Insert a value. A repeated key keeps its first position but takes the
    /// latest value; blank keys are ignored.
    pub fn insert(&mut self, key: String, value: String) {
        if key.is_empty() {
            return;
        }
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value for `name`: exact key first, otherwise the substring-related key
    /// with the strictly highest Jaro-Winkler score at or above `threshold`.
    pub fn find_best_match(&self, name: &str, threshold: f64) -> Option<&str> {
        if let Some(&pos) = self.index.get(name) {
            return Some(self.entries[pos].1.as_str());
        }

        let mut best: Option<(f64, &str)> = None;
        for (key, value) in &self.entries {
            if !(key.contains(name) || name.contains(key.as_str())) {
                continue;
            }
            let score = jaro_winkler_similarity(name, key);
            let beats = best.map_or(true, |(best_score, _)| score > best_score);
            if score >= threshold && beats {
                best = Some((score, value.as_str()));
            }
        }
        best.map(|(_, value)| value)
    }
}

/// Fills missing indications and approval dates from auxiliary registries.
#[derive(Debug, Clone)]
pub struct Enricher {
    pub indications: MetadataLookup,
    pub approval_dates: MetadataLookup,
    pub threshold: f64,
}

impl Enricher {
    pub fn new(indications: MetadataLookup, approval_dates: MetadataLookup) -> Self {
        Self {
            indications,
            approval_dates,
            threshold: DEFAULT_LOOKUP_THRESHOLD,
        }
    }

    /// Override the fuzzy lookup threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Build lookups from an indication source and an approval-date source.
    pub fn from_sources(
        indication_source: Option<&Registry>,
        approval_source: Option<&Registry>,
    ) -> Self {
        let indications = indication_source
            .map(|r| MetadataLookup::from_records(&r.records, |rec| rec.indication.as_deref()))
            .unwrap_or_default();
        let approval_dates = approval_source
            .map(|r| MetadataLookup::from_records(&r.records, |rec| rec.approval_date.as_deref()))
            .unwrap_or_default();
        Self::new(indications, approval_dates)
    }

    /// Fill missing metadata. Present values are never overwritten.
    pub fn enrich(&self, records: Vec<DrugRecord>) -> Vec<DrugRecord> {
        records
            .into_iter()
            .map(|mut record| {
                if record.indication.is_none() {
                    record.indication = self
                        .indications
                        .find_best_match(&record.normalized_name, self.threshold)
                        .map(str::to_string);
                }
                if record.approval_date.is_none() {
                    record.approval_date = self
                        .approval_dates
                        .find_best_match(&record.normalized_name, self.threshold)
                        .map(str::to_string);
                }
                record
            })
            .collect()
    }

    /// Enrich every record of a registry in place.
    pub fn enrich_registry(&self, mut registry: Registry) -> Registry {
        let records = std::mem::take(&mut registry.records);
        registry.records = self.enrich(records);

        let indications = registry.records.iter().filter(|r| r.indication.is_some()).count();
        let dates = registry.records.iter().filter(|r| r.approval_date.is_some()).count();
        info!(
            registry = %registry.label,
            records = registry.len(),
            indications,
            approval_dates = dates,
            "enriched registry"
        );
        registry
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new(MetadataLookup::new(), MetadataLookup::new())
    }
}
