//! Synonym map applied to query names before fuzzy comparison.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use super::{Normalizer, SynonymResult};

/// Normalized alias → normalized canonical name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynonymMap {
    entries: HashMap<String, String>,
}

impl SynonymMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-normalized pairs.
    pub fn from_pairs<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(a, c)| (a.into(), c.into()))
                .collect(),
        }
    }

    /// Load a two-column `alias,canonical` CSV (header row required).
    ///
    /// Both columns are normalized on load; rows with a blank side are skipped.
    pub fn load_csv<P: AsRef<Path>>(path: P, normalizer: &Normalizer) -> SynonymResult<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut map = Self::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let alias = normalizer.normalize(record.get(0).unwrap_or_default());
            let canonical = normalizer.normalize(record.get(1).unwrap_or_default());

            if alias.is_empty() || canonical.is_empty() {
                warn!(
                    path = %path.display(),
                    row = row + 2,
                    "skipping synonym row with a blank side"
                );
                continue;
            }
            map.insert(alias, canonical);
        }

        info!(path = %path.display(), synonyms = map.len(), "loaded synonym map");
        Ok(map)
    }

    /// Add or replace a mapping.
    pub fn insert(&mut self, alias: String, canonical: String) {
        self.entries.insert(alias, canonical);
    }

    /// Canonical name for `name`, or `name` itself when unmapped.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Number of mappings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_mapped_and_unmapped() {
        let map = SynonymMap::from_pairs([("asa", "acetylsalicylic acid")]);

        assert_eq!(map.resolve("asa"), "acetylsalicylic acid");
        assert_eq!(map.resolve("ibuprofen"), "ibuprofen");
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_empty_map_is_identity() {
        let map = SynonymMap::new();
        assert!(map.is_empty());
        assert_eq!(map.resolve("paracetamol"), "paracetamol");
    }

    #[test]
    fn test_load_csv_normalizes_and_skips_blank_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alias,canonical").unwrap();
        writeln!(file, "Tylenol Tablets,Paracetamol").unwrap();
        writeln!(file, "ASA,Acetylsalicylic-Acid").unwrap();
        writeln!(file, ",Orphan").unwrap();
        file.flush().unwrap();

        let map = SynonymMap::load_csv(file.path(), &Normalizer::new()).unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map.resolve("tylenol"), "paracetamol");
        assert_eq!(map.resolve("asa"), "acetylsalicylic acid");
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let result = SynonymMap::load_csv("/nonexistent/synonyms.csv", &Normalizer::new());
        assert!(result.is_err());
    }
}
