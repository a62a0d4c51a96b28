//! TOML run configuration shared by `compare --config` and `batch`.
//!
//! ```toml
//! id_column = "RxCUI"
//! output_dir = "out"
//! synonyms = "synonyms.csv"
//!
//! [thresholds]
//! jaro_winkler = 0.75
//!
//! [enrichment]
//! indications = "unclean_cdsco.csv"
//! approval_dates = "vikram_cdsco_clean.csv"
//!
//! [reference]
//! path = "orphan_drugs.csv"
//!
//! [[variants]]
//! name = "cdsco_clean"
//! path = "cdsco_clean.csv"
//!
//! [[variants]]
//! name = "cdsco_clean_names_only"
//! path = "cdsco_clean_names_only.csv"
//! format = "names-only"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use drug_overlap_core::ingest::RegistryFormat;
use drug_overlap_core::MatchConfig;
use serde::Deserialize;
use thiserror::Error;

/// Identifier header used when none is configured.
pub const DEFAULT_ID_COLUMN: &str = "RxCUI";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub thresholds: MatchConfig,
    #[serde(default)]
    pub synonyms: Option<PathBuf>,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub reference: Option<RegistrySource>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

fn default_id_column() -> String {
    DEFAULT_ID_COLUMN.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            thresholds: MatchConfig::default(),
            synonyms: None,
            enrichment: EnrichmentConfig::default(),
            id_column: default_id_column(),
            output_dir: default_output_dir(),
            reference: None,
            variants: Vec::new(),
        }
    }
}

/// Auxiliary registries used to fill a names-only left side.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentConfig {
    pub indications: Option<PathBuf>,
    pub approval_dates: Option<PathBuf>,
}

/// A registry file plus its layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySource {
    pub path: PathBuf,
    #[serde(default)]
    pub format: RegistryFormat,
}

/// One left-side registry of a batch run.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub format: RegistryFormat,
}

impl Variant {
    /// `overlap_<name>.csv` inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join(format!("overlap_{}.csv", self.name))
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn from_toml(input: &str) -> ConfigResult<Self> {
        let config: RunConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file, resolving relative paths
    /// against its directory.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&input)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_paths(base))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.thresholds
            .validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if self.id_column.trim().is_empty() {
            return Err(ConfigError::Validation("id_column must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for variant in &self.variants {
            let name = variant.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Validation("variant name must not be empty".into()));
            }
            if name.contains(|c: char| c == '/' || c == '\\') {
                return Err(ConfigError::Validation(format!(
                    "variant '{name}': name must not contain path separators"
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Validation(format!(
                    "duplicate variant name '{name}'"
                )));
            }
        }
        Ok(())
    }

    /// Extra checks for a batch run: a reference registry and at least one variant.
    pub fn validate_batch(&self) -> ConfigResult<()> {
        if self.reference.is_none() {
            return Err(ConfigError::Validation(
                "batch runs need a [reference] registry".into(),
            ));
        }
        if self.variants.is_empty() {
            return Err(ConfigError::Validation(
                "batch runs need at least one [[variants]] entry".into(),
            ));
        }
        Ok(())
    }

    fn resolve_paths(mut self, base: &Path) -> Self {
        let join = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };

        if let Some(p) = self.synonyms.as_mut() {
            join(p);
        }
        if let Some(p) = self.enrichment.indications.as_mut() {
            join(p);
        }
        if let Some(p) = self.enrichment.approval_dates.as_mut() {
            join(p);
        }
        if let Some(reference) = self.reference.as_mut() {
            join(&mut reference.path);
        }
        for variant in &mut self.variants {
            join(&mut variant.path);
        }
        join(&mut self.output_dir);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RunConfig::from_toml("").unwrap();

        assert_eq!(config.thresholds, MatchConfig::default());
        assert_eq!(config.id_column, "RxCUI");
        assert!(config.variants.is_empty());
    }

    #[test]
    fn test_partial_thresholds() {
        let config =
            RunConfig::from_toml("[thresholds]\njaro_winkler = 0.8\nratio = 90\n").unwrap();

        assert_eq!(config.thresholds.jaro_winkler, 0.8);
        assert_eq!(config.thresholds.ratio, 90);
        assert_eq!(config.thresholds.token_set, 82);
        assert_eq!(config.thresholds.jaccard, 0.10);
    }

    #[test]
    fn test_full_batch_config() {
        let input = r#"
            output_dir = "out"

            [reference]
            path = "orphan.csv"

            [[variants]]
            name = "clean"
            path = "clean.csv"

            [[variants]]
            name = "names"
            path = "names.csv"
            format = "names-only"
        "#;

        let config = RunConfig::from_toml(input).unwrap();
        config.validate_batch().unwrap();

        assert_eq!(config.variants.len(), 2);
        assert_eq!(config.variants[1].format, RegistryFormat::NamesOnly);
        assert_eq!(
            config.variants[0].output_path(Path::new("out")),
            PathBuf::from("out/overlap_clean.csv")
        );
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        let err = RunConfig::from_toml("[thresholds]\njaccard = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_duplicate_variant_names_rejected() {
        let input = r#"
            [[variants]]
            name = "a"
            path = "a.csv"

            [[variants]]
            name = "a"
            path = "b.csv"
        "#;
        let err = RunConfig::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("duplicate variant name 'a'"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RunConfig::from_toml("treshold = 1\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_batch_needs_reference_and_variants() {
        let config = RunConfig::from_toml("").unwrap();
        assert!(config.validate_batch().is_err());
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            "synonyms = \"syn.csv\"\n[reference]\npath = \"/abs/orphan.csv\"\n",
        )
        .unwrap();

        let config = RunConfig::load(&path).unwrap();

        assert_eq!(config.synonyms, Some(dir.path().join("syn.csv")));
        assert_eq!(config.reference.unwrap().path, PathBuf::from("/abs/orphan.csv"));
        assert_eq!(config.output_dir, dir.path().join("."));
    }
}
