//! `compare` and `batch` command implementations.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use drug_overlap_core::export::{write_matches_csv, InputFingerprint, RunManifest};
use drug_overlap_core::ingest::{load_registry, ColumnMapping, Enricher, RegistryFormat};
use drug_overlap_core::{
    MatchConfig, MatchEngine, MatchStats, Normalizer, Registry, Side, SynonymMap,
};
use tracing::{info, warn};

use crate::cli::{BatchArgs, CompareArgs};
use crate::config::{EnrichmentConfig, RunConfig};

/// Outcome of one left-vs-right run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub label: String,
    pub output: PathBuf,
    pub manifest: PathBuf,
    pub stats: MatchStats,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub runs: Vec<RunReport>,
    /// (variant name, error message)
    pub failures: Vec<(String, String)>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Everything shared by the runs of one invocation.
struct Session {
    normalizer: Normalizer,
    columns: ColumnMapping,
    engine: MatchEngine,
    enricher: Option<Enricher>,
    /// Synonym and enrichment files, fingerprinted into every manifest
    auxiliary_inputs: Vec<InputFingerprint>,
}

impl Session {
    fn new(
        thresholds: MatchConfig,
        id_column: &str,
        synonyms: Option<&Path>,
        enrichment: &EnrichmentConfig,
    ) -> Result<Self> {
        let normalizer = Normalizer::new();
        let columns = ColumnMapping::default().with_identifier_column(id_column);
        let mut auxiliary_inputs = Vec::new();

        let synonym_map = match synonyms {
            Some(path) => {
                let map = SynonymMap::load_csv(path, &normalizer)
                    .with_context(|| format!("failed to load synonyms from {}", path.display()))?;
                auxiliary_inputs.push(InputFingerprint::from_file(
                    "synonyms",
                    path,
                    Some(map.len()),
                )?);
                map
            }
            None => SynonymMap::new(),
        };

        let engine = MatchEngine::new(thresholds)
            .context("invalid thresholds")?
            .with_synonyms(synonym_map);

        let load_source = |role: &str, path: &Option<PathBuf>| -> Result<Option<Registry>> {
            let Some(path) = path else {
                return Ok(None);
            };
            let registry = load_registry(
                path,
                Side::Left,
                RegistryFormat::Standard,
                &columns,
                &normalizer,
            )
            .with_context(|| format!("failed to load {role} source"))?;
            Ok(Some(registry))
        };
        let indications = load_source("indication", &enrichment.indications)?;
        let approval_dates = load_source("approval date", &enrichment.approval_dates)?;

        for (role, path, registry) in [
            ("indication_source", &enrichment.indications, &indications),
            ("approval_source", &enrichment.approval_dates, &approval_dates),
        ] {
            if let (Some(path), Some(registry)) = (path, registry) {
                auxiliary_inputs.push(InputFingerprint::from_file(
                    role,
                    path,
                    Some(registry.len()),
                )?);
            }
        }

        let enricher = (indications.is_some() || approval_dates.is_some())
            .then(|| Enricher::from_sources(indications.as_ref(), approval_dates.as_ref()));

        Ok(Self {
            normalizer,
            columns,
            engine,
            enricher,
            auxiliary_inputs,
        })
    }

    /// Load a registry; names-only registries are enriched when sources exist.
    fn load(&self, path: &Path, side: Side, format: RegistryFormat) -> Result<Registry> {
        let registry = load_registry(path, side, format, &self.columns, &self.normalizer)
            .with_context(|| format!("failed to load {side} registry {}", path.display()))?;

        Ok(match (&self.enricher, format) {
            (Some(enricher), RegistryFormat::NamesOnly) => enricher.enrich_registry(registry),
            _ => registry,
        })
    }

    /// Match, then write the table and its manifest.
    fn compare(
        &self,
        left: (&Registry, &Path),
        right: (&Registry, &Path),
        output: &Path,
        manifest_path: &Path,
    ) -> Result<RunReport> {
        let outcome = self.engine.run(left.0, right.0);

        write_matches_csv(output, &outcome.matches)
            .with_context(|| format!("failed to write {}", output.display()))?;

        let mut manifest = RunManifest::new(*self.engine.config(), outcome.stats.clone())
            .with_input(InputFingerprint::from_file("left", left.1, Some(left.0.len()))?)
            .with_input(InputFingerprint::from_file("right", right.1, Some(right.0.len()))?)
            .with_output(output);
        for input in &self.auxiliary_inputs {
            manifest = manifest.with_input(input.clone());
        }
        manifest
            .write(manifest_path)
            .with_context(|| format!("failed to write {}", manifest_path.display()))?;

        info!(
            output = %output.display(),
            matches = outcome.matches.len(),
            "run complete"
        );

        Ok(RunReport {
            label: left.0.label.clone(),
            output: output.to_path_buf(),
            manifest: manifest_path.to_path_buf(),
            stats: outcome.stats,
        })
    }
}

/// Thresholds from the config file, overridden by explicit flags.
fn effective_thresholds(args: &CompareArgs, base: MatchConfig) -> MatchConfig {
    MatchConfig {
        jaro_winkler: args.jaro.unwrap_or(base.jaro_winkler),
        jaccard: args.jaccard.unwrap_or(base.jaccard),
        token_set: args.token.unwrap_or(base.token_set),
        ratio: args.ratio.unwrap_or(base.ratio),
    }
}

/// Manifest location: the explicit path, else the output with a `.json`
/// extension, else `<stem>.manifest.json` when the output is already `.json`.
fn manifest_path(output: &Path, explicit: Option<&Path>) -> Result<PathBuf> {
    let manifest = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = output.with_extension("json");
            if default == output {
                output.with_extension("manifest.json")
            } else {
                default
            }
        }
    };
    if manifest == output {
        bail!("manifest path {} would overwrite the match table", manifest.display());
    }
    Ok(manifest)
}

pub fn run_compare(args: &CompareArgs) -> Result<RunReport> {
    let config = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    let thresholds = effective_thresholds(args, config.thresholds);
    let id_column = args.id_column.as_deref().unwrap_or(&config.id_column);
    let synonyms = args.synonyms.as_deref().or(config.synonyms.as_deref());
    let enrichment = EnrichmentConfig {
        indications: args.indication_source.clone().or(config.enrichment.indications),
        approval_dates: args.approval_source.clone().or(config.enrichment.approval_dates),
    };

    let session = Session::new(thresholds, id_column, synonyms, &enrichment)?;

    let left = session.load(&args.left, Side::Left, args.left_format.into())?;
    let right = session.load(&args.right, Side::Right, RegistryFormat::Standard)?;

    let manifest = manifest_path(&args.output, args.manifest.as_deref())?;

    session.compare(
        (&left, &args.left),
        (&right, &args.right),
        &args.output,
        &manifest,
    )
}

/// Run every variant against the reference. A failing variant is recorded and
/// the remaining variants still run.
pub fn run_batch(args: &BatchArgs) -> Result<BatchReport> {
    let config = RunConfig::load(&args.config)?;
    config.validate_batch()?;

    let session = Session::new(
        config.thresholds,
        &config.id_column,
        config.synonyms.as_deref(),
        &config.enrichment,
    )?;

    let reference = config
        .reference
        .as_ref()
        .context("batch runs need a [reference] registry")?;
    let right = session.load(&reference.path, Side::Right, reference.format)?;

    let mut report = BatchReport::default();
    for variant in &config.variants {
        let span = tracing::info_span!("variant", name = %variant.name);
        let _guard = span.enter();

        let output = variant.output_path(&config.output_dir);
        let manifest = output.with_extension("json");

        let result = session
            .load(&variant.path, Side::Left, variant.format)
            .and_then(|mut left| {
                left.label = variant.name.clone();
                session.compare(
                    (&left, &variant.path),
                    (&right, &reference.path),
                    &output,
                    &manifest,
                )
            });

        match result {
            Ok(run) => report.runs.push(run),
            Err(error) => {
                warn!(variant = %variant.name, error = %format!("{error:#}"), "variant failed");
                report.failures.push((variant.name.clone(), format!("{error:#}")));
            }
        }
    }

    Ok(report)
}
