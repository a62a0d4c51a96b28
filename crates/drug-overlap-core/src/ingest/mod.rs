//! Registry ingestion from CSV files.

mod columns;
mod enrichment;

pub use columns::*;
pub use enrichment::*;

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{DrugRecord, Registry, Side};
use crate::normalize::Normalizer;

/// Ingestion errors.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: String },
}

pub type IngestResult<T> = Result<T, IngestError>;

/// On-disk layout of a registry file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryFormat {
    /// CSV with a header row
    #[default]
    Standard,
    /// Headerless, one drug name per line
    NamesOnly,
}

/// Load one registry file, normalizing every name.
pub fn load_registry(
    path: impl AsRef<Path>,
    side: Side,
    format: RegistryFormat,
    columns: &ColumnMapping,
    normalizer: &Normalizer,
) -> IngestResult<Registry> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let (has_identifier, records) = match format {
        RegistryFormat::Standard => read_standard(path, file, side, columns, normalizer)?,
        RegistryFormat::NamesOnly => (false, read_names_only(path, file, side, normalizer)?),
    };

    info!(
        path = %path.display(),
        side = %side,
        records = records.len(),
        has_identifier,
        "loaded registry"
    );
    Ok(Registry::new(label, side, has_identifier, records))
}

fn read_standard(
    path: &Path,
    file: File,
    side: Side,
    columns: &ColumnMapping,
    normalizer: &Normalizer,
) -> IngestResult<(bool, Vec<DrugRecord>)> {
    let csv_err = |source| IngestError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let idx = columns.locate(reader.headers().map_err(csv_err)?);
    let name_idx = idx.name.ok_or_else(|| IngestError::MissingColumn {
        path: path.to_path_buf(),
        column: columns.name_column().to_string(),
    })?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        let name = cell(&row, Some(name_idx)).unwrap_or_default();

        let mut record = DrugRecord::new(side, name.to_string())
            .with_normalized_name(normalizer.normalize(name));
        record.identifier = cell(&row, idx.identifier).map(str::to_string);
        record.approval_date = cell(&row, idx.approval_date).map(str::to_string);
        record.indication = cell(&row, idx.indication).map(str::to_string);
        records.push(record);
    }

    Ok((idx.identifier.is_some(), records))
}

fn read_names_only(
    path: &Path,
    file: File,
    side: Side,
    normalizer: &Normalizer,
) -> IngestResult<Vec<DrugRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    reader
        .records()
        .map(|row| {
            let row = row.map_err(|source| IngestError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            // The whole line is the name; commas belong to combination products
            let line = row.iter().collect::<Vec<_>>().join(",");
            let name = line.trim();
            Ok(DrugRecord::new(side, name.to_string())
                .with_normalized_name(normalizer.normalize(name)))
        })
        .collect()
}

/// Trimmed cell value; blank cells read as `None`.
fn cell(row: &StringRecord, idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn load(file: &NamedTempFile, format: RegistryFormat) -> IngestResult<Registry> {
        load_registry(
            file.path(),
            Side::Left,
            format,
            &ColumnMapping::default(),
            &Normalizer::new(),
        )
    }

    #[test]
    fn test_load_standard() {
        let file = csv_file(
            "Sr.No,Drug Name,RxCUI,Indication,Date of Approval\n\
             1,Aspirin Tablets USP,1191,Pain, 2001-02-03 \n\
             2,Ibuprofen,,,\n",
        );

        let registry = load(&file, RegistryFormat::Standard).unwrap();

        assert!(registry.has_identifier);
        assert_eq!(registry.len(), 2);
        let aspirin = &registry.records[0];
        assert_eq!(aspirin.name, "Aspirin Tablets USP");
        assert_eq!(aspirin.normalized_name, "aspirin");
        assert_eq!(aspirin.identifier.as_deref(), Some("1191"));
        assert_eq!(aspirin.approval_date.as_deref(), Some("2001-02-03"));
        assert_eq!(aspirin.indication.as_deref(), Some("Pain"));
        assert!(registry.records[1].identifier.is_none());
        assert!(registry.records[1].indication.is_none());
    }

    #[test]
    fn test_reference_schema_has_no_identifier() {
        let file = csv_file(
            "Generic Name,Date Designated,Orphan Designation\nImatinib,2001-01-01,CML\n",
        );

        let registry = load(&file, RegistryFormat::Standard).unwrap();

        assert!(!registry.has_identifier);
        assert_eq!(registry.records[0].name, "Imatinib");
        assert_eq!(registry.records[0].indication.as_deref(), Some("CML"));
    }

    #[test]
    fn test_missing_name_column() {
        let file = csv_file("Product,RxCUI\nAspirin,1\n");

        let err = load(&file, RegistryFormat::Standard).unwrap_err();
        assert!(
            matches!(err, IngestError::MissingColumn { ref column, .. } if column == "Drug Name")
        );
    }

    #[test]
    fn test_blank_names_are_kept() {
        let file = csv_file("Drug Name\n\"  \"\nAspirin\n");

        let registry = load(&file, RegistryFormat::Standard).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(!registry.records[0].is_fuzzy_eligible());
    }

    #[test]
    fn test_load_names_only() {
        let file = csv_file(
            "Aspirin\nParacetamol Tablets\nAmoxicillin, Clavulanate Potassium Tablets\n",
        );

        let registry = load(&file, RegistryFormat::NamesOnly).unwrap();

        assert!(!registry.has_identifier);
        let names: Vec<&str> = registry
            .records
            .iter()
            .map(|r| r.normalized_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["aspirin", "paracetamol", "amoxicillin clavulanate potassium"]
        );
        assert_eq!(
            registry.records[2].name,
            "Amoxicillin, Clavulanate Potassium Tablets"
        );
        assert!(registry.records[0].approval_date.is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = load_registry(
            "/nonexistent/registry.csv",
            Side::Right,
            RegistryFormat::Standard,
            &ColumnMapping::default(),
            &Normalizer::new(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[test]
    fn test_label_is_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cdsco_clean.csv");
        std::fs::write(&path, "Drug Name\nAspirin\n").unwrap();

        let registry = load_registry(
            &path,
            Side::Left,
            RegistryFormat::Standard,
            &ColumnMapping::default(),
            &Normalizer::new(),
        )
        .unwrap();
        assert_eq!(registry.label, "cdsco_clean");
    }
}
