//! Run manifest: a JSON provenance record written next to the match table.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{ensure_parent, ExportResult};
use crate::matching::{MatchConfig, MatchStats};

/// Manifest format version.
pub const MANIFEST_VERSION: &str = "1";

/// Hash algorithm used for input fingerprints.
pub const HASH_ALGORITHM: &str = "SHA-256";

/// One input file of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFingerprint {
    /// Role of the input ("left", "right", "synonyms", ...)
    pub role: String,
    pub path: PathBuf,
    /// Hex-encoded digest of the file contents
    pub sha256: String,
    /// Records loaded from the file, when it is a registry
    pub records: Option<usize>,
}

impl InputFingerprint {
    /// Fingerprint a file on disk.
    pub fn from_file(
        role: impl Into<String>,
        path: impl AsRef<Path>,
        records: Option<usize>,
    ) -> ExportResult<Self> {
        let path = path.as_ref();
        Ok(Self {
            role: role.into(),
            path: path.to_path_buf(),
            sha256: fingerprint_file(path)?,
            records,
        })
    }
}

/// Provenance for one matching run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub format_version: String,
    pub run_id: Uuid,
    /// RFC 3339 timestamp
    pub generated_at: String,
    pub engine_version: String,
    pub hash_algorithm: String,
    pub thresholds: MatchConfig,
    pub inputs: Vec<InputFingerprint>,
    pub stats: MatchStats,
    /// Match table this manifest describes
    pub output: Option<PathBuf>,
}

impl RunManifest {
    /// New manifest stamped with a fresh run id and the current time.
    pub fn new(thresholds: MatchConfig, stats: MatchStats) -> Self {
        Self {
            format_version: MANIFEST_VERSION.to_string(),
            run_id: Uuid::new_v4(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            hash_algorithm: HASH_ALGORITHM.to_string(),
            thresholds,
            inputs: Vec::new(),
            stats,
            output: None,
        }
    }

    pub fn with_input(mut self, input: InputFingerprint) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON to `path`, creating parent directories.
    pub fn write(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let path = path.as_ref();
        ensure_parent(path)?;
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Hex SHA-256 of a file's contents.
pub fn fingerprint_file(path: impl AsRef<Path>) -> ExportResult<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.csv");
        std::fs::write(&path, "abc").unwrap();

        assert_eq!(
            fingerprint_file(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_manifest_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("left.csv");
        std::fs::write(&input, "Drug Name\nAspirin\n").unwrap();

        let stats = MatchStats {
            left_records: 1,
            resolved: 1,
            ..Default::default()
        };
        let manifest = RunManifest::new(MatchConfig::default(), stats)
            .with_input(InputFingerprint::from_file("left", &input, Some(1)).unwrap())
            .with_output("overlap.csv");

        let value: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();

        assert_eq!(value["engine_version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["thresholds"]["token_set"], 82);
        assert_eq!(value["inputs"][0]["role"], "left");
        assert_eq!(value["inputs"][0]["sha256"].as_str().unwrap().len(), 64);
        assert_eq!(value["stats"]["resolved"], 1);
        let generated_at = value["generated_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(generated_at).is_ok());
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunManifest::new(MatchConfig::default(), MatchStats::default());
        let b = RunManifest::new(MatchConfig::default(), MatchStats::default());
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_write_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/overlap.json");
        let manifest = RunManifest::new(MatchConfig::default(), MatchStats::default());

        manifest.write(&path).unwrap();

        let read: RunManifest =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.run_id, manifest.run_id);
    }
}
