//! Match table CSV export.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::{ensure_parent, ExportResult};
use crate::models::{MatchRecord, MatchType};

/// One CSV row of the match table.
#[derive(Debug, Serialize)]
struct MatchRow<'a> {
    #[serde(rename = "Left Drug Name")]
    left_name: &'a str,
    #[serde(rename = "Right Drug Name")]
    right_name: &'a str,
    #[serde(rename = "Similarity Score")]
    similarity: f64,
    #[serde(rename = "Token Score")]
    token_score: u8,
    #[serde(rename = "Ratio Score")]
    ratio_score: u8,
    #[serde(rename = "Match Type")]
    match_type: MatchType,
    #[serde(rename = "Left Approval Date")]
    left_approval_date: Option<&'a str>,
    #[serde(rename = "Right Approval Date")]
    right_approval_date: Option<&'a str>,
    #[serde(rename = "Left Indication")]
    left_indication: Option<&'a str>,
    #[serde(rename = "Right Indication")]
    right_indication: Option<&'a str>,
}

impl<'a> From<&'a MatchRecord> for MatchRow<'a> {
    fn from(m: &'a MatchRecord) -> Self {
        Self {
            left_name: &m.left_name,
            right_name: &m.right_name,
            similarity: m.scores.jaro_winkler,
            token_score: m.scores.token_set,
            ratio_score: m.scores.ratio,
            match_type: m.match_type,
            left_approval_date: m.left_approval_date.as_deref(),
            right_approval_date: m.right_approval_date.as_deref(),
            left_indication: m.left_indication.as_deref(),
            right_indication: m.right_indication.as_deref(),
        }
    }
}

/// Write the match table to any writer.
pub fn write_matches<W: Write>(writer: W, matches: &[MatchRecord]) -> ExportResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if matches.is_empty() {
        // serde only emits the header alongside the first row
        csv.write_record([
            "Left Drug Name",
            "Right Drug Name",
            "Similarity Score",
            "Token Score",
            "Ratio Score",
            "Match Type",
            "Left Approval Date",
            "Right Approval Date",
            "Left Indication",
            "Right Indication",
        ])?;
    }
    for m in matches {
        csv.serialize(MatchRow::from(m))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the match table to `path`, creating parent directories.
pub fn write_matches_csv(path: impl AsRef<Path>, matches: &[MatchRecord]) -> ExportResult<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let file = std::fs::File::create(path)?;
    write_matches(file, matches)?;

    info!(path = %path.display(), matches = matches.len(), "wrote match table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DrugRecord, Side, SimilarityScores};

    fn render(matches: &[MatchRecord]) -> String {
        let mut buf = Vec::new();
        write_matches(&mut buf, matches).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let left = DrugRecord::new(Side::Left, "Aspirin".into()).with_indication("Pain".into());
        let right = DrugRecord::new(Side::Right, "ASPIRIN".into())
            .with_approval_date("2001-02-03".into());
        let fuzzy = MatchRecord::fuzzy(
            &DrugRecord::new(Side::Left, "Acetylsalicylic Acid".into()),
            &DrugRecord::new(Side::Right, "Acetyl Salicylic Acid".into()),
            SimilarityScores {
                jaro_winkler: 0.94,
                token_set: 98,
                ratio: 98,
            },
        );

        let out = render(&[MatchRecord::identifier(&left, &right), fuzzy]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Left Drug Name,Right Drug Name,Similarity Score,Token Score,Ratio Score,Match Type,\
             Left Approval Date,Right Approval Date,Left Indication,Right Indication"
        );
        assert_eq!(lines[1], "Aspirin,ASPIRIN,1.0,100,100,IDENTIFIER,,2001-02-03,Pain,");
        assert_eq!(
            lines[2],
            "Acetylsalicylic Acid,Acetyl Salicylic Acid,0.94,98,98,FUZZY,,,,"
        );
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let out = render(&[]);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("Left Drug Name,"));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/overlap.csv");

        write_matches_csv(&path, &[]).unwrap();

        assert!(path.exists());
    }
}
