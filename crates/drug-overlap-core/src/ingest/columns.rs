//! Header standardization across registry schemas.

use csv::StringRecord;

/// Header candidates for each record attribute, in priority order.
///
/// The first entry is the canonical header; later entries are aliases used
/// when the canonical header is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    pub name: Vec<String>,
    pub identifier: Vec<String>,
    pub approval_date: Vec<String>,
    pub indication: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            name: headers(&["Drug Name", "Generic Name"]),
            identifier: headers(&["RxCUI"]),
            approval_date: headers(&["Date of Approval", "Date Designated"]),
            indication: headers(&["Indication", "Orphan Designation"]),
        }
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Column positions found in one header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnIndices {
    pub name: Option<usize>,
    pub identifier: Option<usize>,
    pub approval_date: Option<usize>,
    pub indication: Option<usize>,
}

impl ColumnMapping {
    /// Replace the identifier header (e.g. `--id-column`).
    pub fn with_identifier_column(mut self, column: impl Into<String>) -> Self {
        self.identifier = vec![column.into()];
        self
    }

    /// Canonical name header, used in error messages.
    pub fn name_column(&self) -> &str {
        self.name.first().map(String::as_str).unwrap_or("Drug Name")
    }

    /// Locate every attribute in `header_row`. Matching is exact after trimming.
    pub fn locate(&self, header_row: &StringRecord) -> ColumnIndices {
        let find = |candidates: &[String]| {
            candidates
                .iter()
                .find_map(|c| header_row.iter().position(|h| h.trim() == c))
        };

        ColumnIndices {
            name: find(&self.name),
            identifier: find(&self.identifier),
            approval_date: find(&self.approval_date),
            indication: find(&self.indication),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_headers() {
        let row = StringRecord::from(vec![
            "Sr.No",
            "Drug Name",
            "RxCUI",
            "Indication",
            "Date of Approval",
        ]);
        let idx = ColumnMapping::default().locate(&row);

        assert_eq!(idx.name, Some(1));
        assert_eq!(idx.identifier, Some(2));
        assert_eq!(idx.indication, Some(3));
        assert_eq!(idx.approval_date, Some(4));
    }

    #[test]
    fn test_reference_schema_aliases() {
        let row =
            StringRecord::from(vec![" Generic Name ", "Date Designated", "Orphan Designation"]);
        let idx = ColumnMapping::default().locate(&row);

        assert_eq!(idx.name, Some(0));
        assert_eq!(idx.identifier, None);
        assert_eq!(idx.approval_date, Some(1));
        assert_eq!(idx.indication, Some(2));
    }

    #[test]
    fn test_canonical_wins_over_alias() {
        let row = StringRecord::from(vec!["Generic Name", "Drug Name"]);
        assert_eq!(ColumnMapping::default().locate(&row).name, Some(1));
    }

    #[test]
    fn test_custom_identifier_column() {
        let mapping = ColumnMapping::default().with_identifier_column("NDC");
        let row = StringRecord::from(vec!["Drug Name", "RxCUI", "NDC"]);
        assert_eq!(mapping.locate(&row).identifier, Some(2));
    }
}
