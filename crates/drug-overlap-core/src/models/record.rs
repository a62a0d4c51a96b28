//! Registry record models.

use serde::{Deserialize, Serialize};

/// Which registry a record was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    /// Primary-market registry (the query side)
    Left,
    /// Reference-market registry (the candidate side)
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A single entry from either registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugRecord {
    /// Display name as it appears in the source registry
    pub name: String,
    /// Canonical comparable form of `name` (may be empty)
    pub normalized_name: String,
    /// External concept code shared across registries (e.g. RxCUI)
    pub identifier: Option<String>,
    /// Approval or designation date, kept verbatim
    pub approval_date: Option<String>,
    /// Approved indication, kept verbatim
    pub indication: Option<String>,
    /// Registry this record belongs to
    pub side: Side,
}

impl DrugRecord {
    /// Create a record with only a display name.
    pub fn new(side: Side, name: String) -> Self {
        Self {
            name,
            normalized_name: String::new(),
            identifier: None,
            approval_date: None,
            indication: None,
            side,
        }
    }

    /// Set the normalized name.
    pub fn with_normalized_name(mut self, normalized: String) -> Self {
        self.normalized_name = normalized;
        self
    }

    /// Set the external identifier.
    pub fn with_identifier(mut self, identifier: String) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Set the approval date.
    pub fn with_approval_date(mut self, date: String) -> Self {
        self.approval_date = Some(date);
        self
    }

    /// Set the indication.
    pub fn with_indication(mut self, indication: String) -> Self {
        self.indication = Some(indication);
        self
    }

    /// Whether this record may enter the fuzzy candidate pool.
    pub fn is_fuzzy_eligible(&self) -> bool {
        !self.normalized_name.is_empty()
    }
}

/// A loaded registry: one side's records in source order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registry {
    /// Dataset label (file stem or variant name)
    pub label: String,
    /// Side of the comparison
    pub side: Side,
    /// Whether the source schema carried the identifier column at all
    pub has_identifier: bool,
    /// Records in source order
    pub records: Vec<DrugRecord>,
}

impl Registry {
    /// Create a registry.
    pub fn new(label: String, side: Side, has_identifier: bool, records: Vec<DrugRecord>) -> Self {
        Self {
            label,
            side,
            has_identifier,
            records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
