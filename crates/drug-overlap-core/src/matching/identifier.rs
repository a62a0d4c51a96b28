//! Exact join on the shared external identifier, run before any fuzzy logic.

use std::collections::{HashMap, HashSet};

use crate::models::{DrugRecord, MatchRecord, Registry};

/// Result of the identifier phase.
#[derive(Debug, Clone)]
pub struct IdentifierOutcome<'a> {
    /// One `IDENTIFIER` match per joined pair
    pub matches: Vec<MatchRecord>,
    /// Left records left for fuzzy matching, in source order
    pub remainder: Vec<&'a DrugRecord>,
}

/// Inner-join both registries on identifier.
///
/// Pairs are emitted in left order, then right order within one identifier.
/// When either registry lacks the identifier column the whole left side is
/// returned as remainder.
pub fn match_identifiers<'a>(left: &'a Registry, right: &Registry) -> IdentifierOutcome<'a> {
    if !left.has_identifier || !right.has_identifier {
        return IdentifierOutcome {
            matches: Vec::new(),
            remainder: left.records.iter().collect(),
        };
    }

    let mut right_by_id: HashMap<&str, Vec<&DrugRecord>> = HashMap::new();
    for record in &right.records {
        if let Some(id) = record.identifier.as_deref() {
            right_by_id.entry(id).or_default().push(record);
        }
    }

    let mut matches = Vec::new();
    let mut joined: HashSet<&str> = HashSet::new();

    for left_record in &left.records {
        let Some(id) = left_record.identifier.as_deref() else {
            continue;
        };
        if let Some(right_records) = right_by_id.get(id) {
            joined.insert(id);
            matches.extend(
                right_records
                    .iter()
                    .map(|right_record| MatchRecord::identifier(left_record, right_record)),
            );
        }
    }

    let remainder = left
        .records
        .iter()
        .filter(|record| {
            record
                .identifier
                .as_deref()
                .map_or(true, |id| !joined.contains(id))
        })
        .collect();

    IdentifierOutcome { matches, remainder }
}
