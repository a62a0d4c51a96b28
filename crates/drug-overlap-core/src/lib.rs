//! Drug-Overlap Core Library
//!
//! Reconciles two independently curated drug-name registries into a 1:1
//! match table.
//!
//! # Architecture
//!
//! ```text
//!  left registry ─┐                              ┌─ right registry
//!                 ▼                              ▼
//!             Normalizer ──────────────────► Normalizer
//!                 │                              │
//!                 └────────► Identifier ◄────────┘
//!                            Matcher
//!                               │ remainder
//!                               ▼
//!                   ┌───────────────────────┐
//!                   │  per left record      │   (rayon fan-out)
//!                   │  synonym → Jaccard    │
//!                   │  filter → 3 metrics   │
//!                   │  → 2-of-3 consensus   │
//!                   └───────────┬───────────┘
//!                               ▼
//!                 IDENTIFIER + FUZZY candidates
//!                               │
//!                               ▼
//!                  Resolver (greedy, 1:1)  ──► match table
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (DrugRecord, Registry, MatchRecord)
//! - [`normalize`]: Name normalizer and synonym map
//! - [`matching`]: Similarity metrics, candidate filter, consensus vote,
//!   identifier matcher, fuzzy phase, resolver and the engine tying them together
//! - [`ingest`]: Registry loading, column standardization, names-only enrichment
//! - [`export`]: Match table CSV and run manifest

pub mod export;
pub mod ingest;
pub mod matching;
pub mod models;
pub mod normalize;

// Re-export commonly used types
pub use matching::{MatchConfig, MatchEngine, MatchError, MatchOutcome, MatchStats};
pub use models::{DrugRecord, MatchRecord, MatchType, Registry, Side};
pub use normalize::{Normalizer, SynonymMap};
