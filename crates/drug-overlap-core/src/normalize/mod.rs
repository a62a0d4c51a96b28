//! Name normalization applied before any comparison.
//!
//! Pipeline: raw name → Normalizer → (query side only) SynonymMap

mod normalizer;
mod synonyms;

pub use normalizer::*;
pub use synonyms::*;

use thiserror::Error;

/// Synonym loading errors.
#[derive(Error, Debug)]
pub enum SynonymError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type SynonymResult<T> = Result<T, SynonymError>;
