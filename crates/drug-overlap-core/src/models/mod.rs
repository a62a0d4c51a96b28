//! Domain models for the drug-overlap system.

mod matches;
mod record;

pub use matches::*;
pub use record::*;
