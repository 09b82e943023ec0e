//! Genome and individual records.

pub mod individual;
pub mod traits;
