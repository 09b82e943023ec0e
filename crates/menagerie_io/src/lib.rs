//! # Menagerie IO
//!
//! Persistence and exchange for Menagerie populations.
//!
//! This crate provides:
//! - Structured error handling with [`IoError`]
//! - JSON, gzip and HexDNA helpers
//! - Save files in JSON, gzip and rkyv formats
//! - Gene-pool export and import between simulations

/// Error types and result aliases for I/O operations
pub mod error;
/// Gene-pool export, import and share codes
pub mod exchange;
/// Save files for the living population
pub mod persistence;
/// Validated serialization helpers for JSON, gzip and HexDNA formats
pub mod serialization;

pub use error::{IoError, Result};
pub use exchange::{export_pool, import_pool, ImportReport, PoolFile, PoolRecord};
pub use persistence::{load_population, save_population, LoadedPopulation, SaveFile};
