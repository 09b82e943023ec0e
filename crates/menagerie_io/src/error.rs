//! Error types for menagerie_io.
//!
//! Covers save files, pool exchange and the serialization helpers they share.

use thiserror::Error;

/// Main error type for menagerie_io operations.
#[derive(Error, Debug)]
pub enum IoError {
    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Rkyv checkpoint errors
    #[error("Rkyv error: {0}")]
    Rkyv(String),

    /// File system errors
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Compression errors
    #[error("Compression error: {0}")]
    Compression(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// One record of an import file could not be used. The rest of the
    /// import continues.
    #[error("Malformed import record #{index}: {reason}")]
    MalformedImportRecord { index: usize, reason: String },

    /// The file was written with another format version. Loading goes on.
    #[error("Format version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<IoError>,
    },
}

/// Result type alias for menagerie_io operations.
pub type Result<T> = std::result::Result<T, IoError>;

impl IoError {
    #[must_use]
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        Self::Serialization(msg.into())
    }

    #[must_use]
    pub fn rkyv<S: Into<String>>(msg: S) -> Self {
        Self::Rkyv(msg.into())
    }

    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    #[must_use]
    pub fn compression<S: Into<String>>(msg: S) -> Self {
        Self::Compression(msg.into())
    }

    #[must_use]
    pub fn malformed<S: Into<String>>(index: usize, reason: S) -> Self {
        Self::MalformedImportRecord {
            index,
            reason: reason.into(),
        }
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// True for errors that are reported but never abort an operation.
    #[must_use]
    pub fn is_warning(&self) -> bool {
        match self {
            Self::VersionMismatch { .. } | Self::MalformedImportRecord { .. } => true,
            Self::Context { source, .. } => source.is_warning(),
            _ => false,
        }
    }
}
