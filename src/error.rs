//! Error types for PostgreSQL column metadata handling.

use std::panic::Location;
use thiserror::Error;

/// Result type alias for column metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for wire parsing and schema introspection.
///
/// Building or querying a [`Column`](crate::Column) never fails; only the
/// collaborators that produce columns do.
#[derive(Error, Debug)]
pub enum Error {
    /// Protocol error.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Unexpected message tag received.
    #[error("Unexpected message: expected {expected:?}, got {actual:?}")]
    UnexpectedMessage { expected: char, actual: char },

    /// Buffer too small.
    #[error("Buffer too small: need {needed} bytes, have {available} filed at {location}")]
    BufferTooSmall {
        needed: usize,
        available: usize,
        location: &'static Location<'static>,
    },

    /// No built-in mapping for a type oid.
    #[error("Unsupported PostgreSQL type oid: {oid}")]
    UnsupportedType { oid: u32 },

    /// Table name could not be parsed.
    #[error("Invalid table name '{name}': {message}")]
    InvalidTableName { name: String, message: String },

    /// Catalog returned no attributes for the table.
    #[error("Table not found: {table}")]
    TableNotFound { table: String },

    /// Column not found.
    #[error("Column not found: {name}")]
    ColumnNotFound { name: String },

    /// Catalog query did not finish in time.
    #[error("Introspection of {table} timed out after {timeout:?}")]
    IntrospectionTimeout {
        table: String,
        timeout: std::time::Duration,
    },

    /// Error reported by a catalog source.
    #[error("Catalog error: {message}")]
    Catalog { message: String },
}

impl Error {
    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a catalog error.
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a buffer-too-small error located at the caller.
    #[track_caller]
    pub(crate) fn buffer_too_small(needed: usize, available: usize) -> Self {
        Self::BufferTooSmall {
            needed,
            available,
            location: Location::caller(),
        }
    }
}
