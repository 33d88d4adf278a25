//! Common error types for the sitsit planner

use thiserror::Error;

/// Common result type for seating operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the planner library and its front-ends
///
/// All variants are raised synchronously where the problem is detected.
/// Nothing is retried: the same input reproduces the same failure.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed table-size text (empty, non-integer or non-positive token)
    #[error("Invalid table specification: {0}")]
    InvalidSpec(String),

    /// More people were routed to a table than it has seats
    #[error("Table {} overflows its {capacity} seats, add more seats", .table_index + 1)]
    TableOverflow {
        /// Zero-based index of the table in the specification
        table_index: usize,
        /// Effective seat count of that table
        capacity: usize,
    },

    /// Person data that cannot take part in similarity comparison
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Registration export could not be turned into people
    #[error("Import error: {0}")]
    Import(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
