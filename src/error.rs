//! Errors reported by the matrix construction and cover primitives.

use std::fmt;

/// Contract violations detected by [`Matrix`](crate::Matrix).
///
/// None of these are transient: each one means the caller broke the
/// build-then-search discipline, and the matrix is left exactly as it was
/// before the failing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A dense row's length disagrees with the number of registered columns.
    ColumnCountMismatch { expected: usize, actual: usize },

    /// A column index past the last registered column.
    ColumnIndexOutOfRange { index: usize },

    /// Cover was called on a column that is already covered.
    ColumnAlreadyCovered { index: usize },

    /// Uncover was called on a column that is not covered.
    ColumnNotCovered { index: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ColumnCountMismatch { expected, actual } => {
                write!(
                    f,
                    "column mismatch: have only {} columns registered, but got {}",
                    expected, actual
                )
            }
            Error::ColumnIndexOutOfRange { index } => {
                write!(f, "column at index {} does not exist", index)
            }
            Error::ColumnAlreadyCovered { index } => {
                write!(f, "column at {} is already covered", index)
            }
            Error::ColumnNotCovered { index } => {
                write!(f, "column at {} has not been covered yet", index)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
