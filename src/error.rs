//! Types for error handling
//!
//! # Error handling in gpumap
//!
//! Packing and unpacking never panic on malformed input. Every fallible operation returns a
//! [`PackResult`](type.PackResult.html), and the error says which size or length did not line up.

use std::error::Error;
use std::fmt;

/// Error enum which represents the ways packing or unpacking a list can fail.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PackError {
    /// The list (or the launch grid it needs) is too long to describe in the `i32` header.
    LengthOverflow {
        /// The offending length.
        len: usize,
    },
    /// The byte buffer is smaller than the layout requires.
    BufferTooShort {
        /// Bytes the layout needs.
        needed: usize,
        /// Bytes actually supplied.
        actual: usize,
    },
    /// The header does not match the number of items being unpacked into.
    LengthMismatch {
        /// Length read from the header.
        header: usize,
        /// Length of the destination.
        expected: usize,
    },
    /// The header holds a negative length.
    NegativeLength(i32),
    /// A nested list is not rectangular.
    RaggedList {
        /// Index of the first inner list with the wrong length.
        index: usize,
        /// Length of the first inner list.
        expected: usize,
        /// Length found at `index`.
        found: usize,
    },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PackError::LengthOverflow { len } => {
                write!(f, "list length {} does not fit in an i32 header", len)
            }
            PackError::BufferTooShort { needed, actual } => write!(
                f,
                "buffer holds {} bytes but the list layout needs {}",
                actual, needed
            ),
            PackError::LengthMismatch { header, expected } => write!(
                f,
                "list header says {} items but {} were expected",
                header, expected
            ),
            PackError::NegativeLength(len) => write!(f, "list header holds negative length {}", len),
            PackError::RaggedList {
                index,
                expected,
                found,
            } => write!(
                f,
                "inner list {} has {} items, but inner lists must all have {}",
                index, found, expected
            ),
        }
    }
}

impl Error for PackError {}

/// Result type for most gpumap host functions.
pub type PackResult<T> = Result<T, PackError>;
