use thiserror::Error;

/// Errors returned by the fallible [`BitVector`](crate::BitVector)
/// operations.
///
/// Every fallible operation validates its arguments before touching the
/// vector, so an `Err` always leaves the vector unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BitVectorError {
    /// A bit range was given whose start lies past its end.
    #[error("Range start {start} is greater than range end {end}")]
    IndexOutOfRange {
        /// Inclusive start of the rejected range.
        start: usize,
        /// Exclusive end of the rejected range.
        end: usize,
    },
    /// A raw bit value other than `0` or `1` was supplied.
    #[error("Bit value {value} at position {position} is neither 0 nor 1")]
    IllegalArgument {
        /// Position of the offending value in the input.
        position: usize,
        /// The offending value.
        value: u8,
    },
}
