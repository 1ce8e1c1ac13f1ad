//! Error type shared by the history engine, the normalizer, and text surfaces.

use crate::notification::EditCause;
use thiserror::Error;

/// Errors raised when a surface or a notification violates the offset contract.
///
/// The core never clamps offsets: a range outside the current text means the
/// surface and the history have diverged, and the operation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// A character range reaches past the end of the text.
    #[error("range {start}..{end} is out of bounds for text of {len} chars")]
    RangeOutOfBounds {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
        /// Character length of the text at the time of the check.
        len: usize,
    },
    /// A character range whose start lies after its end.
    #[error("invalid range: start {start} is after end {end}")]
    InvertedRange {
        /// Inclusive start character offset.
        start: usize,
        /// Exclusive end character offset.
        end: usize,
    },
    /// An edit notification whose payload cannot fit the caret it reports.
    #[error("{cause:?} notification inserted {inserted} chars but the caret is at {caret}")]
    MalformedNotification {
        /// Cause tag of the offending notification.
        cause: EditCause,
        /// Caret offset reported by the surface.
        caret: usize,
        /// Character length of the inserted text.
        inserted: usize,
    },
    /// A host surface refused to apply an edit.
    #[error("surface rejected the edit: {0}")]
    Surface(String),
}

impl HistoryError {
    /// Check `start..end` against a text of `len` characters.
    pub fn check_range(start: usize, end: usize, len: usize) -> Result<(), HistoryError> {
        if start > end {
            return Err(HistoryError::InvertedRange { start, end });
        }
        if end > len {
            return Err(HistoryError::RangeOutOfBounds { start, end, len });
        }
        Ok(())
    }
}
