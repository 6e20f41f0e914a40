//! Error types for record codec operations.
//!
//! This module provides the [`MarcError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all record codec operations.
///
/// Decode failures coming out of [`MarcReader`](crate::MarcReader) are wrapped
/// in [`MarcError::AtOffset`] so batch callers can report where in the stream
/// the bad record started and carry on with the next one.
#[derive(Error, Debug)]
pub enum MarcError {
    /// Error for a record-level problem not tied to one section of the layout.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Error indicating an invalid leader (24-byte header).
    #[error("Invalid leader: {0}")]
    InvalidLeader(String),

    /// Error indicating a malformed directory or directory entry.
    #[error("Invalid directory: {0}")]
    InvalidDirectory(String),

    /// Error indicating an invalid field payload or field length.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Error indicating a truncated or incomplete record.
    #[error("Truncated record: {0}")]
    TruncatedRecord(String),

    /// The record would exceed the 5-digit record length ceiling.
    #[error("Record length {0} exceeds the maximum of 99999 bytes")]
    RecordTooLong(usize),

    /// A serialized record failed structural validation.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A decode failure annotated with the stream offset of the record's leader.
    #[error("Bad record at offset {offset}: {source}")]
    AtOffset {
        /// Byte offset at which the failing record began.
        offset: u64,
        /// The underlying failure.
        #[source]
        source: Box<MarcError>,
    },

    /// IO error from the underlying source/destination.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl MarcError {
    /// Attach the stream offset of the record being decoded.
    ///
    /// Already-annotated errors keep their original offset.
    #[must_use]
    pub fn at_offset(self, offset: u64) -> Self {
        match self {
            MarcError::AtOffset { .. } => self,
            other => MarcError::AtOffset {
                offset,
                source: Box::new(other),
            },
        }
    }

    /// Offset of the record that failed, if known.
    #[must_use]
    pub fn offset(&self) -> Option<u64> {
        match self {
            MarcError::AtOffset { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// The innermost error, with any offset annotation stripped.
    #[must_use]
    pub fn root(&self) -> &MarcError {
        match self {
            MarcError::AtOffset { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether a stream that produced this error can be read any further.
    ///
    /// True for I/O failures and for leaders that could not be used: in both
    /// cases the length of the bad record, and so the start of the next
    /// one, is unknown.
    #[must_use]
    pub fn is_unrecoverable(&self) -> bool {
        matches!(
            self.root(),
            MarcError::IoError(_) | MarcError::InvalidLeader(_)
        )
    }
}

/// Convenience type alias for [`std::result::Result`] with [`MarcError`].
pub type Result<T> = std::result::Result<T, MarcError>;
