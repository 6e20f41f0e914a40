//! Encoding records to binary format.
//!
//! [`encode`] turns a [`Record`] into ISO 2709 bytes and [`MarcWriter`]
//! streams encoded records to any destination implementing
//! [`std::io::Write`].
//!
//! The encoder is the single source of truth for layout: record length,
//! base address and every directory offset are recomputed from the current
//! field lengths. Whatever the record's leader and directory held before is
//! ignored apart from the tags and the opaque leader bytes.
//!
//! # Examples
//!
//! ```
//! use marcio::{MarcWriter, Record};
//!
//! let record = Record::from_bytes(
//!     b"00051nam a2200037   4500245001300000\x1E10\x1FaTitle te\x1E\x1D",
//! )?;
//!
//! let mut buffer = Vec::new();
//! {
//!     let mut writer = MarcWriter::new(&mut buffer);
//!     writer.write_record(&record)?;
//!     writer.finish()?;
//! }
//! assert_eq!(buffer.len(), 51);
//! # Ok::<(), marcio::MarcError>(())
//! ```

use crate::directory::{
    DirectoryEntry, DIRECTORY_ENTRY_LENGTH, FIELD_TERMINATOR, RECORD_TERMINATOR,
};
use crate::error::{MarcError, Result};
use crate::leader::{LEADER_LENGTH, MAX_RECORD_LENGTH};
use crate::record::Record;
use crate::record_validation::validate;
use std::io::Write;
use tracing::trace;

/// Serialize a record to ISO 2709 bytes.
///
/// Layout: leader, directory, directory terminator, each field followed by a
/// field terminator, record terminator.
///
/// # Errors
///
/// Returns [`MarcError::RecordTooLong`] if the record would exceed 99999
/// bytes, or [`MarcError::InvalidField`] if a field is too long for the
/// 4-digit length slot.
pub fn encode(record: &Record) -> Result<Vec<u8>> {
    let base_address = LEADER_LENGTH + record.directory.len() * DIRECTORY_ENTRY_LENGTH + 1;

    let mut directory = Vec::with_capacity(base_address - LEADER_LENGTH);
    let mut offset = 0;
    for (entry, payload) in record.directory.iter().zip(&record.fields) {
        let field_length = payload.len() + 1;
        DirectoryEntry::new(entry.tag(), field_length, offset)?.write_to(&mut directory);
        offset += field_length;
    }
    directory.push(FIELD_TERMINATOR);

    let record_length = base_address + offset + 1;
    if record_length > MAX_RECORD_LENGTH {
        return Err(MarcError::RecordTooLong(record_length));
    }

    let mut leader = record.leader.clone();
    leader.set_record_length(record_length)?;
    leader.set_base_address_of_data(base_address)?;

    let mut out = Vec::with_capacity(record_length);
    out.extend_from_slice(leader.as_bytes());
    out.extend_from_slice(&directory);
    for payload in &record.fields {
        out.extend_from_slice(payload);
        out.push(FIELD_TERMINATOR);
    }
    out.push(RECORD_TERMINATOR);

    debug_assert_eq!(out.len(), record_length);
    trace!(record_length, fields = record.len(), "encoded record");
    Ok(out)
}

/// Writer for ISO 2709 binary records.
///
/// By default every encoded record is re-validated before it is written.
/// Bytes produced by [`encode`] that fail validation mean the encoder itself
/// is broken, so the writer panics instead of returning an error.
#[derive(Debug)]
pub struct MarcWriter<W: Write> {
    writer: W,
    self_check: bool,
    records_written: usize,
    finished: bool,
}

impl<W: Write> MarcWriter<W> {
    /// Create a new writer with self-checking enabled.
    ///
    /// ```
    /// use marcio::MarcWriter;
    /// let writer = MarcWriter::new(Vec::new());
    /// assert_eq!(writer.records_written(), 0);
    /// ```
    pub fn new(writer: W) -> Self {
        MarcWriter {
            writer,
            self_check: true,
            records_written: 0,
            finished: false,
        }
    }

    /// Enable or disable validation of every encoded record.
    #[must_use]
    pub fn with_self_check(mut self, enabled: bool) -> Self {
        self.self_check = enabled;
        self
    }

    /// Encode and write a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer is finished, the record cannot be
    /// encoded (see [`encode`]), or the underlying write fails.
    ///
    /// # Panics
    ///
    /// Panics if self-checking is enabled and the encoded bytes fail
    /// [`validate`].
    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        if self.finished {
            return Err(MarcError::InvalidRecord(
                "Cannot write to a finished writer".to_string(),
            ));
        }

        let bytes = encode(record)?;
        if self.self_check {
            if let Err(e) = validate(&bytes) {
                panic!("encoder produced an inconsistent record: {e}");
            }
        }

        self.writer.write_all(&bytes)?;
        self.records_written += 1;
        Ok(())
    }

    /// Flush the writer and mark it as finished.
    ///
    /// After calling `finish`, no more records can be written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the underlying writer fails.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        self.finished = true;
        Ok(())
    }

    /// Returns the number of records written so far.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Consume the writer, returning the underlying destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
