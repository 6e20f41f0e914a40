//! Decoding records from binary streams.
//!
//! This module provides [`MarcReader`] for reading ISO 2709 records from any
//! source that implements [`std::io::Read`]. Each record is read in three
//! sized sections (leader, directory, field data) and either decoded in full
//! or rejected; there are no partial results.
//!
//! # Examples
//!
//! Reading records from a file, skipping bad ones:
//!
//! ```no_run
//! use marcio::MarcReader;
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! let mut reader = MarcReader::new(file);
//!
//! loop {
//!     match reader.read_record() {
//!         Ok(Some(record)) => println!("{:?}", record.control_number()),
//!         Ok(None) => break,
//!         Err(e) if e.is_unrecoverable() => return Err(e.into()),
//!         Err(e) => eprintln!("skipping: {e}"),
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::directory::{self, DirectoryEntry, FIELD_TERMINATOR, RECORD_TERMINATOR};
use crate::error::{MarcError, Result};
use crate::leader::{Leader, LEADER_LENGTH};
use crate::record::Record;
use std::io::{self, ErrorKind, Read};
use std::iter::FusedIterator;
use tracing::{trace, warn};

/// Reader for ISO 2709 binary records.
///
/// `MarcReader` reads one record at a time and keeps track of its byte
/// position in the stream, so every decode failure can name the offset at
/// which the bad record started.
///
/// # Examples
///
/// ```
/// use marcio::MarcReader;
/// use std::io::Cursor;
///
/// let mut reader = MarcReader::new(Cursor::new(Vec::new()));
///
/// match reader.read_record() {
///     Ok(Some(record)) => println!("{} fields", record.len()),
///     Ok(None) => println!("End of file"),
///     Err(e) => eprintln!("Error: {e}"),
/// }
/// ```
#[derive(Debug)]
pub struct MarcReader<R: Read> {
    reader: R,
    position: u64,
    records_read: usize,
}

impl<R: Read> MarcReader<R> {
    /// Create a new reader positioned at offset 0.
    pub fn new(reader: R) -> Self {
        MarcReader {
            reader,
            position: 0,
            records_read: 0,
        }
    }

    /// Set the offset the stream is currently at.
    ///
    /// Use this when the caller has seeked the underlying source before
    /// handing it over, so reported offsets stay absolute.
    ///
    /// ```
    /// use marcio::MarcReader;
    /// use std::io::Cursor;
    ///
    /// let reader = MarcReader::new(Cursor::new(Vec::new())).with_start_offset(4096);
    /// assert_eq!(reader.position(), 4096);
    /// ```
    #[must_use]
    pub fn with_start_offset(mut self, offset: u64) -> Self {
        self.position = offset;
        self
    }

    /// Read a single record.
    ///
    /// Returns `Ok(Some(record))` if a record was decoded, `Ok(None)` if the
    /// stream was exhausted exactly at a record boundary, or `Err` if the
    /// record is malformed or truncated.
    ///
    /// # Errors
    ///
    /// Every error is wrapped in [`MarcError::AtOffset`] carrying the offset
    /// at which the failing record's leader began.
    ///
    /// When the leader was readable, the rest of the bad record (as far as
    /// its record length reaches) is consumed before the error is returned,
    /// so the next call starts at the following record. After an unreadable
    /// leader or an I/O error the stream position inside the record is
    /// unknown; see [`MarcError::is_unrecoverable`].
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let start = self.position;
        match self.decode_next(start) {
            Ok(Some(record)) => {
                self.records_read += 1;
                trace!(
                    offset = start,
                    record_length = record.leader().record_length(),
                    fields = record.len(),
                    "decoded record"
                );
                Ok(Some(record))
            },
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(offset = start, error = %e, "failed to decode record");
                Err(e.at_offset(start))
            },
        }
    }

    /// Iterate over the remaining records.
    ///
    /// A malformed record with a readable leader is yielded as an `Err` item
    /// and iteration carries on with the record after it. An unreadable
    /// leader or an I/O error is yielded once, after which the iterator is
    /// exhausted. It also ends at a clean end of stream.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    /// Current byte offset in the stream.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of records decoded successfully so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Consume the reader, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn decode_next(&mut self, start: u64) -> Result<Option<Record>> {
        let mut leader_bytes = [0u8; LEADER_LENGTH];
        let got = self.fill(&mut leader_bytes)?;
        if got == 0 {
            return Ok(None);
        }
        if got < LEADER_LENGTH {
            return Err(MarcError::TruncatedRecord(format!(
                "Short read of leader: expected {LEADER_LENGTH} bytes, got {got}"
            )));
        }

        let leader = Leader::from_bytes(&leader_bytes)?;
        leader.validate_for_reading()?;

        let record_end = start + leader.record_length() as u64;
        match self.decode_body(leader) {
            Ok(record) => Ok(Some(record)),
            Err(e @ MarcError::IoError(_)) => Err(e),
            Err(e) => {
                self.skip_to(record_end)?;
                Err(e)
            },
        }
    }

    fn decode_body(&mut self, leader: Leader) -> Result<Record> {
        let directory_length = leader.base_address_of_data() - LEADER_LENGTH;
        let directory_bytes = self.read_section(directory_length, "directory")?;
        let directory = directory::parse_all(&directory_bytes)?;

        let field_data_size = leader.record_length() - LEADER_LENGTH - directory_length;
        let field_data = self.read_section(field_data_size, "field data")?;
        let fields = split_fields(&directory, &field_data)?;

        Ok(Record::from_parts(leader, directory, fields))
    }

    /// Discard input up to stream offset `end`, or to the end of the source.
    fn skip_to(&mut self, end: u64) -> Result<()> {
        let remaining = end.saturating_sub(self.position);
        if remaining == 0 {
            return Ok(());
        }
        let skipped = io::copy(&mut self.reader.by_ref().take(remaining), &mut io::sink())?;
        self.position += skipped;
        trace!(skipped, offset = self.position, "skipped rest of bad record");
        Ok(())
    }

    fn read_section(&mut self, length: usize, section: &str) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        let got = self.fill(&mut buf)?;
        if got < length {
            return Err(MarcError::TruncatedRecord(format!(
                "Short read of {section}: expected {length} bytes, got {got}"
            )));
        }
        Ok(buf)
    }

    /// Read until `buf` is full or the source is exhausted.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => {},
                Err(e) => {
                    self.position += filled as u64;
                    return Err(MarcError::IoError(e));
                },
            }
        }
        self.position += filled as u64;
        Ok(filled)
    }
}

/// Iterator over the records of a [`MarcReader`].
///
/// Fused: once it returns `None` it keeps returning `None`.
#[derive(Debug)]
pub struct Records<'a, R: Read> {
    reader: &'a mut MarcReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = e.is_unrecoverable();
                Some(Err(e))
            },
        }
    }
}

impl<R: Read> FusedIterator for Records<'_, R> {}

/// Split a record's field data into payloads using the directory lengths.
///
/// `data` must end with the record terminator, every chunk must end with the
/// field terminator, and the chunks must use up the data exactly. Stored
/// offsets are not consulted.
pub(crate) fn split_fields(directory: &[DirectoryEntry], data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let Some((&last, body)) = data.split_last() else {
        return Err(MarcError::InvalidField("Field data is empty".to_string()));
    };
    if last != RECORD_TERMINATOR {
        return Err(MarcError::InvalidField(format!(
            "Record ends with 0x{last:02X} instead of the record terminator"
        )));
    }

    let mut fields = Vec::with_capacity(directory.len());
    let mut pos = 0;
    for entry in directory {
        let length = entry.field_length();
        if length == 0 {
            return Err(MarcError::InvalidField(format!(
                "Field {} has zero length",
                entry.tag()
            )));
        }
        let end = pos + length;
        let Some(chunk) = body.get(pos..end) else {
            return Err(MarcError::InvalidField(format!(
                "Field {} (length {length} at {pos}) extends past the end of the field data ({} bytes)",
                entry.tag(),
                body.len()
            )));
        };
        let (&terminator, payload) = chunk
            .split_last()
            .ok_or_else(|| MarcError::InvalidField(format!("Field {} is empty", entry.tag())))?;
        if terminator != FIELD_TERMINATOR {
            return Err(MarcError::InvalidField(format!(
                "Field {} is not followed by a field terminator",
                entry.tag()
            )));
        }
        fields.push(payload.to_vec());
        pos = end;
    }

    if pos != body.len() {
        return Err(MarcError::InvalidField(format!(
            "{} bytes of field data not covered by the directory",
            body.len() - pos
        )));
    }
    Ok(fields)
}
