//! The decoded record: leader, directory and field payloads.
//!
//! A [`Record`] is the triple produced by [`MarcReader`](crate::MarcReader)
//! and consumed by [`encode`](crate::writer::encode). `directory[i]` describes
//! `fields[i]`; payloads are stored without their field terminator and are
//! opaque bytes to the codec.
//!
//! # Examples
//!
//! ```
//! use marcio::Record;
//!
//! let bytes = b"00051nam a2200037   4500245001300000\x1E10\x1FaTitle te\x1E\x1D";
//! let mut record = Record::from_bytes(bytes)?;
//!
//! record.insert_field("260".parse()?, b"  \x1FbPub.".to_vec())?;
//! assert_eq!(record.tag(1).map(|t| t.to_string()), Some("260".to_string()));
//!
//! let encoded = record.to_bytes()?;
//! assert_eq!(encoded.len(), record.leader().record_length());
//! # Ok::<(), marcio::MarcError>(())
//! ```

use crate::directory::{self, DirectoryEntry, Tag};
use crate::error::{MarcError, Result};
use crate::leader::Leader;
use crate::reader::MarcReader;
use std::io::Cursor;

/// A decoded record.
///
/// Fields are kept in directory order, which is ascending tag order with
/// repeated tags in insertion order. The record exclusively owns its leader;
/// every mutation goes through `&mut self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub(crate) leader: Leader,
    pub(crate) directory: Vec<DirectoryEntry>,
    pub(crate) fields: Vec<Vec<u8>>,
}

impl Record {
    pub(crate) fn from_parts(
        leader: Leader,
        directory: Vec<DirectoryEntry>,
        fields: Vec<Vec<u8>>,
    ) -> Self {
        debug_assert_eq!(directory.len(), fields.len());
        Record {
            leader,
            directory,
            fields,
        }
    }

    /// Decode exactly one record from a byte slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not hold a well-formed record, if
    /// they are empty, or if anything follows the record terminator.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = MarcReader::new(Cursor::new(bytes));
        let record = reader
            .read_record()?
            .ok_or_else(|| MarcError::TruncatedRecord("No record data".to_string()))?;
        let consumed = reader.position();
        if consumed != bytes.len() as u64 {
            return Err(MarcError::InvalidRecord(format!(
                "{} trailing bytes after record terminator",
                bytes.len() as u64 - consumed
            )));
        }
        Ok(record)
    }

    /// Serialize this record. Shorthand for [`encode`](crate::writer::encode).
    ///
    /// # Errors
    ///
    /// See [`encode`](crate::writer::encode).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::writer::encode(self)
    }

    /// The record leader.
    #[must_use]
    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    /// Directory entries in field order.
    #[must_use]
    pub fn directory(&self) -> &[DirectoryEntry] {
        &self.directory
    }

    /// Field payloads in directory order, terminators stripped.
    #[must_use]
    pub fn fields(&self) -> &[Vec<u8>] {
        &self.fields
    }

    /// Payload of the field at `index`.
    #[must_use]
    pub fn field(&self, index: usize) -> Option<&[u8]> {
        self.fields.get(index).map(Vec::as_slice)
    }

    /// Tag of the field at `index`.
    #[must_use]
    pub fn tag(&self, index: usize) -> Option<Tag> {
        self.directory.get(index).map(DirectoryEntry::tag)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Index of the first field tagged `tag`.
    #[must_use]
    pub fn find(&self, tag: Tag) -> Option<usize> {
        directory::find(tag, &self.directory)
    }

    /// Indices of every field tagged `tag`, in record order.
    pub fn field_indices(&self, tag: Tag) -> impl Iterator<Item = usize> + '_ {
        self.directory
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.tag() == tag)
            .map(|(index, _)| index)
    }

    /// Iterate over `(tag, payload)` pairs in record order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &[u8])> {
        self.directory
            .iter()
            .zip(&self.fields)
            .map(|(entry, payload)| (entry.tag(), payload.as_slice()))
    }

    /// Payload of the 001 field as text, if present and valid UTF-8.
    #[must_use]
    pub fn control_number(&self) -> Option<&str> {
        let index = self.find(Tag::from_bytes(*b"001"))?;
        std::str::from_utf8(&self.fields[index]).ok()
    }

    /// Set the record status byte (leader position 5).
    ///
    /// # Errors
    ///
    /// Returns an error if `status` is not an ASCII character.
    pub fn set_record_status(&mut self, status: char) -> Result<()> {
        let byte = u8::try_from(status)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                MarcError::InvalidLeader(format!("Record status '{status}' is not ASCII"))
            })?;
        self.leader.set_byte(5, byte)
    }
}
