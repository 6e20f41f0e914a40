//! Record directory: tags and fixed-width field descriptors.
//!
//! The directory sits between the leader and the field data. It is a run of
//! 12-byte entries followed by a single terminator byte:
//!
//! - Positions 0-2: Tag
//! - Positions 3-6: Field length, including the field terminator (4 digits)
//! - Positions 7-11: Field offset relative to the base address of data (5 digits)
//!
//! The order of the entries is the authoritative field order of a record.

use crate::error::{MarcError, Result};
use crate::leader::{parse_decimal, write_decimal};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Width of one serialized directory entry.
pub const DIRECTORY_ENTRY_LENGTH: usize = 12;

/// Largest field length expressible in the 4-digit length slot.
pub const MAX_FIELD_LENGTH: usize = 9_999;

/// Largest offset expressible in the 5-digit offset slot.
pub const MAX_FIELD_OFFSET: usize = 99_999;

/// Terminates the directory and every field.
pub const FIELD_TERMINATOR: u8 = 0x1E;

/// Terminates the whole record.
pub const RECORD_TERMINATOR: u8 = 0x1D;

/// A 3-byte field tag.
///
/// Tags are opaque to the codec. They compare bytewise, which gives the
/// usual ascending order for numeric tags and sorts alphabetic tags such as
/// `LOK` after all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag([u8; 3]);

impl Tag {
    /// Build a tag from its three raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Tag(bytes)
    }

    /// The raw tag bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }

    /// Whether this is a control field tag (`00x`).
    #[must_use]
    pub fn is_control(&self) -> bool {
        self.0[0] == b'0' && self.0[1] == b'0'
    }
}

impl FromStr for Tag {
    type Err = MarcError;

    fn from_str(s: &str) -> Result<Self> {
        let bytes: [u8; 3] = s
            .as_bytes()
            .try_into()
            .map_err(|_| MarcError::InvalidField(format!("Tag must be 3 bytes, got '{s}'")))?;
        Ok(Tag(bytes))
    }
}

impl TryFrom<&str> for Tag {
    type Error = MarcError;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// One directory slot.
///
/// `field_offset` is advisory: the decoder splits field data by lengths
/// alone, [`encode`](crate::writer::encode) recomputes every offset from the
/// current lengths, and [`Record::update_field`](crate::Record::update_field)
/// leaves offsets stale. Only [`validate`](crate::record_validation::validate)
/// checks stored offsets, and only on serialized bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    tag: Tag,
    field_length: usize,
    field_offset: usize,
}

impl DirectoryEntry {
    /// Create an entry, checking that both numbers fit their digit widths.
    ///
    /// # Errors
    ///
    /// Returns an error if `field_length` exceeds 9999 or `field_offset`
    /// exceeds 99999.
    pub fn new(tag: Tag, field_length: usize, field_offset: usize) -> Result<Self> {
        if field_length > MAX_FIELD_LENGTH {
            return Err(MarcError::InvalidField(format!(
                "Field {tag} length {field_length} exceeds {MAX_FIELD_LENGTH}"
            )));
        }
        if field_offset > MAX_FIELD_OFFSET {
            return Err(MarcError::InvalidField(format!(
                "Field {tag} offset {field_offset} exceeds {MAX_FIELD_OFFSET}"
            )));
        }
        Ok(DirectoryEntry {
            tag,
            field_length,
            field_offset,
        })
    }

    /// Build an entry whose widths the caller has already checked.
    pub(crate) fn unchecked(tag: Tag, field_length: usize, field_offset: usize) -> Self {
        DirectoryEntry {
            tag,
            field_length,
            field_offset,
        }
    }

    /// Parse one 12-byte directory slot.
    ///
    /// # Errors
    ///
    /// Returns an error if `chunk` is not 12 bytes or either number is not
    /// all ASCII digits.
    pub fn from_bytes(chunk: &[u8]) -> Result<Self> {
        if chunk.len() != DIRECTORY_ENTRY_LENGTH {
            return Err(MarcError::InvalidDirectory(format!(
                "Directory entry must be {DIRECTORY_ENTRY_LENGTH} bytes, got {}",
                chunk.len()
            )));
        }
        let tag = Tag([chunk[0], chunk[1], chunk[2]]);
        let field_length = parse_decimal(&chunk[3..7]).ok_or_else(|| {
            MarcError::InvalidDirectory(format!(
                "Invalid field length for tag {tag}: '{}'",
                String::from_utf8_lossy(&chunk[3..7])
            ))
        })?;
        let field_offset = parse_decimal(&chunk[7..12]).ok_or_else(|| {
            MarcError::InvalidDirectory(format!(
                "Invalid field offset for tag {tag}: '{}'",
                String::from_utf8_lossy(&chunk[7..12])
            ))
        })?;
        Ok(DirectoryEntry {
            tag,
            field_length,
            field_offset,
        })
    }

    /// Append the 12-byte serialization of this entry to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        debug_assert!(self.field_length <= MAX_FIELD_LENGTH);
        debug_assert!(self.field_offset <= MAX_FIELD_OFFSET);
        let start = out.len();
        out.extend_from_slice(&self.tag.0);
        out.resize(start + DIRECTORY_ENTRY_LENGTH, b'0');
        write_decimal(&mut out[start + 3..start + 7], self.field_length);
        write_decimal(&mut out[start + 7..start + 12], self.field_offset);
    }

    /// Field tag.
    #[must_use]
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Field length in bytes, including the field terminator.
    #[must_use]
    pub fn field_length(&self) -> usize {
        self.field_length
    }

    /// Stored offset from the base address of data. May be stale; see the
    /// type-level docs.
    #[must_use]
    pub fn field_offset(&self) -> usize {
        self.field_offset
    }

    pub(crate) fn set_field_length(&mut self, field_length: usize) {
        self.field_length = field_length;
    }

    pub(crate) fn set_field_offset(&mut self, field_offset: usize) {
        self.field_offset = field_offset;
    }
}

/// Parse a complete directory, terminator byte included.
///
/// # Errors
///
/// Returns an error if the length is not a multiple of the entry width plus
/// one, the last byte is not the terminator, or any entry is malformed.
pub fn parse_all(raw: &[u8]) -> Result<Vec<DirectoryEntry>> {
    let Some((&terminator, entries)) = raw.split_last() else {
        return Err(MarcError::InvalidDirectory("Directory is empty".to_string()));
    };
    if entries.len() % DIRECTORY_ENTRY_LENGTH != 0 {
        return Err(MarcError::InvalidDirectory(format!(
            "Directory length {} is not a multiple of {DIRECTORY_ENTRY_LENGTH} plus a terminator",
            raw.len()
        )));
    }
    if terminator != FIELD_TERMINATOR {
        return Err(MarcError::InvalidDirectory(format!(
            "Directory ends with 0x{terminator:02X} instead of the terminator"
        )));
    }
    entries
        .chunks_exact(DIRECTORY_ENTRY_LENGTH)
        .map(DirectoryEntry::from_bytes)
        .collect()
}

/// Index of the first entry carrying `tag`.
#[must_use]
pub fn find(tag: Tag, entries: &[DirectoryEntry]) -> Option<usize> {
    entries.iter().position(|entry| entry.tag == tag)
}

/// Serialize `entries` in list order, without the directory terminator.
#[must_use]
pub fn serialize_all(entries: &[DirectoryEntry]) -> Vec<u8> {
    let mut out = Vec::with_capacity(entries.len() * DIRECTORY_ENTRY_LENGTH);
    for entry in entries {
        entry.write_to(&mut out);
    }
    out
}
