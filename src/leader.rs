//! Record leader parsing and manipulation.
//!
//! The leader is a 24-byte fixed-length block at the start of every record.
//! Only two of its ranges mean anything to the codec, both ASCII decimal,
//! zero-padded and unsigned:
//!
//! - Positions 0-4: Record length (5 digits)
//! - Positions 12-16: Base address of data (5 digits)
//!
//! Every other byte (record status, record type, coding scheme, the
//! implementation-defined ranges) is carried through untouched and exposed
//! by position only.

use crate::error::{MarcError, Result};
use serde::{Serialize, Serializer};
use std::ops::Range;

/// Width of the leader in bytes.
pub const LEADER_LENGTH: usize = 24;

/// Hard ceiling on the total record length (5 decimal digits).
pub const MAX_RECORD_LENGTH: usize = 99_999;

const RECORD_LENGTH_RANGE: Range<usize> = 0..5;
const BASE_ADDRESS_RANGE: Range<usize> = 12..17;

/// Record leader - 24 bytes at the start of every record.
///
/// The raw bytes are the source of truth; `record_length` and
/// `base_address_of_data` are kept parsed alongside them and every setter
/// re-renders the matching digit run so [`Leader::as_bytes`] is always
/// consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader {
    raw: [u8; LEADER_LENGTH],
    record_length: usize,
    base_address_of_data: usize,
}

impl Leader {
    /// Parse a leader from exactly 24 bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` is not 24 bytes long or if either numeric
    /// range contains anything but ASCII digits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let raw: [u8; LEADER_LENGTH] = bytes.try_into().map_err(|_| {
            MarcError::InvalidLeader(format!(
                "Leader must be exactly {LEADER_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;

        let record_length = parse_decimal(&raw[RECORD_LENGTH_RANGE]).ok_or_else(|| {
            MarcError::InvalidLeader(format!(
                "Invalid record length: '{}'",
                String::from_utf8_lossy(&raw[RECORD_LENGTH_RANGE])
            ))
        })?;
        let base_address_of_data = parse_decimal(&raw[BASE_ADDRESS_RANGE]).ok_or_else(|| {
            MarcError::InvalidLeader(format!(
                "Invalid base address of data: '{}'",
                String::from_utf8_lossy(&raw[BASE_ADDRESS_RANGE])
            ))
        })?;

        Ok(Leader {
            raw,
            record_length,
            base_address_of_data,
        })
    }

    /// Check that the leader's numbers describe a readable record layout.
    ///
    /// The base address must lie past the leader and the record must be long
    /// enough to hold at least the record terminator after it.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first inconsistency found.
    pub fn validate_for_reading(&self) -> Result<()> {
        if self.base_address_of_data <= LEADER_LENGTH {
            return Err(MarcError::InvalidLeader(format!(
                "Base address of data must be greater than {LEADER_LENGTH}, got {}",
                self.base_address_of_data
            )));
        }
        if self.record_length <= self.base_address_of_data {
            return Err(MarcError::InvalidLeader(format!(
                "Record length {} does not extend past base address of data {}",
                self.record_length, self.base_address_of_data
            )));
        }
        Ok(())
    }

    /// The raw 24-byte leader.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; LEADER_LENGTH] {
        &self.raw
    }

    /// Total length of the serialized record in bytes.
    #[must_use]
    pub fn record_length(&self) -> usize {
        self.record_length
    }

    /// Offset from record start at which field data begins.
    #[must_use]
    pub fn base_address_of_data(&self) -> usize {
        self.base_address_of_data
    }

    /// Set the record length, re-rendering positions 0-4.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::RecordTooLong`] if `length` exceeds 99999.
    pub fn set_record_length(&mut self, length: usize) -> Result<()> {
        if length > MAX_RECORD_LENGTH {
            return Err(MarcError::RecordTooLong(length));
        }
        write_decimal(&mut self.raw[RECORD_LENGTH_RANGE], length);
        self.record_length = length;
        Ok(())
    }

    /// Set the base address of data, re-rendering positions 12-16.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` does not fit in five digits.
    pub fn set_base_address_of_data(&mut self, address: usize) -> Result<()> {
        if address > MAX_RECORD_LENGTH {
            return Err(MarcError::InvalidLeader(format!(
                "Base address of data {address} does not fit in 5 digits"
            )));
        }
        write_decimal(&mut self.raw[BASE_ADDRESS_RANGE], address);
        self.base_address_of_data = address;
        Ok(())
    }

    /// Record status (position 5).
    #[must_use]
    pub fn record_status(&self) -> char {
        char::from(self.raw[5])
    }

    /// Type of record (position 6).
    #[must_use]
    pub fn record_type(&self) -> char {
        char::from(self.raw[6])
    }

    /// Bibliographic level (position 7).
    #[must_use]
    pub fn bibliographic_level(&self) -> char {
        char::from(self.raw[7])
    }

    /// Character coding scheme (position 9).
    #[must_use]
    pub fn character_coding(&self) -> char {
        char::from(self.raw[9])
    }

    /// The byte at `position`, or `None` past the end of the leader.
    #[must_use]
    pub fn byte_at(&self, position: usize) -> Option<u8> {
        self.raw.get(position).copied()
    }

    /// The bytes in `range`, or `None` if the range leaves the leader.
    #[must_use]
    pub fn bytes_at(&self, range: Range<usize>) -> Option<&[u8]> {
        self.raw.get(range)
    }

    /// Overwrite a single opaque leader byte.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is outside the leader or falls inside
    /// one of the two numeric ranges, which are owned by the codec.
    pub fn set_byte(&mut self, position: usize, value: u8) -> Result<()> {
        if position >= LEADER_LENGTH
            || RECORD_LENGTH_RANGE.contains(&position)
            || BASE_ADDRESS_RANGE.contains(&position)
        {
            return Err(MarcError::InvalidLeader(format!(
                "Leader position {position} is not an opaque byte"
            )));
        }
        self.raw[position] = value;
        Ok(())
    }
}

impl Serialize for Leader {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(&self.raw))
    }
}

/// Parse an unsigned ASCII decimal digit run. Empty input and any non-digit
/// byte yield `None`.
pub(crate) fn parse_decimal(bytes: &[u8]) -> Option<usize> {
    if bytes.is_empty() {
        return None;
    }
    let mut result = 0usize;
    for &byte in bytes {
        if !byte.is_ascii_digit() {
            return None;
        }
        result = result * 10 + usize::from(byte - b'0');
    }
    Some(result)
}

/// Render `value` zero-padded into `out`. Callers guarantee it fits.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn write_decimal(out: &mut [u8], mut value: usize) {
    for slot in out.iter_mut().rev() {
        *slot = b'0' + (value % 10) as u8;
        value /= 10;
    }
}
