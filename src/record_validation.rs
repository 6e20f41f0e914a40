//! Structural validation of serialized records.
//!
//! [`validate`] re-derives the whole layout of a serialized record from
//! scratch and checks it against what the bytes claim. The writer runs it on
//! its own output as a self-check; callers can also run it on untrusted input
//! before relying on stored directory offsets.

use crate::directory::{self, DIRECTORY_ENTRY_LENGTH, FIELD_TERMINATOR, RECORD_TERMINATOR};
use crate::error::{MarcError, Result};
use crate::leader::{Leader, LEADER_LENGTH, MAX_RECORD_LENGTH};
use crate::reader::split_fields;

/// Validate the structure of one serialized record.
///
/// Checks, in order, returning the first violation as
/// [`MarcError::Validation`]:
///
/// 1. the leader parses and its record length equals the byte count;
/// 2. the record length is at most 99999;
/// 3. the base address of data lies past the leader;
/// 4. the directory is a whole number of entries plus one terminator byte;
/// 5. the byte just before the base address is the directory terminator;
/// 6. the directory parses;
/// 7. every stored field offset equals the running sum of the preceding
///    field lengths;
/// 8. leader, directory, field lengths and both terminators add up to the
///    byte count;
/// 9. the field data splits cleanly into one chunk per entry;
/// 10. the last byte is the record terminator.
///
/// # Errors
///
/// Returns [`MarcError::Validation`] describing the first failed check.
pub fn validate(raw: &[u8]) -> Result<()> {
    let leader_bytes = raw
        .get(..LEADER_LENGTH)
        .ok_or_else(|| invalid(format!("record is only {} bytes long", raw.len())))?;
    let leader =
        Leader::from_bytes(leader_bytes).map_err(|e| invalid(format!("leader: {e}")))?;

    let record_length = leader.record_length();
    if record_length != raw.len() {
        return Err(invalid(format!(
            "leader record length {record_length} != actual length {}",
            raw.len()
        )));
    }
    if record_length > MAX_RECORD_LENGTH {
        return Err(invalid(format!(
            "record length {record_length} exceeds {MAX_RECORD_LENGTH}"
        )));
    }

    let base_address = leader.base_address_of_data();
    if base_address <= LEADER_LENGTH {
        return Err(invalid(format!(
            "base address of data {base_address} is not past the leader"
        )));
    }
    let directory_length = base_address - LEADER_LENGTH;
    if directory_length % DIRECTORY_ENTRY_LENGTH != 1 {
        return Err(invalid(format!(
            "directory length {directory_length} is not a multiple of \
             {DIRECTORY_ENTRY_LENGTH} plus a terminator"
        )));
    }
    if raw.get(base_address - 1) != Some(&FIELD_TERMINATOR) {
        return Err(invalid(
            "directory is not followed by a field terminator".to_string(),
        ));
    }

    let entries = directory::parse_all(&raw[LEADER_LENGTH..base_address])
        .map_err(|e| invalid(format!("directory: {e}")))?;

    let mut expected_offset = 0;
    for entry in &entries {
        if entry.field_offset() != expected_offset {
            return Err(invalid(format!(
                "field {} is stored at offset {} but should start at {expected_offset}",
                entry.tag(),
                entry.field_offset()
            )));
        }
        expected_offset += entry.field_length();
    }

    let computed_length = base_address + expected_offset + 1;
    if computed_length != raw.len() {
        return Err(invalid(format!(
            "leader, directory and fields add up to {computed_length} bytes, record has {}",
            raw.len()
        )));
    }

    let fields = split_fields(&entries, &raw[base_address..])
        .map_err(|e| invalid(format!("field data: {e}")))?;
    if fields.len() != entries.len() {
        return Err(invalid(format!(
            "found {} fields for {} directory entries",
            fields.len(),
            entries.len()
        )));
    }

    if raw.last() != Some(&RECORD_TERMINATOR) {
        return Err(invalid("record does not end with the record terminator".to_string()));
    }

    Ok(())
}

fn invalid(reason: String) -> MarcError {
    MarcError::Validation(reason)
}
