//! Record builders shared by the unit tests.

use crate::directory::{FIELD_TERMINATOR, RECORD_TERMINATOR};
use crate::record::Record;

/// Assemble a well-formed serialized record from `(tag, payload)` pairs.
pub(crate) fn record_bytes(fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut data = Vec::new();
    for (tag, payload) in fields {
        directory.extend_from_slice(tag.as_bytes());
        directory.extend_from_slice(format!("{:04}", payload.len() + 1).as_bytes());
        directory.extend_from_slice(format!("{:05}", data.len()).as_bytes());
        data.extend_from_slice(payload);
        data.push(FIELD_TERMINATOR);
    }
    directory.push(FIELD_TERMINATOR);

    let base_address = 24 + directory.len();
    let record_length = base_address + data.len() + 1;

    let mut bytes = Vec::with_capacity(record_length);
    bytes.extend_from_slice(format!("{record_length:05}").as_bytes());
    bytes.extend_from_slice(b"nam a22");
    bytes.extend_from_slice(format!("{base_address:05}").as_bytes());
    bytes.extend_from_slice(b"   4500");
    bytes.extend_from_slice(&directory);
    bytes.extend_from_slice(&data);
    bytes.push(RECORD_TERMINATOR);
    bytes
}

/// Decode a record assembled by [`record_bytes`].
pub(crate) fn record(fields: &[(&str, &[u8])]) -> Record {
    Record::from_bytes(&record_bytes(fields)).unwrap()
}
