//! Locating institution-local field blocks.
//!
//! Local data is appended after the standard fields as a run of `LOK`
//! fields. Each `LOK` payload wraps one local field: two blank indicators,
//! a `0` subfield holding the wrapped tag and its two indicators, then the
//! wrapped field's own subfields. A wrapped `0000` tag marks the start of a
//! new local block, so the run divides into blocks:
//!
//! ```text
//! LOK  "  \x1F0000..."        <- block 1
//! LOK  "  \x1F0852  \x1Fa..."
//! LOK  "  \x1F0000..."        <- block 2
//! LOK  "  \x1F0852 1\x1Fa..."
//! ```

use crate::directory::Tag;
use crate::record::Record;
use std::ops::Range;
use tracing::debug;

/// Tag of the fields carrying local data.
pub const LOCAL_TAG: Tag = Tag::from_bytes(*b"LOK");

/// Payload prefix that opens a new local block.
const LOCAL_BLOCK_START: &[u8] = b"  \x1F0000";

/// Payload prefix shared by every wrapped local field, before its tag.
const LOCAL_FIELD_PREFIX: &[u8] = b"  \x1F0";

/// Position of the wrapped field's two indicators within a `LOK` payload.
const LOCAL_INDICATOR_OFFSET: usize = LOCAL_FIELD_PREFIX.len() + 3;

/// Matches any indicator in an indicator pattern.
pub const INDICATOR_WILDCARD: u8 = b'?';

/// Group the local fields of `record` into blocks.
///
/// Scanning starts at the first `LOK` field and runs to the end of the
/// record. Every field whose payload starts a new block closes the previous
/// one; the last block ends at the end of the record. Returns no blocks when
/// the record has no `LOK` field.
#[must_use]
pub fn find_blocks(record: &Record) -> Vec<Range<usize>> {
    let Some(first_local) = record.find(LOCAL_TAG) else {
        return Vec::new();
    };

    let mut blocks = Vec::new();
    let mut block_start = first_local;
    for index in first_local + 1..record.len() {
        if record.fields()[index].starts_with(LOCAL_BLOCK_START) {
            blocks.push(block_start..index);
            block_start = index;
        }
    }
    blocks.push(block_start..record.len());

    debug!(blocks = blocks.len(), first_local, "located local blocks");
    blocks
}

/// Find the wrapped `field_tag` fields inside one local block.
///
/// `indicators` is a two-byte pattern; each position matches either the
/// same byte or anything when it holds [`INDICATOR_WILDCARD`].
#[must_use]
pub fn find_in_block(
    record: &Record,
    field_tag: Tag,
    indicators: [u8; 2],
    block: Range<usize>,
) -> Vec<usize> {
    let end = block.end.min(record.len());
    (block.start..end)
        .filter(|&index| {
            let payload = &record.fields()[index];
            payload.starts_with(LOCAL_FIELD_PREFIX)
                && payload.get(LOCAL_FIELD_PREFIX.len()..LOCAL_INDICATOR_OFFSET)
                    == Some(&field_tag.as_bytes()[..])
                && payload
                    .get(LOCAL_INDICATOR_OFFSET..LOCAL_INDICATOR_OFFSET + 2)
                    .is_some_and(|actual| indicators_match(indicators, actual))
        })
        .collect()
}

fn indicators_match(pattern: [u8; 2], actual: &[u8]) -> bool {
    pattern
        .iter()
        .zip(actual)
        .all(|(&want, &got)| want == INDICATOR_WILDCARD || want == got)
}

impl Record {
    /// Local blocks of this record. See [`find_blocks`].
    #[must_use]
    pub fn local_blocks(&self) -> Vec<Range<usize>> {
        find_blocks(self)
    }
}
