//! Read-only subfield access layered on top of field payloads.
//!
//! The codec treats payloads as opaque bytes. Data field payloads follow a
//! fixed convention though: two indicator bytes, then any number of
//! `0x1F code value` runs. These helpers read that convention without ever
//! changing how records are stored.

use crate::directory::Tag;
use crate::record::Record;
use memchr::memchr;
use smallvec::SmallVec;

/// Separates subfields inside a data field payload.
pub const SUBFIELD_DELIMITER: u8 = 0x1F;

/// A parsed view of one data field payload.
///
/// Values borrow from the payload. Fields rarely carry more than a handful
/// of subfields, so they are kept inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfields<'a> {
    indicator1: u8,
    indicator2: u8,
    entries: SmallVec<[(u8, &'a [u8]); 4]>,
}

impl<'a> Subfields<'a> {
    /// Split a data field payload into indicators and subfields.
    ///
    /// Anything before the first delimiter other than the indicators is
    /// ignored, as is a trailing delimiter with no code.
    #[must_use]
    pub fn parse(payload: &'a [u8]) -> Self {
        let indicator1 = payload.first().copied().unwrap_or(b' ');
        let indicator2 = payload.get(1).copied().unwrap_or(b' ');

        let mut entries = SmallVec::new();
        let mut rest = match memchr(SUBFIELD_DELIMITER, payload) {
            Some(pos) => &payload[pos + 1..],
            None => &[][..],
        };
        while let Some((&code, tail)) = rest.split_first() {
            match memchr(SUBFIELD_DELIMITER, tail) {
                Some(end) => {
                    entries.push((code, &tail[..end]));
                    rest = &tail[end + 1..];
                },
                None => {
                    entries.push((code, tail));
                    rest = &[];
                },
            }
        }

        Subfields {
            indicator1,
            indicator2,
            entries,
        }
    }

    /// First indicator.
    #[must_use]
    pub fn indicator1(&self) -> u8 {
        self.indicator1
    }

    /// Second indicator.
    #[must_use]
    pub fn indicator2(&self) -> u8 {
        self.indicator2
    }

    /// Value of the first subfield with `code`.
    #[must_use]
    pub fn first(&self, code: u8) -> Option<&'a [u8]> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, value)| *value)
    }

    /// Values of every subfield with `code`, in payload order.
    pub fn all(&self, code: u8) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.entries
            .iter()
            .filter(move |(c, _)| *c == code)
            .map(|(_, value)| *value)
    }

    /// Whether a subfield with `code` is present.
    #[must_use]
    pub fn has(&self, code: u8) -> bool {
        self.first(code).is_some()
    }

    /// All `(code, value)` pairs in payload order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &'a [u8])> + '_ {
        self.entries.iter().copied()
    }

    /// Number of subfields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no subfields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Record {
    /// First value of subfield `code` in the first `tag` field that has one.
    #[must_use]
    pub fn extract_first_subfield(&self, tag: Tag, code: u8) -> Option<String> {
        self.field_indices(tag).find_map(|index| {
            Subfields::parse(&self.fields[index])
                .first(code)
                .map(|value| String::from_utf8_lossy(value).into_owned())
        })
    }

    /// Every value of any of `codes` in any of the `tags` fields.
    ///
    /// Values come back in record order, and in payload order within a field.
    #[must_use]
    pub fn extract_all_subfields(&self, tags: &[Tag], codes: &[u8]) -> Vec<String> {
        self.iter()
            .filter(|(tag, _)| tags.contains(tag))
            .flat_map(|(_, payload)| {
                Subfields::parse(payload)
                    .iter()
                    .filter(|(code, _)| codes.contains(code))
                    .map(|(_, value)| String::from_utf8_lossy(value).into_owned())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Language of the resource.
    ///
    /// Taken from 008/35-37 when that holds a code, otherwise from the first
    /// 041 $a.
    #[must_use]
    pub fn language_code(&self) -> Option<String> {
        let fixed = self
            .find(Tag::from_bytes(*b"008"))
            .and_then(|index| self.fields[index].get(35..38))
            .filter(|code| code.iter().all(u8::is_ascii_alphabetic));
        if let Some(code) = fixed {
            return Some(String::from_utf8_lossy(code).into_owned());
        }
        self.extract_first_subfield(Tag::from_bytes(*b"041"), b'a')
    }
}
