//! Property tests for the codec invariants.

mod common;

use common::record_bytes;
use marcio::{validate, MarcError, MarcReader, Record, Tag};
use proptest::prelude::*;
use std::io::Cursor;

#[derive(Debug, Clone)]
enum Edit {
    Insert(String, Vec<u8>),
    Update(usize, Vec<u8>),
}

fn tag_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => "[0-9]{3}",
        1 => Just("LOK".to_string()),
    ]
}

fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(
        any::<u8>().prop_filter("field and record terminators", |b| *b != 0x1E && *b != 0x1D),
        0..64,
    )
}

/// Serialized records with fields in ascending tag order.
fn record_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((tag_strategy(), payload_strategy()), 1..16).prop_map(|mut fields| {
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let borrowed: Vec<(&str, &[u8])> = fields
            .iter()
            .map(|(tag, payload)| (tag.as_str(), payload.as_slice()))
            .collect();
        record_bytes(&borrowed)
    })
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (tag_strategy(), payload_strategy()).prop_map(|(t, p)| Edit::Insert(t, p)),
        (any::<usize>(), payload_strategy()).prop_map(|(i, p)| Edit::Update(i, p)),
    ]
}

fn assert_consistent(record: &Record) -> Result<(), TestCaseError> {
    let encoded = record.to_bytes().map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert_eq!(encoded.len(), record.leader().record_length());
    prop_assert_eq!(
        record.leader().base_address_of_data(),
        24 + 12 * record.len() + 1
    );
    if let Err(e) = validate(&encoded) {
        return Err(TestCaseError::fail(format!("encoded record invalid: {e}")));
    }
    let tags: Vec<Tag> = record.iter().map(|(tag, _)| tag).collect();
    prop_assert!(tags.windows(2).all(|pair| pair[0] <= pair[1]));
    Ok(())
}

proptest! {
    #[test]
    fn prop_encode_inverts_decode(bytes in record_strategy()) {
        validate(&bytes).unwrap();
        let record = Record::from_bytes(&bytes).unwrap();
        prop_assert_eq!(record.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn prop_edits_keep_record_consistent(
        bytes in record_strategy(),
        edits in prop::collection::vec(edit_strategy(), 1..12),
    ) {
        let mut record = Record::from_bytes(&bytes).unwrap();
        for edit in edits {
            match edit {
                Edit::Insert(tag, payload) => {
                    let tag: Tag = tag.parse().unwrap();
                    let before = record.field_indices(tag).count();
                    record.insert_field(tag, payload.clone()).unwrap();
                    let last_of_tag = record.field_indices(tag).last().unwrap();
                    prop_assert_eq!(record.field_indices(tag).count(), before + 1);
                    prop_assert_eq!(record.field(last_of_tag), Some(payload.as_slice()));
                },
                Edit::Update(index, payload) => {
                    let index = index % record.len();
                    record.update_field(index, payload.clone()).unwrap();
                    prop_assert_eq!(record.field(index), Some(payload.as_slice()));
                },
            }
            assert_consistent(&record)?;
        }

        let reparsed = Record::from_bytes(&record.to_bytes().unwrap()).unwrap();
        prop_assert_eq!(reparsed.fields(), record.fields());
    }

    #[test]
    fn prop_truncated_record_is_an_error_at_its_start(
        bytes in record_strategy(),
        cut in any::<prop::sample::Index>(),
    ) {
        let cut = 1 + cut.index(bytes.len() - 1);
        let mut reader = MarcReader::new(Cursor::new(&bytes[..cut]));
        let err = reader.read_record().unwrap_err();
        prop_assert_eq!(err.offset(), Some(0));
        let is_truncated = matches!(err.root(), MarcError::TruncatedRecord(_));
        prop_assert!(is_truncated, "got: {}", err);
    }

    #[test]
    fn prop_decode_and_validate_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = validate(&bytes);
        let mut reader = MarcReader::new(Cursor::new(bytes));
        for result in reader.records().take(8) {
            if let Err(e) = result {
                prop_assert!(e.offset().is_some());
            }
        }
    }
}
