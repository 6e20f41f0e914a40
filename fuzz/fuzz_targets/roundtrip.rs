#![no_main]

use libfuzzer_sys::fuzz_target;
use marcio::{encode, validate, Record};

fuzz_target!(|data: &[u8]| {
    let Ok(record) = Record::from_bytes(data) else {
        return;
    };
    let Ok(encoded) = encode(&record) else {
        return;
    };

    // whatever the decoder accepts, the encoder must turn into a valid record
    // that decodes back to the same fields
    if let Err(e) = validate(&encoded) {
        panic!("encoded record failed validation: {e}");
    }
    let reparsed = Record::from_bytes(&encoded).expect("encoded record decodes");
    assert_eq!(reparsed.fields(), record.fields());
    assert_eq!(reparsed.leader().record_length(), encoded.len());
});
