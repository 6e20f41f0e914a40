#![no_main]

use libfuzzer_sys::fuzz_target;
use marcio::{validate, MarcReader};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let _ = validate(data);

    let mut reader = MarcReader::new(Cursor::new(data));
    for result in reader.records().take(16) {
        if let Err(e) = result {
            assert!(e.offset().is_some(), "decode error without offset: {e}");
        }
    }
});
