//! Common test helpers and utilities shared across the test suite.

use marcio::Record;

/// Assemble a well-formed serialized record from `(tag, payload)` pairs.
///
/// Directory entries are written in the order given, with offsets laid out
/// back to back. The leader is a plain bibliographic monograph leader.
#[allow(dead_code)]
pub fn record_bytes(fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut directory = Vec::new();
    let mut data = Vec::new();
    for (tag, payload) in fields {
        directory.extend_from_slice(tag.as_bytes());
        directory.extend_from_slice(format!("{:04}", payload.len() + 1).as_bytes());
        directory.extend_from_slice(format!("{:05}", data.len()).as_bytes());
        data.extend_from_slice(payload);
        data.push(0x1E);
    }
    directory.push(0x1E);

    let base_address = 24 + directory.len();
    let record_length = base_address + data.len() + 1;

    let mut bytes = format!("{record_length:05}nam a22{base_address:05}   4500").into_bytes();
    bytes.extend_from_slice(&directory);
    bytes.extend_from_slice(&data);
    bytes.push(0x1D);
    bytes
}

/// Decode a record assembled by [`record_bytes`].
#[allow(dead_code)]
pub fn record(fields: &[(&str, &[u8])]) -> Record {
    Record::from_bytes(&record_bytes(fields)).expect("helper builds valid records")
}

/// A realistic book record with control, data and local fields.
#[allow(dead_code)]
pub fn book_record_bytes(control_number: &str) -> Vec<u8> {
    record_bytes(&[
        ("001", control_number.as_bytes()),
        ("008", b"850101s1985    gw            000 0 ger d"),
        ("100", b"1 \x1FaFitzgerald, F. Scott,\x1Fd1896-1940."),
        ("245", b"14\x1FaThe Great Gatsby /\x1FcF. Scott Fitzgerald."),
        ("260", b"  \x1FaNew York :\x1FbScribner,\x1Fc1925."),
        ("650", b" 0\x1FaRich people\x1FzNew York (State)\x1FvFiction."),
        ("LOK", b"  \x1F0000\x1Fa1"),
        ("LOK", b"  \x1F0852  \x1FaDE-21\x1FcMagazin"),
    ])
}

/// Route `tracing` output from the library into the test harness.
///
/// Honors `RUST_LOG`; safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marcio=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
