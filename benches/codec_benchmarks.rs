#![allow(missing_docs)]
//! Benchmarks for the marcio codec.
//!
//! Decoding, encoding, validation and in-place editing over synthetic
//! record streams, using Criterion.rs for statistical analysis.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use marcio::{encode, record_to_json, validate, MarcReader, MarcWriter, Record, Tag};
use std::io::Cursor;

/// Build one serialized book record with a distinct control number.
fn book_record(n: usize) -> Vec<u8> {
    let fields: [(&str, Vec<u8>); 8] = [
        ("001", format!("ctl{n:06}").into_bytes()),
        ("008", b"850101s1985    gw            000 0 ger d".to_vec()),
        ("100", b"1 \x1FaFitzgerald, F. Scott,\x1Fd1896-1940.".to_vec()),
        ("245", b"14\x1FaThe Great Gatsby /\x1FcF. Scott Fitzgerald.".to_vec()),
        ("260", b"  \x1FaNew York :\x1FbScribner,\x1Fc1925.".to_vec()),
        ("650", b" 0\x1FaRich people\x1FzNew York (State)\x1FvFiction.".to_vec()),
        ("LOK", b"  \x1F0000\x1Fa1".to_vec()),
        ("LOK", b"  \x1F0852  \x1FaDE-21\x1FcMagazin".to_vec()),
    ];

    let mut directory = Vec::new();
    let mut data = Vec::new();
    for (tag, payload) in &fields {
        directory.extend_from_slice(format!("{tag}{:04}{:05}", payload.len() + 1, data.len()).as_bytes());
        data.extend_from_slice(payload);
        data.push(0x1E);
    }
    directory.push(0x1E);
    let base_address = 24 + directory.len();
    let record_length = base_address + data.len() + 1;

    let mut bytes = format!("{record_length:05}nam a22{base_address:05}   4500").into_bytes();
    bytes.extend(directory);
    bytes.extend(data);
    bytes.push(0x1D);
    bytes
}

fn record_stream(count: usize) -> Vec<u8> {
    (0..count).flat_map(book_record).collect()
}

fn decode_all(stream: &[u8]) -> Vec<Record> {
    let mut reader = MarcReader::new(Cursor::new(stream));
    let mut records = Vec::new();
    while let Ok(Some(record)) = reader.read_record() {
        records.push(record);
    }
    records
}

/// Benchmark decoding 1,000 records.
fn benchmark_decode_1k(c: &mut Criterion) {
    let stream = black_box(record_stream(1_000));

    c.bench_function("decode_1k_records", |b| {
        b.iter(|| decode_all(&stream).len());
    });
}

/// Benchmark encoding 1,000 records.
fn benchmark_encode_1k(c: &mut Criterion) {
    let records = decode_all(&record_stream(1_000));

    c.bench_function("encode_1k_records", |b| {
        b.iter(|| {
            records
                .iter()
                .map(|record| encode(black_box(record)).map_or(0, |bytes| bytes.len()))
                .sum::<usize>()
        });
    });
}

/// Benchmark the writer with and without its validation pass.
fn benchmark_write_1k(c: &mut Criterion) {
    let records = decode_all(&record_stream(1_000));

    for self_check in [true, false] {
        let name = if self_check {
            "write_1k_checked"
        } else {
            "write_1k_unchecked"
        };
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut writer = MarcWriter::new(Vec::new()).with_self_check(self_check);
                for record in &records {
                    let _ = writer.write_record(record);
                }
                writer.into_inner().len()
            });
        });
    }
}

/// Benchmark structural validation of 1,000 records.
fn benchmark_validate_1k(c: &mut Criterion) {
    let records: Vec<Vec<u8>> = (0..1_000).map(book_record).collect();

    c.bench_function("validate_1k_records", |b| {
        b.iter(|| records.iter().filter(|raw| validate(raw).is_ok()).count());
    });
}

/// Benchmark a decode, edit, encode cycle over 1,000 records.
fn benchmark_edit_roundtrip_1k(c: &mut Criterion) {
    let stream = black_box(record_stream(1_000));
    let note = Tag::from_bytes(*b"500");

    c.bench_function("edit_roundtrip_1k", |b| {
        b.iter(|| {
            let mut total = 0;
            for mut record in decode_all(&stream) {
                let _ = record.insert_field(note, b"  \x1FaBenchmark note.".to_vec());
                let _ = record.update_field(0, b"ctl-edited".to_vec());
                total += encode(&record).map_or(0, |bytes| bytes.len());
            }
            total
        });
    });
}

/// Benchmark the JSON view of 1,000 records.
fn benchmark_json_1k(c: &mut Criterion) {
    let records = decode_all(&record_stream(1_000));

    c.bench_function("json_1k_records", |b| {
        b.iter(|| {
            records
                .iter()
                .map(|record| record_to_json(record).to_string().len())
                .sum::<usize>()
        });
    });
}

criterion_group!(
    benches,
    benchmark_decode_1k,
    benchmark_encode_1k,
    benchmark_write_1k,
    benchmark_validate_1k,
    benchmark_edit_roundtrip_1k,
    benchmark_json_1k,
);
criterion_main!(benches);
