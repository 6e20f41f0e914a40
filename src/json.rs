//! JSON rendering of decoded records.
//!
//! Downstream tools that index or ship records as JSON work from the decoded
//! record, never from the byte layout. [`record_to_json`] produces:
//!
//! ```json
//! {
//!   "leader": "00069nam a2200049   4500",
//!   "fields": [
//!     { "tag": "001", "value": "ctl01" },
//!     { "tag": "245", "ind1": "1", "ind2": "0", "subfields": [["a", "Title"]] }
//!   ]
//! }
//! ```
//!
//! Control fields (`00x`) keep their payload as a single value; everything
//! else is split into indicators and subfields. Bytes that are not valid
//! UTF-8 are replaced.

use crate::record::Record;
use crate::subfields::Subfields;
use serde_json::{json, Value};

/// Convert a record to JSON.
#[must_use]
pub fn record_to_json(record: &Record) -> Value {
    let fields: Vec<Value> = record
        .iter()
        .map(|(tag, payload)| {
            if tag.is_control() {
                return json!({
                    "tag": tag,
                    "value": String::from_utf8_lossy(payload),
                });
            }
            let subfields = Subfields::parse(payload);
            let pairs: Vec<Value> = subfields
                .iter()
                .map(|(code, value)| {
                    json!([
                        String::from_utf8_lossy(&[code]),
                        String::from_utf8_lossy(value)
                    ])
                })
                .collect();
            json!({
                "tag": tag,
                "ind1": String::from_utf8_lossy(&[subfields.indicator1()]),
                "ind2": String::from_utf8_lossy(&[subfields.indicator2()]),
                "subfields": pairs,
            })
        })
        .collect();

    json!({
        "leader": record.leader(),
        "fields": fields,
    })
}
