#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Modules
//!
//! - [`leader`] - The 24-byte record header
//! - [`directory`] - Tags and 12-byte directory entries
//! - [`record`] - The decoded record (`Record`)
//! - [`reader`] - Decoding records from byte streams
//! - [`writer`] - Encoding records to bytes and streams
//! - [`record_validation`] - Structural validation of serialized records
//! - [`field_mutator`] - Ordered field insertion and payload replacement
//! - [`local_block`] - Locating institution-local (`LOK`) field blocks
//! - [`subfields`] - Read-only indicator and subfield access
//! - [`json`] - JSON view of decoded records
//! - [`error`] - Error types and result type

pub mod directory;
pub mod error;
pub mod field_mutator;
pub mod json;
pub mod leader;
pub mod local_block;
pub mod reader;
/// Core record structure (`Record`)
pub mod record;
pub mod record_validation;
pub mod subfields;
pub mod writer;

#[cfg(test)]
mod test_support;

pub use directory::{DirectoryEntry, Tag};
pub use error::{MarcError, Result};
pub use json::record_to_json;
pub use leader::Leader;
pub use local_block::{find_blocks, find_in_block};
pub use reader::{MarcReader, Records};
pub use record::Record;
pub use record_validation::validate;
pub use subfields::Subfields;
pub use writer::{encode, MarcWriter};
