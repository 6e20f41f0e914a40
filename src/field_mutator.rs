//! In-place field insertion and replacement.
//!
//! Both operations keep the leader's record length and base address in step
//! with the fields so that [`Record::leader`] describes the record that
//! [`encode`](crate::writer::encode) is about to produce. Directory offsets
//! are a different matter: they are advisory, `update_field` never touches
//! them, and `encode` recomputes all of them anyway.

use crate::directory::{DirectoryEntry, Tag, DIRECTORY_ENTRY_LENGTH, MAX_FIELD_LENGTH};
use crate::error::{MarcError, Result};
use crate::leader::MAX_RECORD_LENGTH;
use crate::record::Record;
use tracing::debug;

impl Record {
    /// Insert a field, keeping the directory in ascending tag order.
    ///
    /// The new field goes after every existing field whose tag is less than
    /// or equal to `tag`, so repeated tags stay in insertion order.
    ///
    /// When the new tag sorts after every existing tag, the new entry's
    /// stored offset is copied from the previous last entry without adding
    /// that entry's length. The value is advisory and `encode` rewrites it.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the record untouched, if the field is too
    /// long for the 4-digit length slot or the record would grow past 99999
    /// bytes.
    ///
    /// # Panics
    ///
    /// Panics if the record has no fields. Records are never built from
    /// nothing; seed a minimal record first, normally one holding just a
    /// control number field. Any existing field satisfies the check, so a
    /// record without a 001 accepts inserts, including a 001 itself.
    pub fn insert_field(&mut self, tag: Tag, contents: impl Into<Vec<u8>>) -> Result<()> {
        assert!(
            !self.directory.is_empty(),
            "cannot insert field {tag} into a record without fields"
        );

        let contents = contents.into();
        let field_length = contents.len() + 1;
        if field_length > MAX_FIELD_LENGTH {
            return Err(MarcError::InvalidField(format!(
                "Field {tag} length {field_length} exceeds {MAX_FIELD_LENGTH}"
            )));
        }
        let record_length = self.leader.record_length() + field_length + DIRECTORY_ENTRY_LENGTH;
        if record_length > MAX_RECORD_LENGTH {
            return Err(MarcError::RecordTooLong(record_length));
        }
        let base_address = self.leader.base_address_of_data() + DIRECTORY_ENTRY_LENGTH;

        self.leader.set_record_length(record_length)?;
        self.leader.set_base_address_of_data(base_address)?;

        let index = match self.directory.iter().position(|entry| entry.tag() > tag) {
            Some(index) => {
                for entry in &mut self.directory[index..] {
                    entry.set_field_offset(entry.field_offset() + field_length);
                }
                let offset = index.checked_sub(1).map_or(0, |prev| {
                    let prev = &self.directory[prev];
                    prev.field_offset() + prev.field_length()
                });
                self.directory
                    .insert(index, DirectoryEntry::unchecked(tag, field_length, offset));
                self.fields.insert(index, contents);
                index
            },
            None => {
                let offset = self.directory.last().map_or(0, DirectoryEntry::field_offset);
                self.directory
                    .push(DirectoryEntry::unchecked(tag, field_length, offset));
                self.fields.push(contents);
                self.fields.len() - 1
            },
        };

        debug!(%tag, index, field_length, record_length, "inserted field");
        Ok(())
    }

    /// Replace the payload of the field at `index`.
    ///
    /// Adjusts the record length and the entry's field length. Stored
    /// offsets of this and later entries are left stale.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the record untouched, if the new payload is
    /// too long for the 4-digit length slot or the record would grow past
    /// 99999 bytes.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update_field(&mut self, index: usize, contents: impl Into<Vec<u8>>) -> Result<()> {
        assert!(
            index < self.fields.len(),
            "field index {index} out of range for a record with {} fields",
            self.fields.len()
        );

        let contents = contents.into();
        let field_length = contents.len() + 1;
        if field_length > MAX_FIELD_LENGTH {
            return Err(MarcError::InvalidField(format!(
                "Field {} length {field_length} exceeds {MAX_FIELD_LENGTH}",
                self.directory[index].tag()
            )));
        }
        let record_length =
            (self.leader.record_length() + contents.len()).saturating_sub(self.fields[index].len());
        self.leader.set_record_length(record_length)?;

        self.directory[index].set_field_length(field_length);
        self.fields[index] = contents;

        debug!(
            tag = %self.directory[index].tag(),
            index,
            field_length,
            record_length,
            "updated field"
        );
        Ok(())
    }
}
