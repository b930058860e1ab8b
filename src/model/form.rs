use indexmap::IndexMap;
use unicode_segmentation::UnicodeSegmentation;

use super::record::{Collection, Record};

/// Field values of one editing surface, in display order.
///
/// The form only holds values. Whether a write counts as a user edit is
/// decided by the scope that owns the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub collection: Collection,
    /// `None` while creating a new record
    pub record_id: Option<String>,
    values: IndexMap<&'static str, String>,
    /// Index of the selected field
    pub cursor: usize,
    /// Byte offset of the text cursor in the selected field
    pub edit_cursor: usize,
}

impl FormState {
    /// A form with every field empty
    pub fn empty(collection: Collection, record_id: Option<String>) -> Self {
        let values = collection
            .fields()
            .iter()
            .map(|spec| (spec.key, String::new()))
            .collect();
        FormState {
            collection,
            record_id,
            values,
            cursor: 0,
            edit_cursor: 0,
        }
    }

    /// Values a blank form is pre-populated with
    pub fn defaults(collection: Collection) -> Vec<(&'static str, String)> {
        collection
            .fields()
            .iter()
            .filter(|spec| !spec.default.is_empty())
            .map(|spec| (spec.key, spec.default.to_string()))
            .collect()
    }

    /// Values an edit form is pre-populated with
    pub fn values_of<R: Record>(record: &R) -> Vec<(&'static str, String)> {
        R::FIELDS
            .iter()
            .filter_map(|spec| record.field(spec.key).map(|v| (spec.key, v)))
            .collect()
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", |v| v.as_str())
    }

    /// Write a value. Returns true when the stored value changed.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let is_current = self.current_key() == Some(key);
        match self.values.get_mut(key) {
            Some(slot) if slot.as_str() != value => {
                *slot = value.to_string();
                if is_current {
                    self.edit_cursor = slot.len();
                }
                true
            }
            _ => false,
        }
    }

    pub fn values(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy every field into `record`
    pub fn apply_to<R: Record>(&self, record: &mut R) {
        for (key, value) in &self.values {
            record.set_field(key, value);
        }
    }

    pub fn current_key(&self) -> Option<&'static str> {
        self.values.get_index(self.cursor).map(|(k, _)| *k)
    }

    pub fn current_value(&self) -> &str {
        self.values
            .get_index(self.cursor)
            .map_or("", |(_, v)| v.as_str())
    }

    pub fn next_field(&mut self) {
        if self.cursor + 1 < self.values.len() {
            self.cursor += 1;
        }
        self.edit_cursor = self.current_value().len();
    }

    pub fn prev_field(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.edit_cursor = self.current_value().len();
    }

    /// Insert a character at the text cursor
    pub fn insert_char(&mut self, c: char) {
        let at = self.edit_cursor;
        if let Some((_, value)) = self.values.get_index_mut(self.cursor) {
            let at = at.min(value.len());
            value.insert(at, c);
            self.edit_cursor = at + c.len_utf8();
        }
    }

    /// Delete the grapheme before the text cursor. Returns true if anything
    /// was removed.
    pub fn backspace(&mut self) -> bool {
        let at = self.edit_cursor;
        let Some((_, value)) = self.values.get_index_mut(self.cursor) else {
            return false;
        };
        let at = at.min(value.len());
        match prev_grapheme_start(value, at) {
            Some(start) => {
                value.replace_range(start..at, "");
                self.edit_cursor = start;
                true
            }
            None => false,
        }
    }

    pub fn move_left(&mut self) {
        if let Some(start) = prev_grapheme_start(self.current_value(), self.edit_cursor) {
            self.edit_cursor = start;
        }
    }

    pub fn move_right(&mut self) {
        let value = self.current_value();
        let at = self.edit_cursor.min(value.len());
        if let Some(g) = value[at..].graphemes(true).next() {
            self.edit_cursor = at + g.len();
        }
    }
}

fn prev_grapheme_start(s: &str, at: usize) -> Option<usize> {
    let at = at.min(s.len());
    s[..at]
        .grapheme_indices(true)
        .next_back()
        .map(|(i, _)| i)
}
