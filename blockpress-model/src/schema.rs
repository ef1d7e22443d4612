use crate::field::FieldDescriptor;
use crate::StateMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// The ordered field declarations of one state object.
///
/// A schema is the single source for both the editor form and the default
/// state: [`Schema::default_state`] yields exactly one entry per field, so a
/// state built from a schema always has the schema's key set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The set of field keys.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }

    /// A state object holding every field's default value.
    pub fn default_state(&self) -> StateMap {
        self.fields
            .iter()
            .map(|f| (f.key.clone(), f.default_value()))
            .collect()
    }

    /// Fills keys missing from `stored` with their defaults.
    ///
    /// Keys present in `stored` win, including ones this schema does not
    /// declare, so that data written by a newer schema survives a round trip
    /// through an older one. Nested group items are filled the same way.
    pub fn overlay(&self, stored: &StateMap) -> StateMap {
        let mut state = stored.clone();
        for field in &self.fields {
            match state.get_mut(&field.key) {
                None => {
                    state.insert(field.key.clone(), field.default_value());
                }
                Some(Value::Array(items)) => {
                    if let crate::Editor::FieldGroup(group) = &field.editor {
                        for item in items.iter_mut() {
                            if let Value::Object(map) = item {
                                *map = group.fields.overlay(map);
                            }
                        }
                    }
                }
                Some(_) => {}
            }
        }
        state
    }
}

impl FromIterator<FieldDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldDescriptor;
    type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// Inclusive cardinality bounds of a repeated payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    pub min: usize,
    pub max: usize,
}

impl Limits {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Exactly `n` items.
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub const fn contains(&self, len: usize) -> bool {
        self.min <= len && len <= self.max
    }

    /// Number of items a new block starts with: the minimum, but at least one.
    pub const fn initial_count(&self) -> usize {
        if self.min == 0 { 1 } else { self.min }
    }
}
