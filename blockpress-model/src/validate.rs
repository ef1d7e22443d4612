//! Save-time validation of block state against its schema.
//!
//! [`validate`] is a pure function of the block's schema and state. It
//! never mutates the block and returns errors in a deterministic order, so
//! validating the same state twice yields the same report.

use crate::config::{ComponentPayload, ContentBlockConfig};
use crate::field::Editor;
use crate::messages;
use crate::schema::Schema;
use crate::StateMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a block, e.g. `components[2].title`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn root(key: &str) -> Self {
        Self {
            segments: vec![PathSegment::Key(key.to_string())],
        }
    }

    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Key(key.to_string()));
        path
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut path = self.clone();
        path.segments.push(PathSegment::Index(index));
        path
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Index of the repeated component item this path points into, if any.
    pub fn component_index(&self) -> Option<usize> {
        match self.segments.as_slice() {
            [PathSegment::Key(section), PathSegment::Index(i), ..] if section == "components" => Some(*i),
            _ => None,
        }
    }

    /// The last key of the path.
    pub fn field(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|s| match s {
            PathSegment::Key(k) => Some(k.as_str()),
            PathSegment::Index(_) => None,
        })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Field-keyed validation errors of one block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: BTreeMap<FieldPath, Vec<String>>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of paths with at least one error.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, Vec<String>> {
        &self.errors
    }

    /// Messages recorded for the path that displays as `path`.
    pub fn messages(&self, path: &str) -> Option<&[String]> {
        self.errors
            .iter()
            .find(|(p, _)| p.to_string() == path)
            .map(|(_, m)| m.as_slice())
    }

    /// Errors attached to one repeated component item.
    pub fn for_component(&self, index: usize) -> impl Iterator<Item = (&FieldPath, &Vec<String>)> {
        self.errors
            .iter()
            .filter(move |(path, _)| path.component_index() == Some(index))
    }

    fn record(&mut self, path: FieldPath, messages: Vec<String>) {
        if !messages.is_empty() {
            self.errors.entry(path).or_default().extend(messages);
        }
    }
}

/// Validates a block's component and block state against its schemas.
///
/// Repeated component items are validated independently and keep their
/// index in the error path. Cardinality violations of the component list
/// are recorded under `components`. Fields with waived validation never
/// produce errors.
pub fn validate(config: &ContentBlockConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    let components = FieldPath::root("components");

    match &config.components.state {
        ComponentPayload::Single(state) => {
            validate_state(&config.components.fields, state, &components, &mut report);
        }
        ComponentPayload::Repeated(items) => {
            if let Some(limits) = config.components.limits {
                if items.len() < limits.min {
                    report.record(components.clone(), vec![messages::MIN_ITEMS.to_string()]);
                } else if items.len() > limits.max {
                    report.record(components.clone(), vec![messages::MAX_ITEMS.to_string()]);
                }
            }
            for (index, state) in items.iter().enumerate() {
                validate_state(&config.components.fields, state, &components.index(index), &mut report);
            }
        }
    }

    validate_state(
        &config.block.fields,
        &config.block.state.values,
        &FieldPath::root("block"),
        &mut report,
    );
    report
}

/// Whether the component count satisfies the declared limits.
pub fn cardinality_ok(config: &ContentBlockConfig) -> bool {
    match (&config.components.state, config.components.limits) {
        (ComponentPayload::Repeated(items), Some(limits)) => limits.contains(items.len()),
        _ => true,
    }
}

fn validate_state(schema: &Schema, state: &StateMap, base: &FieldPath, report: &mut ValidationReport) {
    for field in schema {
        let value = state.get(&field.key).unwrap_or(&Value::Null);
        let path = base.key(&field.key);
        report.record(path.clone(), field.check(value));

        if !field.has_validator() {
            continue;
        }
        if let (Editor::FieldGroup(group), Value::Array(items)) = (&field.editor, value) {
            for (index, item) in items.iter().enumerate() {
                if let Value::Object(item) = item {
                    validate_state(&group.fields, item, &path.index(index), report);
                }
            }
        }
    }
}
