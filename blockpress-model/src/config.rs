use crate::schema::{Limits, Schema};
use crate::{ModelError, ModelResult, StateMap};
use blockpress_types::{BlockId, BlockKey, BlockType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Component state of a block: one item, or an ordered list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentPayload {
    Repeated(Vec<StateMap>),
    Single(StateMap),
}

impl ComponentPayload {
    pub fn len(&self) -> usize {
        match self {
            ComponentPayload::Repeated(items) => items.len(),
            ComponentPayload::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, ComponentPayload::Repeated(_))
    }

    pub fn get(&self, index: usize) -> Option<&StateMap> {
        match self {
            ComponentPayload::Repeated(items) => items.get(index),
            ComponentPayload::Single(state) => (index == 0).then_some(state),
        }
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut StateMap> {
        match self {
            ComponentPayload::Repeated(items) => items.get_mut(index),
            ComponentPayload::Single(state) => (index == 0).then_some(state),
        }
    }

    /// Iterates items, a single payload yielding exactly one.
    pub fn items(&self) -> Box<dyn Iterator<Item = &StateMap> + '_> {
        match self {
            ComponentPayload::Repeated(items) => Box::new(items.iter()),
            ComponentPayload::Single(state) => Box::new(std::iter::once(state)),
        }
    }
}

/// The body of a block: component state plus the schema of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    pub state: ComponentPayload,
    pub fields: Schema,
    /// Cardinality bounds; only repeated payloads declare them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
}

impl Components {
    /// A single-item body with default state.
    pub fn single(fields: Schema) -> Self {
        Self {
            state: ComponentPayload::Single(fields.default_state()),
            fields,
            limits: None,
        }
    }

    /// A repeated body starting with [`Limits::initial_count`] default items.
    pub fn repeated(fields: Schema, limits: Limits) -> Self {
        let items = (0..limits.initial_count())
            .map(|_| fields.default_state())
            .collect();
        Self {
            state: ComponentPayload::Repeated(items),
            fields,
            limits: Some(limits),
        }
    }
}

/// Block-wide settings. `position` is kept apart from the editable values
/// because it is owned by the page ordering, not by a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockState {
    pub position: u32,
    #[serde(flatten)]
    pub values: StateMap,
}

/// Block-wide settings plus their schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSection {
    pub state: BlockState,
    pub fields: Schema,
}

impl BlockSection {
    pub fn new(fields: Schema, position: u32) -> Self {
        Self {
            state: BlockState {
                position,
                values: fields.default_state(),
            },
            fields,
        }
    }
}

/// Edit-time aggregate of one block.
///
/// `id` is set only once the block has been persisted. `key` identifies
/// the block within the edit session and is ignored by equality, so a
/// decoded block equals the block it was encoded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
    #[serde(default)]
    pub key: BlockKey,
    pub block_type: BlockType,
    /// i18n key of the block's display name.
    pub name: String,
    pub components: Components,
    pub block: BlockSection,
}

impl PartialEq for ContentBlockConfig {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.block_type == other.block_type
            && self.name == other.name
            && self.components == other.components
            && self.block == other.block
    }
}

impl ContentBlockConfig {
    pub fn new(block_type: BlockType, name: impl Into<String>, components: Components, block: BlockSection) -> Self {
        Self {
            id: None,
            key: BlockKey::new(),
            block_type,
            name: name.into(),
            components,
            block,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn position(&self) -> u32 {
        self.block.state.position
    }

    pub fn set_position(&mut self, position: u32) {
        self.block.state.position = position;
    }

    pub fn component_count(&self) -> usize {
        self.components.state.len()
    }

    pub fn component(&self, index: usize) -> Option<&StateMap> {
        self.components.state.get(index)
    }

    /// Reads one component value.
    pub fn component_value(&self, index: usize, key: &str) -> Option<&Value> {
        self.component(index).and_then(|state| state.get(key))
    }

    /// Reads one block setting.
    pub fn block_value(&self, key: &str) -> Option<&Value> {
        self.block.state.values.get(key)
    }

    /// Sets a component field. The key must be declared by the schema.
    pub fn set_component_value(&mut self, index: usize, key: &str, value: Value) -> ModelResult<()> {
        if !self.components.fields.contains(key) {
            return Err(ModelError::UnknownField(key.to_string()));
        }
        let len = self.components.state.len();
        let state = self
            .components
            .state
            .get_mut(index)
            .ok_or(ModelError::IndexOutOfRange { index, len })?;
        state.insert(key.to_string(), value);
        Ok(())
    }

    /// Sets a block setting. The key must be declared by the schema.
    pub fn set_block_value(&mut self, key: &str, value: Value) -> ModelResult<()> {
        if !self.block.fields.contains(key) {
            return Err(ModelError::UnknownField(key.to_string()));
        }
        self.block.state.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Appends a default item to a repeated body and returns its index.
    pub fn push_component(&mut self) -> ModelResult<usize> {
        let default = self.components.fields.default_state();
        let limits = self.components.limits;
        let ComponentPayload::Repeated(items) = &mut self.components.state else {
            return Err(ModelError::NotRepeated);
        };
        if let Some(limits) = limits {
            if items.len() >= limits.max {
                return Err(ModelError::LimitReached { max: limits.max });
            }
        }
        items.push(default);
        Ok(items.len() - 1)
    }

    /// Removes an item from a repeated body.
    pub fn remove_component(&mut self, index: usize) -> ModelResult<StateMap> {
        let limits = self.components.limits;
        let ComponentPayload::Repeated(items) = &mut self.components.state else {
            return Err(ModelError::NotRepeated);
        };
        if index >= items.len() {
            return Err(ModelError::IndexOutOfRange { index, len: items.len() });
        }
        if let Some(limits) = limits {
            if items.len() <= limits.min {
                return Err(ModelError::BelowMinimum { min: limits.min });
            }
        }
        Ok(items.remove(index))
    }

    /// Moves an item within a repeated body.
    pub fn move_component(&mut self, from: usize, to: usize) -> ModelResult<()> {
        let ComponentPayload::Repeated(items) = &mut self.components.state else {
            return Err(ModelError::NotRepeated);
        };
        let len = items.len();
        for index in [from, to] {
            if index >= len {
                return Err(ModelError::IndexOutOfRange { index, len });
            }
        }
        let item = items.remove(from);
        items.insert(to, item);
        Ok(())
    }

    /// A copy that will be inserted as a new block on the next save.
    pub fn duplicate(&self) -> Self {
        Self {
            id: None,
            key: BlockKey::new(),
            ..self.clone()
        }
    }
}

// ── Page-level list helpers ──────────────────────────────────────

/// Rewrites positions to the dense `0..n-1` order of the slice.
pub fn reindex_positions(blocks: &mut [ContentBlockConfig]) {
    for (index, block) in blocks.iter_mut().enumerate() {
        block.set_position(index as u32);
    }
}

/// Moves a block within the page and reindexes every position.
pub fn move_block(blocks: &mut Vec<ContentBlockConfig>, from: usize, to: usize) -> ModelResult<()> {
    let len = blocks.len();
    for index in [from, to] {
        if index >= len {
            return Err(ModelError::IndexOutOfRange { index, len });
        }
    }
    let block = blocks.remove(from);
    blocks.insert(to, block);
    reindex_positions(blocks);
    Ok(())
}

/// Whether positions already form the dense `0..n-1` sequence.
pub fn positions_are_dense(blocks: &[ContentBlockConfig]) -> bool {
    let mut positions: Vec<u32> = blocks.iter().map(ContentBlockConfig::position).collect();
    positions.sort_unstable();
    positions.iter().enumerate().all(|(i, p)| *p as usize == i)
}
