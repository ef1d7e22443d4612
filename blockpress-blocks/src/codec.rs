//! Conversion between edit-time configs and stored rows.
//!
//! Only state is stored. On decode the schema is rebuilt from the block
//! type, stored values are laid over fresh defaults, and the row's id and
//! position are applied. Decode tolerates older and newer stored shapes:
//! missing keys take their defaults, unknown keys are carried along.

use crate::error::{CodecError, CodecResult};
use crate::registry::BlockTypeRegistry;
use blockpress_model::{
    BlockRowDraft, BlockVariables, ComponentPayload, ContentBlockConfig, PersistedContentBlockRow, Schema,
    StateMap,
};
use blockpress_types::{BlockId, BlockType, ContentId};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Key of the position entry inside the stored block JSON.
pub const POSITION_KEY: &str = "position";

/// Prefix of UI-only state keys, which are never stored.
pub const TRANSIENT_PREFIX: char = '_';

/// Bidirectional mapping between [`ContentBlockConfig`] and stored rows.
#[derive(Debug, Clone)]
pub struct BlockConfigCodec {
    registry: Arc<BlockTypeRegistry>,
}

impl BlockConfigCodec {
    pub fn new(registry: Arc<BlockTypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<BlockTypeRegistry> {
        &self.registry
    }

    /// Serializes a block into a row draft for `content_id`.
    ///
    /// The row position is the block state's position; callers reindex the
    /// page before encoding. Keys starting with `_` are stripped at every
    /// depth.
    pub fn encode(&self, config: &ContentBlockConfig, content_id: ContentId) -> BlockRowDraft {
        let components = match &config.components.state {
            ComponentPayload::Single(state) => Value::Object(strip_transient(state)),
            ComponentPayload::Repeated(items) => {
                Value::Array(items.iter().map(|s| Value::Object(strip_transient(s))).collect())
            }
        };

        let mut block = strip_transient(&config.block.state.values);
        block.insert(POSITION_KEY.to_string(), Value::from(config.position()));

        BlockRowDraft {
            id: config.id,
            content_id,
            position: config.position(),
            block_type: config.block_type.clone(),
            variables: BlockVariables {
                components,
                block: Value::Object(block),
            },
        }
    }

    /// Rebuilds a block from a stored row.
    ///
    /// Fails only when the row's block type is not registered.
    pub fn decode(&self, row: &PersistedContentBlockRow) -> CodecResult<ContentBlockConfig> {
        self.decode_parts(Some(row.id), &row.block_type, row.position, &row.variables)
    }

    /// Rebuilds a block from a draft, which may not have an id yet.
    pub fn decode_draft(&self, draft: &BlockRowDraft) -> CodecResult<ContentBlockConfig> {
        self.decode_parts(draft.id, &draft.block_type, draft.position, &draft.variables)
    }

    fn decode_parts(
        &self,
        id: Option<BlockId>,
        block_type: &BlockType,
        position: u32,
        variables: &BlockVariables,
    ) -> CodecResult<ContentBlockConfig> {
        let definition = self
            .registry
            .get(block_type)
            .ok_or_else(|| CodecError::UnknownBlockType {
                block_id: id,
                block_type: block_type.clone(),
            })?;

        let mut config = definition.create(position);
        config.id = id;

        let fields = &config.components.fields;
        let decoded = match (&config.components.state, &variables.components) {
            (ComponentPayload::Repeated(_), Value::Array(items)) => Some(ComponentPayload::Repeated(
                items.iter().map(|item| overlay_item(fields, item, id)).collect(),
            )),
            (ComponentPayload::Repeated(_), Value::Object(map)) => {
                warn!(block_id = ?id, block_type = %block_type, "stored single item for repeated block, wrapping");
                Some(ComponentPayload::Repeated(vec![fields.overlay(map)]))
            }
            (ComponentPayload::Single(_), Value::Object(map)) => Some(ComponentPayload::Single(fields.overlay(map))),
            (ComponentPayload::Single(_), Value::Array(items)) => {
                warn!(block_id = ?id, block_type = %block_type, "stored list for single-item block, keeping first");
                items
                    .iter()
                    .find_map(Value::as_object)
                    .map(|map| ComponentPayload::Single(fields.overlay(map)))
            }
            (_, Value::Null) => {
                debug!(block_id = ?id, "no stored components, using defaults");
                None
            }
            (_, other) => {
                warn!(block_id = ?id, found = json_kind(other), "unexpected stored components, using defaults");
                None
            }
        };
        if let Some(state) = decoded {
            config.components.state = state;
        }

        match &variables.block {
            Value::Object(map) => {
                if let Some(stored_position) = map.get(POSITION_KEY).and_then(Value::as_u64) {
                    if stored_position != u64::from(position) {
                        debug!(block_id = ?id, stored_position, position, "stored block position differs, using row position");
                    }
                }
                let mut values = map.clone();
                values.remove(POSITION_KEY);
                config.block.state.values = config.block.fields.overlay(&values);
            }
            Value::Null => {}
            other => {
                warn!(block_id = ?id, found = json_kind(other), "unexpected stored block settings, using defaults");
            }
        }

        Ok(config)
    }

    /// Decodes a fetched page, ordered by position.
    pub fn decode_all(&self, rows: &[PersistedContentBlockRow]) -> CodecResult<Vec<ContentBlockConfig>> {
        let mut ordered: Vec<&PersistedContentBlockRow> = rows.iter().collect();
        ordered.sort_by_key(|row| (row.position, row.id));
        ordered.into_iter().map(|row| self.decode(row)).collect()
    }
}

fn overlay_item(fields: &Schema, item: &Value, id: Option<BlockId>) -> StateMap {
    match item {
        Value::Object(map) => fields.overlay(map),
        other => {
            warn!(block_id = ?id, found = json_kind(other), "unexpected stored component item, using defaults");
            fields.default_state()
        }
    }
}

/// Copies a state object without UI-only keys.
pub fn strip_transient(state: &StateMap) -> StateMap {
    state
        .iter()
        .filter(|(key, _)| !key.starts_with(TRANSIENT_PREFIX))
        .map(|(key, value)| (key.clone(), strip_value(value)))
        .collect()
}

fn strip_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(strip_transient(map)),
        Value::Array(items) => Value::Array(items.iter().map(strip_value).collect()),
        other => other.clone(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
