//! The block type registry.
//!
//! Built once at startup, then shared read-only (typically behind an
//! `Arc`) by the codec, the reconciliation service and the editor.

use crate::blocks;
use crate::error::{RegistryError, RegistryResult};
use blockpress_model::{ContentBlockConfig, Limits};
use blockpress_types::BlockType;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Produces the default configuration of a block at a page position.
pub type BlockFactory = Arc<dyn Fn(u32) -> ContentBlockConfig + Send + Sync>;

/// Everything the registry knows about one block type.
#[derive(Clone)]
pub struct BlockDefinition {
    block_type: BlockType,
    name: String,
    limits: Option<Limits>,
    factory: BlockFactory,
}

impl BlockDefinition {
    /// Creates a definition. The factory must be pure: the same position
    /// always yields an equal configuration.
    pub fn new<F>(block_type: BlockType, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(u32) -> ContentBlockConfig + Send + Sync + 'static,
    {
        let limits = factory(0).components.limits;
        Self {
            block_type,
            name: name.into(),
            limits,
            factory: Arc::new(factory),
        }
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    /// i18n key of the block's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cardinality of the component list, for repeated block types.
    pub fn limits(&self) -> Option<Limits> {
        self.limits
    }

    /// A fresh default configuration at `position`.
    pub fn create(&self, position: u32) -> ContentBlockConfig {
        (self.factory)(position)
    }
}

impl fmt::Debug for BlockDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDefinition")
            .field("block_type", &self.block_type)
            .field("name", &self.name)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Maps each [`BlockType`] to its definition.
#[derive(Debug, Default, Clone)]
pub struct BlockTypeRegistry {
    definitions: HashMap<BlockType, BlockDefinition>,
    /// Registration order, used for listing.
    order: Vec<BlockType>,
}

impl BlockTypeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in block type.
    pub fn with_builtin_blocks() -> Self {
        let mut registry = Self::new();
        for definition in blocks::builtin_definitions() {
            let registered = registry.register(definition);
            debug_assert!(registered.is_ok(), "built-in block types must be distinct: {registered:?}");
        }
        registry
    }

    /// Adds a definition. Registering the same type twice is an error.
    pub fn register(&mut self, definition: BlockDefinition) -> RegistryResult<()> {
        let block_type = definition.block_type.clone();
        if self.definitions.contains_key(&block_type) {
            return Err(RegistryError::AlreadyRegistered(block_type));
        }
        debug!(block_type = %block_type, "block type registered");
        self.order.push(block_type.clone());
        self.definitions.insert(block_type, definition);
        Ok(())
    }

    pub fn get(&self, block_type: &BlockType) -> Option<&BlockDefinition> {
        self.definitions.get(block_type)
    }

    pub fn contains(&self, block_type: &BlockType) -> bool {
        self.definitions.contains_key(block_type)
    }

    /// A fresh default configuration of `block_type` at `position`.
    pub fn create(&self, block_type: &BlockType, position: u32) -> RegistryResult<ContentBlockConfig> {
        self.get(block_type)
            .map(|definition| definition.create(position))
            .ok_or_else(|| RegistryError::UnknownBlockType(block_type.clone()))
    }

    /// Registered types in registration order.
    pub fn types(&self) -> impl Iterator<Item = &BlockType> {
        self.order.iter()
    }

    /// Registered definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &BlockDefinition> {
        self.order.iter().filter_map(|t| self.definitions.get(t))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
