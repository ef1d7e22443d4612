//! Error types for the registry and the codec.

use blockpress_types::{BlockId, BlockType};
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur when registering or looking up block types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No definition is registered for this type.
    #[error("unknown block type: {0}")]
    UnknownBlockType(BlockType),

    /// A definition for this type is already registered.
    #[error("block type already registered: {0}")]
    AlreadyRegistered(BlockType),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding stored blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The block type has no registered schema.
    #[error("cannot decode block {}: unknown block type {block_type}", display_id(.block_id))]
    UnknownBlockType {
        block_id: Option<BlockId>,
        block_type: BlockType,
    },
}

fn display_id(id: &Option<BlockId>) -> String {
    id.map_or_else(|| "(new)".to_string(), |id| id.to_string())
}
