//! Core type definitions for Blockpress.
//!
//! This crate defines the small, storage-agnostic types shared by every
//! other crate in the workspace:
//! - Row and page identifiers assigned by the backend ([`BlockId`], [`ContentId`])
//! - User-group identifiers used for block visibility ([`UserGroupId`])
//! - Client-side block identity for unsaved blocks ([`BlockKey`], UUID v7)
//! - The [`BlockType`] discriminator
//!
//! Schemas, state and persistence live in `blockpress-model` and above.

mod block_type;
mod ids;

pub use block_type::BlockType;
pub use ids::{BlockId, BlockKey, ContentId, UserGroupId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid numeric id: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("empty block type name")]
    EmptyBlockType,
}
