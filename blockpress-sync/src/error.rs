//! Error types for the reconciliation layer.

use crate::report::ReconcileReport;
use blockpress_blocks::CodecError;
use blockpress_model::ValidationReport;
use blockpress_storage::StorageError;
use blockpress_types::{BlockId, BlockKey, BlockType, ContentId};
use thiserror::Error;

/// Result type for reconciliation operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors that can occur while loading or saving a page of blocks.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// At least one block failed validation. Nothing was sent.
    #[error("{} block(s) failed validation", .0.len())]
    Validation(Vec<BlockValidationFailure>),

    /// Loading the canonical block list failed.
    #[error("failed to fetch blocks of content {content_id}: {source}")]
    Fetch {
        content_id: ContentId,
        #[source]
        source: StorageError,
    },

    /// Some mutations were not applied.
    #[error(transparent)]
    Persist(#[from] PersistError),

    /// A fetched row could not be decoded.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Validation errors of one edited block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockValidationFailure {
    /// Index of the block in the edited list.
    pub index: usize,
    pub key: BlockKey,
    pub block_id: Option<BlockId>,
    pub block_type: BlockType,
    pub report: ValidationReport,
}

/// A reconciliation in which at least one operation failed.
///
/// Operations that succeeded stay applied; the report says which.
#[derive(Debug, Clone, Error)]
#[error("{} block operation(s) failed for content {}", .report.failure_count(), .report.content_id)]
pub struct PersistError {
    pub report: ReconcileReport,
}
