use blockpress_types::{BlockId, BlockType, ContentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored state of a block: schemas are never persisted, only state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockVariables {
    /// Component state: an object for single-item blocks, an array otherwise.
    #[serde(default)]
    pub components: Value,
    /// Block-wide settings, including `position`.
    #[serde(default)]
    pub block: Value,
}

/// A content block row as the backend stores and returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedContentBlockRow {
    pub id: BlockId,
    pub content_id: ContentId,
    pub position: u32,
    pub block_type: BlockType,
    pub variables: BlockVariables,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row as the client sends it: everything but backend-assigned timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRowDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
    pub content_id: ContentId,
    pub position: u32,
    pub block_type: BlockType,
    pub variables: BlockVariables,
}

impl BlockRowDraft {
    /// Materializes the draft as a stored row with the given id and time.
    pub fn into_row(self, id: BlockId, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> PersistedContentBlockRow {
        PersistedContentBlockRow {
            id,
            content_id: self.content_id,
            position: self.position,
            block_type: self.block_type,
            variables: self.variables,
            created_at,
            updated_at,
        }
    }
}

impl From<&PersistedContentBlockRow> for BlockRowDraft {
    fn from(row: &PersistedContentBlockRow) -> Self {
        Self {
            id: Some(row.id),
            content_id: row.content_id,
            position: row.position,
            block_type: row.block_type.clone(),
            variables: row.variables.clone(),
        }
    }
}
