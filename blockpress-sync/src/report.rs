//! Per-operation outcome of a reconciliation.

use blockpress_types::{BlockId, BlockKey, ContentId};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// The kind of backend mutation an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationKind::Insert => "insert",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        })
    }
}

/// One block that was not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationFailure {
    pub kind: OperationKind,
    /// Absent for inserts, which have no id yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
    /// Present for inserts and updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<BlockKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    pub error: String,
}

/// Outcome of one operation group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Ids written (or removed) successfully.
    pub succeeded: Vec<BlockId>,
    pub failed: Vec<OperationFailure>,
}

impl GroupReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of a reconciliation, successful or not.
///
/// A reconciliation is not atomic: some groups may have been applied while
/// others failed. After any failure, refetch before planning again; a bulk
/// insert is not idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub content_id: ContentId,
    /// Per-content sequence number of the request that produced this report.
    pub generation: u64,
    pub inserted: GroupReport,
    pub updated: GroupReport,
    pub deleted: GroupReport,
    /// Ids assigned to inserted blocks, by the client key of the block.
    pub inserted_keys: HashMap<BlockKey, BlockId>,
    pub orphaned: Vec<BlockId>,
    pub duplicates: Vec<BlockId>,
}

impl ReconcileReport {
    pub(crate) fn new(content_id: ContentId, generation: u64) -> Self {
        Self {
            content_id,
            generation,
            inserted: GroupReport::default(),
            updated: GroupReport::default(),
            deleted: GroupReport::default(),
            inserted_keys: HashMap::new(),
            orphaned: Vec::new(),
            duplicates: Vec::new(),
        }
    }

    /// Whether every sent operation succeeded.
    pub fn is_success(&self) -> bool {
        self.inserted.is_success() && self.updated.is_success() && self.deleted.is_success()
    }

    pub fn failures(&self) -> impl Iterator<Item = &OperationFailure> {
        self.inserted
            .failed
            .iter()
            .chain(&self.updated.failed)
            .chain(&self.deleted.failed)
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Id the backend assigned to the block with `key`, if it was inserted.
    pub fn inserted_id(&self, key: BlockKey) -> Option<BlockId> {
        self.inserted_keys.get(&key).copied()
    }
}
