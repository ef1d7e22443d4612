//! The storage/query layer seen by the reconciliation service.
//!
//! A backend answers queries and mutations with a [`Response`] shaped like a
//! GraphQL response: optional data plus a list of errors. A non-empty error
//! list is a failure even when data is present. Transport-level problems
//! surface as `Err(StorageError)` before any response exists.

use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use blockpress_model::{BlockRowDraft, PersistedContentBlockRow};
use blockpress_types::{BlockId, ContentId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code for a mutation that targets a row that does not exist.
pub const NOT_FOUND: &str = "NOT_FOUND";

/// One entry of a response's error list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ResponseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn not_found(id: BlockId) -> Self {
        Self::new(format!("content block {id} not found")).with_code(NOT_FOUND)
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A backend answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResponseError>,
}

impl<T> Response<T> {
    /// A successful response.
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// A failed response with a single error.
    pub fn error(error: ResponseError) -> Self {
        Self {
            data: None,
            errors: vec![error],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.data.is_some()
    }

    /// Collapses the response into its data, treating any error as failure.
    pub fn into_result(self) -> StorageResult<T> {
        if !self.errors.is_empty() {
            return Err(StorageError::Rejected(self.errors));
        }
        self.data.ok_or(StorageError::EmptyResponse)
    }
}

/// A read against stored blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum BlockQuery {
    /// Every block of one content item, ordered by position.
    ContentBlocks { content_id: ContentId },
}

impl BlockQuery {
    pub fn content_blocks(content_id: ContentId) -> Self {
        BlockQuery::ContentBlocks { content_id }
    }
}

/// A write against stored blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mutation", rename_all = "snake_case")]
pub enum BlockMutation {
    /// Creates rows for every draft in one request. Draft ids are ignored.
    InsertBlocks { drafts: Vec<BlockRowDraft> },
    /// Replaces position, type and variables of an existing row.
    UpdateBlock { id: BlockId, draft: BlockRowDraft },
    /// Removes an existing row.
    DeleteBlock { id: BlockId },
}

impl BlockMutation {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockMutation::InsertBlocks { .. } => "insert",
            BlockMutation::UpdateBlock { .. } => "update",
            BlockMutation::DeleteBlock { .. } => "delete",
        }
    }
}

/// What a successful mutation returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output", content = "data", rename_all = "snake_case")]
pub enum MutationOutput {
    /// Inserted rows, in draft order.
    Inserted(Vec<PersistedContentBlockRow>),
    Updated(PersistedContentBlockRow),
    Deleted(BlockId),
}

/// A store of content block rows.
#[async_trait]
pub trait BlockBackend: Send + Sync {
    /// Runs a read.
    async fn query(&self, query: BlockQuery) -> StorageResult<Response<Vec<PersistedContentBlockRow>>>;

    /// Runs a write.
    async fn mutate(&self, mutation: BlockMutation) -> StorageResult<Response<MutationOutput>>;

    /// Loads every block of `content_id`, ordered by position.
    async fn content_blocks(&self, content_id: ContentId) -> StorageResult<Vec<PersistedContentBlockRow>> {
        self.query(BlockQuery::content_blocks(content_id)).await?.into_result()
    }
}
