//! In-process backend with fault injection.
//!
//! Keeps rows in memory and records every request it receives. Faults can
//! be armed per operation so tests can exercise partial failure.

use crate::backend::{BlockBackend, BlockMutation, BlockQuery, MutationOutput, Response, ResponseError};
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use blockpress_model::PersistedContentBlockRow;
use blockpress_types::{BlockId, ContentId};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::debug;

/// Which operation a fault applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultTarget {
    /// Every query.
    Query,
    /// Every bulk insert.
    Insert,
    Update(BlockId),
    Delete(BlockId),
}

/// What happens when a targeted operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The backend answers with this error and changes nothing.
    Reject(String),
    /// The request never reaches the backend.
    Unreachable(String),
    /// The backend answers normally after a delay.
    Delay(Duration),
}

/// One request as the backend received it.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    Query(BlockQuery),
    Mutation(BlockMutation),
}

#[derive(Debug, Default)]
struct MemoryState {
    rows: BTreeMap<BlockId, PersistedContentBlockRow>,
    last_id: i64,
    faults: HashMap<FaultTarget, Fault>,
    journal: Vec<JournalEntry>,
}

/// A [`BlockBackend`] that keeps rows in memory.
///
/// Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores rows as they are, keeping their ids and timestamps.
    pub fn seed(&self, rows: impl IntoIterator<Item = PersistedContentBlockRow>) {
        let mut state = self.lock();
        for row in rows {
            state.last_id = state.last_id.max(row.id.get());
            state.rows.insert(row.id, row);
        }
    }

    /// Rows of `content_id`, ordered by position.
    pub fn rows(&self, content_id: ContentId) -> Vec<PersistedContentBlockRow> {
        self.lock().select(content_id)
    }

    pub fn row(&self, id: BlockId) -> Option<PersistedContentBlockRow> {
        self.lock().rows.get(&id).cloned()
    }

    /// Arms a fault. A later fault for the same target replaces it.
    pub fn inject(&self, target: FaultTarget, fault: Fault) {
        self.lock().faults.insert(target, fault);
    }

    /// Shorthand for rejecting a target with a generic message.
    pub fn fail(&self, target: FaultTarget) {
        self.inject(target, Fault::Reject("injected failure".into()));
    }

    pub fn clear_faults(&self) {
        self.lock().faults.clear();
    }

    /// Every request received so far, in arrival order.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.lock().journal.clone()
    }

    /// Mutations received so far, in arrival order.
    pub fn mutations(&self) -> Vec<BlockMutation> {
        self.lock()
            .journal
            .iter()
            .filter_map(|entry| match entry {
                JournalEntry::Mutation(m) => Some(m.clone()),
                JournalEntry::Query(_) => None,
            })
            .collect()
    }

    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    /// Records the request and returns the fault armed for it, if any.
    fn receive(&self, entry: JournalEntry, target: FaultTarget) -> Option<Fault> {
        let mut state = self.lock();
        state.journal.push(entry);
        state.faults.get(&target).cloned()
    }

    /// Applies a fault before the request runs. Returns the response to
    /// give instead of running it, if the fault replaces the answer.
    async fn apply_fault<T>(fault: Option<Fault>) -> StorageResult<Option<Response<T>>> {
        match fault {
            None => Ok(None),
            Some(Fault::Delay(delay)) => {
                tokio::time::sleep(delay).await;
                Ok(None)
            }
            Some(Fault::Reject(message)) => Ok(Some(Response::error(ResponseError::new(message)))),
            Some(Fault::Unreachable(message)) => Err(StorageError::Transport(message)),
        }
    }
}

impl MemoryState {
    fn select(&self, content_id: ContentId) -> Vec<PersistedContentBlockRow> {
        let mut rows: Vec<_> = self
            .rows
            .values()
            .filter(|row| row.content_id == content_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| (row.position, row.id));
        rows
    }

    fn apply(&mut self, mutation: BlockMutation) -> Response<MutationOutput> {
        let now = Utc::now();
        match mutation {
            BlockMutation::InsertBlocks { drafts } => {
                let mut inserted = Vec::with_capacity(drafts.len());
                for draft in drafts {
                    self.last_id += 1;
                    let row = draft.into_row(BlockId::new(self.last_id), now, now);
                    self.rows.insert(row.id, row.clone());
                    inserted.push(row);
                }
                Response::ok(MutationOutput::Inserted(inserted))
            }
            BlockMutation::UpdateBlock { id, draft } => match self.rows.get_mut(&id) {
                Some(row) => {
                    row.position = draft.position;
                    row.block_type = draft.block_type;
                    row.variables = draft.variables;
                    row.updated_at = now;
                    Response::ok(MutationOutput::Updated(row.clone()))
                }
                None => Response::error(ResponseError::not_found(id)),
            },
            BlockMutation::DeleteBlock { id } => match self.rows.remove(&id) {
                Some(_) => Response::ok(MutationOutput::Deleted(id)),
                None => Response::error(ResponseError::not_found(id)),
            },
        }
    }
}

#[async_trait]
impl BlockBackend for MemoryBackend {
    async fn query(&self, query: BlockQuery) -> StorageResult<Response<Vec<PersistedContentBlockRow>>> {
        let fault = self.receive(JournalEntry::Query(query), FaultTarget::Query);
        if let Some(response) = Self::apply_fault(fault).await? {
            return Ok(response);
        }
        let BlockQuery::ContentBlocks { content_id } = query;
        Ok(Response::ok(self.lock().select(content_id)))
    }

    async fn mutate(&self, mutation: BlockMutation) -> StorageResult<Response<MutationOutput>> {
        let target = match &mutation {
            BlockMutation::InsertBlocks { .. } => FaultTarget::Insert,
            BlockMutation::UpdateBlock { id, .. } => FaultTarget::Update(*id),
            BlockMutation::DeleteBlock { id } => FaultTarget::Delete(*id),
        };
        let fault = self.receive(JournalEntry::Mutation(mutation.clone()), target);
        if let Some(response) = Self::apply_fault(fault).await? {
            debug!(operation = mutation.kind(), "memory backend rejected mutation");
            return Ok(response);
        }
        Ok(self.lock().apply(mutation))
    }
}
