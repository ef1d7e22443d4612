//! The reconciliation service.
//!
//! Applies a [`ReconcilePlan`] on a [`BlockBackend`]: one bulk insert, one
//! update per kept block and one delete per removed block. The three groups
//! run concurrently and every request is awaited, so a failure in one never
//! cancels another. Nothing is rolled back.

use crate::config::ReconcileConfig;
use crate::error::{BlockValidationFailure, PersistError, ReconcileError, ReconcileResult};
use crate::plan::{PlannedInsert, PlannedUpdate, ReconcilePlan};
use crate::report::{GroupReport, OperationFailure, OperationKind, ReconcileReport};
use blockpress_blocks::BlockConfigCodec;
use blockpress_model::{validate, ContentBlockConfig, PersistedContentBlockRow};
use blockpress_storage::{BlockBackend, BlockMutation, MutationOutput, StorageError};
use blockpress_types::{BlockId, BlockKey, ContentId};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Synchronizes edited block lists with a backend.
pub struct ReconciliationService {
    backend: Arc<dyn BlockBackend>,
    codec: BlockConfigCodec,
    config: ReconcileConfig,
    /// Latest request generation per content item.
    generations: Arc<RwLock<HashMap<ContentId, u64>>>,
}

impl ReconciliationService {
    pub fn new(backend: Arc<dyn BlockBackend>, codec: BlockConfigCodec, config: ReconcileConfig) -> Self {
        Self {
            backend,
            codec,
            config,
            generations: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn codec(&self) -> &BlockConfigCodec {
        &self.codec
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Loads the stored rows of `content_id`, ordered by position.
    pub async fn fetch_rows(&self, content_id: ContentId) -> ReconcileResult<Vec<PersistedContentBlockRow>> {
        let request = self.backend.content_blocks(content_id);
        let result = match tokio::time::timeout(self.config.operation_timeout(), request).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::Transport("request timed out".into())),
        };
        result.map_err(|source| {
            warn!(content_id = %content_id, error = %source, "fetching blocks failed");
            ReconcileError::Fetch { content_id, source }
        })
    }

    /// Loads and decodes the canonical block list of `content_id`.
    pub async fn fetch(&self, content_id: ContentId) -> ReconcileResult<Vec<ContentBlockConfig>> {
        let rows = self.fetch_rows(content_id).await?;
        Ok(self.codec.decode_all(&rows)?)
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Diffs `edit_blocks` against `server_rows` without sending anything.
    pub fn plan(
        &self,
        content_id: ContentId,
        server_rows: &[PersistedContentBlockRow],
        edit_blocks: &[ContentBlockConfig],
    ) -> ReconcilePlan {
        ReconcilePlan::build(&self.codec, content_id, server_rows, edit_blocks)
    }

    /// Validates every block, then reconciles.
    ///
    /// Validation can be turned off with
    /// [`ReconcileConfig::validate_before_save`].
    pub async fn save(
        &self,
        content_id: ContentId,
        server_rows: &[PersistedContentBlockRow],
        edit_blocks: &[ContentBlockConfig],
    ) -> ReconcileResult<ReconcileReport> {
        if self.config.validate_before_save {
            let failures = validate_all(edit_blocks);
            if !failures.is_empty() {
                debug!(content_id = %content_id, invalid = failures.len(), "save blocked by validation");
                return Err(ReconcileError::Validation(failures));
            }
        }
        self.reconcile(content_id, server_rows, edit_blocks).await
    }

    /// Diffs and applies the edited list. Does not validate.
    pub async fn reconcile(
        &self,
        content_id: ContentId,
        server_rows: &[PersistedContentBlockRow],
        edit_blocks: &[ContentBlockConfig],
    ) -> ReconcileResult<ReconcileReport> {
        let plan = self.plan(content_id, server_rows, edit_blocks);
        self.execute(plan).await
    }

    /// Applies a plan built earlier.
    ///
    /// Returns the report when every request succeeded, and
    /// [`ReconcileError::Persist`] carrying the same report otherwise.
    pub async fn execute(&self, plan: ReconcilePlan) -> ReconcileResult<ReconcileReport> {
        let content_id = plan.content_id;
        let generation = self.next_generation(content_id).await;
        let mut report = ReconcileReport::new(content_id, generation);
        report.orphaned = plan.orphaned;
        report.duplicates = plan.duplicates;

        let ((inserted, inserted_keys), updated, deleted) = tokio::join!(
            self.run_inserts(content_id, plan.inserts),
            self.run_updates(content_id, plan.updates),
            self.run_deletes(content_id, plan.deletes),
        );
        report.inserted = inserted;
        report.inserted_keys = inserted_keys;
        report.updated = updated;
        report.deleted = deleted;

        if report.is_success() {
            info!(
                content_id = %content_id,
                generation,
                inserted = report.inserted.succeeded.len(),
                updated = report.updated.succeeded.len(),
                deleted = report.deleted.succeeded.len(),
                "blocks reconciled"
            );
            Ok(report)
        } else {
            warn!(
                content_id = %content_id,
                generation,
                failed = report.failure_count(),
                "blocks partially reconciled"
            );
            Err(PersistError { report }.into())
        }
    }

    // ── Generations ──────────────────────────────────────────────

    async fn next_generation(&self, content_id: ContentId) -> u64 {
        let mut generations = self.generations.write().await;
        let generation = generations.entry(content_id).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Latest generation started for `content_id`, zero if none.
    pub async fn current_generation(&self, content_id: ContentId) -> u64 {
        self.generations.read().await.get(&content_id).copied().unwrap_or(0)
    }

    /// Whether no newer reconciliation of the same content has started
    /// since `report` was produced. Callers drop stale reports.
    pub async fn is_current(&self, report: &ReconcileReport) -> bool {
        self.current_generation(report.content_id).await == report.generation
    }

    // ── Operation groups ─────────────────────────────────────────

    /// Sends one mutation, bounded by the operation timeout.
    async fn send(&self, mutation: BlockMutation) -> Result<MutationOutput, String> {
        match tokio::time::timeout(self.config.operation_timeout(), self.backend.mutate(mutation)).await {
            Err(_) => Err(format!("timed out after {} ms", self.config.operation_timeout_ms)),
            Ok(Err(e)) => Err(e.to_string()),
            Ok(Ok(response)) => response.into_result().map_err(|e| e.to_string()),
        }
    }

    async fn run_inserts(
        &self,
        content_id: ContentId,
        inserts: Vec<PlannedInsert>,
    ) -> (GroupReport, HashMap<BlockKey, BlockId>) {
        let mut group = GroupReport::default();
        let mut keys = HashMap::new();
        if inserts.is_empty() {
            return (group, keys);
        }

        let drafts = inserts.iter().map(|insert| insert.draft.clone()).collect();
        let outcome = match self.send(BlockMutation::InsertBlocks { drafts }).await {
            Ok(MutationOutput::Inserted(rows)) if rows.len() == inserts.len() => Ok(rows),
            Ok(MutationOutput::Inserted(rows)) => Err(format!(
                "backend returned {} rows for {} inserted blocks",
                rows.len(),
                inserts.len()
            )),
            Ok(other) => Err(format!("unexpected insert output: {other:?}")),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(rows) => {
                for (insert, row) in inserts.iter().zip(rows) {
                    keys.insert(insert.key, row.id);
                    group.succeeded.push(row.id);
                }
            }
            Err(error) => {
                warn!(content_id = %content_id, operation = "insert", blocks = inserts.len(), %error, "insert failed");
                group.failed = inserts
                    .iter()
                    .map(|insert| OperationFailure {
                        kind: OperationKind::Insert,
                        block_id: None,
                        key: Some(insert.key),
                        position: Some(insert.position),
                        error: error.clone(),
                    })
                    .collect();
            }
        }
        (group, keys)
    }

    async fn run_updates(&self, content_id: ContentId, updates: Vec<PlannedUpdate>) -> GroupReport {
        let outcomes = join_all(updates.into_iter().map(|update| async move {
            let mutation = BlockMutation::UpdateBlock {
                id: update.id,
                draft: update.draft,
            };
            let result = self.send(mutation).await;
            (update.id, update.key, update.position, result)
        }))
        .await;

        let mut group = GroupReport::default();
        for (id, key, position, result) in outcomes {
            match result {
                Ok(_) => group.succeeded.push(id),
                Err(error) => {
                    warn!(content_id = %content_id, block_id = %id, operation = "update", %error, "update failed");
                    group.failed.push(OperationFailure {
                        kind: OperationKind::Update,
                        block_id: Some(id),
                        key: Some(key),
                        position: Some(position),
                        error,
                    });
                }
            }
        }
        group
    }

    async fn run_deletes(&self, content_id: ContentId, deletes: Vec<BlockId>) -> GroupReport {
        let outcomes = join_all(
            deletes
                .into_iter()
                .map(|id| async move { (id, self.send(BlockMutation::DeleteBlock { id }).await) }),
        )
        .await;

        let mut group = GroupReport::default();
        for (id, result) in outcomes {
            match result {
                Ok(_) => group.succeeded.push(id),
                Err(error) => {
                    warn!(content_id = %content_id, block_id = %id, operation = "delete", %error, "delete failed");
                    group.failed.push(OperationFailure {
                        kind: OperationKind::Delete,
                        block_id: Some(id),
                        key: None,
                        position: None,
                        error,
                    });
                }
            }
        }
        group
    }
}

/// Validates every block of an edited list.
pub fn validate_all(edit_blocks: &[ContentBlockConfig]) -> Vec<BlockValidationFailure> {
    edit_blocks
        .iter()
        .enumerate()
        .filter_map(|(index, block)| {
            let report = validate(block);
            (!report.is_valid()).then(|| BlockValidationFailure {
                index,
                key: block.key,
                block_id: block.id,
                block_type: block.block_type.clone(),
                report,
            })
        })
        .collect()
}
