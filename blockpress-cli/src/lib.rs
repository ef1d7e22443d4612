//! Commands behind the `blockpress` binary.
//!
//! Each command is a plain function returning a serializable value, so the
//! binary only parses arguments, sets up logging and prints JSON.
//!
//! Edit files are JSON arrays of [`EditEntry`]: the block type, the id of a
//! persisted block (absent for new blocks) and the stored variables. Their
//! order is the page order.

use anyhow::{bail, Context, Result};
use blockpress_blocks::{BlockConfigCodec, BlockTypeRegistry};
use blockpress_model::{BlockRowDraft, BlockVariables, ContentBlockConfig, Limits, Schema, ValidationReport};
use blockpress_storage::{BlockBackend, SqliteBackend};
use blockpress_sync::{
    validate_all, ReconcileConfig, ReconcileError, ReconcilePlan, ReconcileReport, ReconciliationService,
};
use blockpress_types::{BlockId, BlockType, ContentId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Settings read from `--config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub reconcile: ReconcileConfig,
}

/// Loads the config file, or defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))?;
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// The registry of built-in block types.
pub fn builtin_registry() -> Arc<BlockTypeRegistry> {
    Arc::new(BlockTypeRegistry::with_builtin_blocks())
}

// ── Inspection ───────────────────────────────────────────────────

/// One line of `blockpress types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub block_type: BlockType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
}

pub fn type_summaries(registry: &BlockTypeRegistry) -> Vec<TypeSummary> {
    registry
        .definitions()
        .map(|definition| TypeSummary {
            block_type: definition.block_type().clone(),
            name: definition.name().to_string(),
            limits: definition.limits(),
        })
        .collect()
}

/// Output of `blockpress schema <type>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub block_type: BlockType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limits: Option<Limits>,
    pub components: Schema,
    pub block: Schema,
}

pub fn schema_document(registry: &BlockTypeRegistry, block_type: &BlockType) -> Result<SchemaDocument> {
    let block = registry.create(block_type, 0)?;
    Ok(SchemaDocument {
        block_type: block.block_type,
        name: block.name,
        limits: block.components.limits,
        components: block.components.fields,
        block: block.block.fields,
    })
}

// ── Edit files ───────────────────────────────────────────────────

/// One block of an edit file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BlockId>,
    pub block_type: BlockType,
    #[serde(default)]
    pub variables: BlockVariables,
}

/// A default entry of `block_type`, ready to paste into an edit file.
pub fn new_entry(codec: &BlockConfigCodec, block_type: &BlockType, position: u32) -> Result<EditEntry> {
    let block = codec.registry().create(block_type, position)?;
    let draft = codec.encode(&block, ContentId::new(0));
    Ok(EditEntry {
        id: None,
        block_type: draft.block_type,
        variables: draft.variables,
    })
}

pub fn read_edit_file(path: &Path) -> Result<Vec<EditEntry>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read edit file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid edit file {}", path.display()))
}

/// Block position of the edit entry at `index`.
pub fn entry_position(index: usize) -> Result<u32> {
    u32::try_from(index).with_context(|| format!("Edit entry {index} is past the last block position"))
}

/// Decodes edit entries into blocks, positioned in file order.
pub fn decode_entries(codec: &BlockConfigCodec, content_id: ContentId, entries: &[EditEntry]) -> Result<Vec<ContentBlockConfig>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let position = entry_position(index)?;
            let draft = BlockRowDraft {
                id: entry.id,
                content_id,
                position,
                block_type: entry.block_type.clone(),
                variables: entry.variables.clone(),
            };
            codec
                .decode_draft(&draft)
                .with_context(|| format!("Edit entry {index} cannot be decoded"))
        })
        .collect()
}

// ── Validation ───────────────────────────────────────────────────

/// Errors of one invalid block, for printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidBlock {
    pub index: usize,
    pub block_type: BlockType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_id: Option<BlockId>,
    pub errors: ValidationReport,
}

/// Validates every block; an empty result means the page can be saved.
pub fn validate_blocks(blocks: &[ContentBlockConfig]) -> Vec<InvalidBlock> {
    validate_all(blocks)
        .into_iter()
        .map(|failure| InvalidBlock {
            index: failure.index,
            block_type: failure.block_type,
            block_id: failure.block_id,
            errors: failure.report,
        })
        .collect()
}

// ── Storage ──────────────────────────────────────────────────────

/// Opens the SQLite store and wraps it in a reconciliation service.
pub fn open_service(db: &Path, registry: Arc<BlockTypeRegistry>, config: &CliConfig) -> Result<ReconciliationService> {
    let backend: Arc<dyn BlockBackend> =
        Arc::new(SqliteBackend::open(db).with_context(|| format!("Failed to open block store {}", db.display()))?);
    Ok(ReconciliationService::new(
        backend,
        BlockConfigCodec::new(registry),
        config.reconcile.clone(),
    ))
}

/// Diffs an edit file against the stored page without writing.
pub async fn plan_sync(service: &ReconciliationService, content_id: ContentId, entries: &[EditEntry]) -> Result<ReconcilePlan> {
    let blocks = decode_entries(service.codec(), content_id, entries)?;
    let server = service.fetch_rows(content_id).await?;
    Ok(service.plan(content_id, &server, &blocks))
}

/// Result of `blockpress sync`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "report", rename_all = "snake_case")]
pub enum SyncOutcome {
    Complete(ReconcileReport),
    /// Some operations failed; the rest stay applied.
    Partial(ReconcileReport),
}

impl SyncOutcome {
    pub fn report(&self) -> &ReconcileReport {
        match self {
            SyncOutcome::Complete(report) | SyncOutcome::Partial(report) => report,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, SyncOutcome::Complete(_))
    }
}

/// Saves an edit file as the new state of the stored page.
///
/// Invalid blocks abort the save; partially applied saves are returned as
/// [`SyncOutcome::Partial`] rather than as errors so the report can be
/// printed.
pub async fn run_sync(service: &ReconciliationService, content_id: ContentId, entries: &[EditEntry]) -> Result<SyncOutcome> {
    let blocks = decode_entries(service.codec(), content_id, entries)?;
    let server = service.fetch_rows(content_id).await?;
    match service.save(content_id, &server, &blocks).await {
        Ok(report) => {
            info!(content_id = %content_id, generation = report.generation, "page saved");
            Ok(SyncOutcome::Complete(report))
        }
        Err(ReconcileError::Persist(persist)) => Ok(SyncOutcome::Partial(persist.report)),
        Err(ReconcileError::Validation(failures)) => {
            let indexes: Vec<String> = failures.iter().map(|f| f.index.to_string()).collect();
            bail!("Blocks at index {} failed validation", indexes.join(", "))
        }
        Err(other) => Err(other.into()),
    }
}

/// Loads the stored page as edit entries.
pub async fn show_page(service: &ReconciliationService, content_id: ContentId) -> Result<Vec<EditEntry>> {
    let rows = service.fetch_rows(content_id).await?;
    Ok(rows
        .into_iter()
        .map(|row| EditEntry {
            id: Some(row.id),
            block_type: row.block_type,
            variables: row.variables,
        })
        .collect())
}
