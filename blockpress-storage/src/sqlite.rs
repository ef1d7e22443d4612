//! SQLite-backed block store.
//!
//! Variables are stored as JSON text. Every request runs on the blocking
//! pool so the async runtime is never held by SQLite I/O.

use crate::backend::{BlockBackend, BlockMutation, BlockQuery, MutationOutput, Response, ResponseError};
use crate::error::{StorageError, StorageResult};
use async_trait::async_trait;
use blockpress_model::{BlockRowDraft, BlockVariables, PersistedContentBlockRow};
use blockpress_types::{BlockId, BlockType, ContentId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

const SELECT_COLUMNS: &str =
    "SELECT id, content_id, position, block_type, components, block, created_at, updated_at FROM content_blocks";

/// A [`BlockBackend`] over a single SQLite connection.
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Opens (or creates) a block store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Opens an in-memory block store.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let backend = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        backend.init_schema()?;
        Ok(backend)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = lock(&self.conn);
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS content_blocks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                block_type TEXT NOT NULL,
                components TEXT NOT NULL,
                block TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS content_blocks_by_content
                ON content_blocks (content_id, position);
            ",
        )?;
        Ok(())
    }

    /// Runs `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> StorageResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StorageResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || f(&mut lock(&conn)))
            .await
            .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

fn lock(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(PoisonError::into_inner)
}

struct RawRow {
    id: i64,
    content_id: i64,
    position: i64,
    block_type: String,
    components: String,
    block: String,
    created_at: String,
    updated_at: String,
}

impl RawRow {
    fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            content_id: row.get(1)?,
            position: row.get(2)?,
            block_type: row.get(3)?,
            components: row.get(4)?,
            block: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn decode(self) -> StorageResult<PersistedContentBlockRow> {
        let position = u32::try_from(self.position)
            .map_err(|_| StorageError::InvalidData(format!("row {} has position {}", self.id, self.position)))?;
        let block_type: BlockType = self
            .block_type
            .parse()
            .map_err(|e| StorageError::InvalidData(format!("row {}: {e}", self.id)))?;
        Ok(PersistedContentBlockRow {
            id: BlockId::new(self.id),
            content_id: ContentId::new(self.content_id),
            position,
            block_type,
            variables: BlockVariables {
                components: serde_json::from_str(&self.components)?,
                block: serde_json::from_str(&self.block)?,
            },
            created_at: parse_time(self.id, &self.created_at)?,
            updated_at: parse_time(self.id, &self.updated_at)?,
        })
    }
}

fn parse_time(id: i64, raw: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidData(format!("row {id} has timestamp {raw:?}: {e}")))
}

fn select_content(conn: &Connection, content_id: ContentId) -> StorageResult<Vec<PersistedContentBlockRow>> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE content_id = ?1 ORDER BY position, id"))?;
    let raw = stmt
        .query_map(params![content_id.get()], RawRow::from_sql)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    raw.into_iter().map(RawRow::decode).collect()
}

fn select_one(conn: &Connection, id: BlockId) -> StorageResult<Option<PersistedContentBlockRow>> {
    let raw = conn
        .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), params![id.get()], RawRow::from_sql)
        .optional()?;
    raw.map(RawRow::decode).transpose()
}

fn insert_all(conn: &mut Connection, drafts: Vec<BlockRowDraft>) -> StorageResult<Vec<PersistedContentBlockRow>> {
    let now = Utc::now();
    let stamp = now.to_rfc3339();
    let tx = conn.transaction()?;
    let mut inserted = Vec::with_capacity(drafts.len());
    for draft in drafts {
        tx.execute(
            "INSERT INTO content_blocks (content_id, position, block_type, components, block, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                draft.content_id.get(),
                draft.position,
                draft.block_type.as_str(),
                serde_json::to_string(&draft.variables.components)?,
                serde_json::to_string(&draft.variables.block)?,
                stamp,
            ],
        )?;
        let id = BlockId::new(tx.last_insert_rowid());
        inserted.push(draft.into_row(id, now, now));
    }
    tx.commit()?;
    Ok(inserted)
}

fn update_one(conn: &Connection, id: BlockId, draft: BlockRowDraft) -> StorageResult<Response<MutationOutput>> {
    let changed = conn.execute(
        "UPDATE content_blocks
         SET position = ?2, block_type = ?3, components = ?4, block = ?5, updated_at = ?6
         WHERE id = ?1",
        params![
            id.get(),
            draft.position,
            draft.block_type.as_str(),
            serde_json::to_string(&draft.variables.components)?,
            serde_json::to_string(&draft.variables.block)?,
            Utc::now().to_rfc3339(),
        ],
    )?;
    if changed == 0 {
        return Ok(Response::error(ResponseError::not_found(id)));
    }
    match select_one(conn, id)? {
        Some(row) => Ok(Response::ok(MutationOutput::Updated(row))),
        None => Ok(Response::error(ResponseError::not_found(id))),
    }
}

fn delete_one(conn: &Connection, id: BlockId) -> StorageResult<Response<MutationOutput>> {
    let changed = conn.execute("DELETE FROM content_blocks WHERE id = ?1", params![id.get()])?;
    if changed == 0 {
        return Ok(Response::error(ResponseError::not_found(id)));
    }
    Ok(Response::ok(MutationOutput::Deleted(id)))
}

#[async_trait]
impl BlockBackend for SqliteBackend {
    async fn query(&self, query: BlockQuery) -> StorageResult<Response<Vec<PersistedContentBlockRow>>> {
        let BlockQuery::ContentBlocks { content_id } = query;
        let rows = self.with_conn(move |conn| select_content(conn, content_id)).await?;
        debug!(content_id = %content_id, rows = rows.len(), "loaded content blocks");
        Ok(Response::ok(rows))
    }

    async fn mutate(&self, mutation: BlockMutation) -> StorageResult<Response<MutationOutput>> {
        self.with_conn(move |conn| match mutation {
            BlockMutation::InsertBlocks { drafts } => {
                insert_all(conn, drafts).map(|rows| Response::ok(MutationOutput::Inserted(rows)))
            }
            BlockMutation::UpdateBlock { id, draft } => update_one(conn, id, draft),
            BlockMutation::DeleteBlock { id } => delete_one(conn, id),
        })
        .await
    }
}
