//! Storage layer for Blockpress content blocks.
//!
//! Defines the [`BlockBackend`] query/mutation interface the reconciliation
//! service talks to, and two implementations:
//!
//! - [`MemoryBackend`]: in-process store with fault injection and a request
//!   journal, for tests and dry runs.
//! - [`SqliteBackend`]: a `content_blocks` table in SQLite, for the command
//!   line front end and local development.
//!
//! Neither backend offers transactions across requests. Each mutation
//! succeeds or fails on its own.

mod backend;
mod error;
pub mod memory;
mod sqlite;

pub use backend::{BlockBackend, BlockMutation, BlockQuery, MutationOutput, Response, ResponseError, NOT_FOUND};
pub use error::{StorageError, StorageResult};
pub use memory::{Fault, FaultTarget, JournalEntry, MemoryBackend};
pub use sqlite::SqliteBackend;
