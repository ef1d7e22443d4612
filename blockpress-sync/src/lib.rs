//! Reconciliation of edited block lists with block storage.
//!
//! The editor keeps a page as an ordered list of [`ContentBlockConfig`]s.
//! Saving it means diffing that list against the rows the server returned
//! last and issuing inserts, updates and deletes, because the backend has
//! no way to replace an ordered collection in one request.
//!
//! # Save process
//!
//! 1. **Validate**: every block is checked; any error stops the save
//!    before a request is sent.
//! 2. **Plan**: new blocks become one bulk insert, kept blocks one update
//!    each, blocks gone from the list one delete each. Positions are
//!    rewritten densely in list order.
//! 3. **Execute**: the three groups run concurrently and every request is
//!    awaited. Failures are collected, not propagated early.
//! 4. **Refetch**: after any outcome the caller reloads canonical state.
//!
//! Each save takes a per-content generation number; a caller holding a
//! report from an older generation knows a newer save has started.
//!
//! # Example
//!
//! ```
//! use blockpress_blocks::{BlockConfigCodec, BlockTypeRegistry};
//! use blockpress_storage::MemoryBackend;
//! use blockpress_sync::{ReconcileConfig, ReconciliationService};
//! use std::sync::Arc;
//!
//! let codec = BlockConfigCodec::new(Arc::new(BlockTypeRegistry::with_builtin_blocks()));
//! let service = ReconciliationService::new(
//!     Arc::new(MemoryBackend::new()),
//!     codec,
//!     ReconcileConfig::default(),
//! );
//! assert!(service.config().validate_before_save);
//! ```
//!
//! [`ContentBlockConfig`]: blockpress_model::ContentBlockConfig

mod config;
mod error;
mod plan;
mod report;
mod service;

pub use config::ReconcileConfig;
pub use error::{BlockValidationFailure, PersistError, ReconcileError, ReconcileResult};
pub use plan::{PlannedInsert, PlannedUpdate, ReconcilePlan};
pub use report::{GroupReport, OperationFailure, OperationKind, ReconcileReport};
pub use service::{validate_all, ReconciliationService};
