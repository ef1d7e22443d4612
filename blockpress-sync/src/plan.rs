//! Diffing an edited block list against the last known server state.
//!
//! The backend has no array-diff primitive, so a save becomes one bulk
//! insert for new blocks, one update per kept block and one delete per
//! removed block. Building the plan does no I/O.

use blockpress_blocks::BlockConfigCodec;
use blockpress_model::{BlockRowDraft, ContentBlockConfig, PersistedContentBlockRow};
use blockpress_types::{BlockId, BlockKey, ContentId};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// A block to create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedInsert {
    pub key: BlockKey,
    pub position: u32,
    pub draft: BlockRowDraft,
}

/// A persisted block to overwrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedUpdate {
    pub id: BlockId,
    pub key: BlockKey,
    pub position: u32,
    pub draft: BlockRowDraft,
}

/// The mutations that bring the server in line with an edited list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcilePlan {
    pub content_id: ContentId,
    pub inserts: Vec<PlannedInsert>,
    pub updates: Vec<PlannedUpdate>,
    /// Server ids missing from the edited list, ascending.
    pub deletes: Vec<BlockId>,
    /// Edited blocks whose id the server does not know. Never sent.
    pub orphaned: Vec<BlockId>,
    /// Repeats of an id already seen in the edited list, one entry per
    /// repeat. Only the first occurrence is planned.
    pub duplicates: Vec<BlockId>,
}

impl ReconcilePlan {
    /// Diffs `edit_blocks` against `server_rows`.
    ///
    /// Blocks that will be sent get dense positions in list order. Orphaned
    /// blocks and repeated ids are skipped and take no position, so the
    /// stored page stays dense even when they are present.
    pub fn build(
        codec: &BlockConfigCodec,
        content_id: ContentId,
        server_rows: &[PersistedContentBlockRow],
        edit_blocks: &[ContentBlockConfig],
    ) -> Self {
        let server_ids: HashSet<BlockId> = server_rows.iter().map(|row| row.id).collect();
        let mut seen = HashSet::new();
        let mut plan = Self {
            content_id,
            inserts: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
            orphaned: Vec::new(),
            duplicates: Vec::new(),
        };

        let mut position = 0u32;
        for block in edit_blocks {
            match block.id {
                None => {
                    plan.inserts.push(PlannedInsert {
                        key: block.key,
                        position,
                        draft: encode_at(codec, block, content_id, position),
                    });
                    position += 1;
                }
                Some(id) if !seen.insert(id) => {
                    warn!(content_id = %content_id, block_id = %id, "block appears twice in edited list, sending once");
                    plan.duplicates.push(id);
                }
                Some(id) if !server_ids.contains(&id) => {
                    warn!(content_id = %content_id, block_id = %id, "edited block is not on the server, skipping");
                    plan.orphaned.push(id);
                }
                Some(id) => {
                    plan.updates.push(PlannedUpdate {
                        id,
                        key: block.key,
                        position,
                        draft: encode_at(codec, block, content_id, position),
                    });
                    position += 1;
                }
            }
        }

        let kept: HashSet<BlockId> = edit_blocks.iter().filter_map(|b| b.id).collect();
        plan.deletes = server_ids
            .difference(&kept)
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        debug!(
            content_id = %content_id,
            inserts = plan.inserts.len(),
            updates = plan.updates.len(),
            deletes = plan.deletes.len(),
            orphaned = plan.orphaned.len(),
            "reconcile plan built"
        );
        plan
    }

    /// Number of backend requests executing the plan takes.
    pub fn request_count(&self) -> usize {
        usize::from(!self.inserts.is_empty()) + self.updates.len() + self.deletes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.request_count() == 0
    }

    /// Number of blocks the page holds once the plan is applied.
    pub fn resulting_len(&self) -> usize {
        self.inserts.len() + self.updates.len()
    }
}

fn encode_at(codec: &BlockConfigCodec, block: &ContentBlockConfig, content_id: ContentId, position: u32) -> BlockRowDraft {
    if block.position() == position {
        return codec.encode(block, content_id);
    }
    let mut placed = block.clone();
    placed.set_position(position);
    codec.encode(&placed, content_id)
}
