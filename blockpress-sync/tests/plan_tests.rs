use blockpress_blocks::blocks::{heading, quote};
use blockpress_blocks::{BlockConfigCodec, BlockTypeRegistry};
use blockpress_model::{ContentBlockConfig, PersistedContentBlockRow};
use blockpress_sync::ReconcilePlan;
use blockpress_types::{BlockId, ContentId};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

const PAGE: ContentId = ContentId::new(1);

fn codec() -> BlockConfigCodec {
    BlockConfigCodec::new(Arc::new(BlockTypeRegistry::with_builtin_blocks()))
}

fn server_row(codec: &BlockConfigCodec, id: i64, position: u32) -> PersistedContentBlockRow {
    let now = Utc::now();
    codec
        .encode(&heading::create(position), PAGE)
        .into_row(BlockId::new(id), now, now)
}

fn persisted(id: i64, position: u32) -> ContentBlockConfig {
    let mut block = heading::create(position);
    block.id = Some(BlockId::new(id));
    block
}

#[test]
fn replaces_first_block_with_new_one() {
    let codec = codec();
    let server = vec![server_row(&codec, 1, 0), server_row(&codec, 2, 1)];
    let fresh = quote::create(0);
    let edit = vec![persisted(2, 1), fresh.clone()];

    let plan = ReconcilePlan::build(&codec, PAGE, &server, &edit);

    assert_eq!(plan.deletes, vec![BlockId::new(1)]);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].id, BlockId::new(2));
    assert_eq!(plan.updates[0].position, 0);
    assert_eq!(plan.inserts.len(), 1);
    assert_eq!(plan.inserts[0].key, fresh.key);
    assert_eq!(plan.inserts[0].position, 1);
    assert!(!plan.deletes.contains(&BlockId::new(2)));
    assert_eq!(plan.request_count(), 3);
    assert_eq!(plan.resulting_len(), 2);
}

#[test]
fn drafts_carry_list_positions() {
    let codec = codec();
    let server = vec![server_row(&codec, 1, 0), server_row(&codec, 2, 1)];
    let edit = vec![persisted(2, 1), persisted(1, 0)];

    let plan = ReconcilePlan::build(&codec, PAGE, &server, &edit);
    let placed: Vec<_> = plan
        .updates
        .iter()
        .map(|u| (u.id.get(), u.draft.position, u.draft.variables.block["position"].clone()))
        .collect();
    assert_eq!(placed, vec![(2, 0, json!(0)), (1, 1, json!(1))]);
    assert!(plan.deletes.is_empty());
    assert!(plan.updates.iter().all(|u| u.draft.id == Some(u.id)));
}

#[test]
fn unchanged_page_still_updates_every_block() {
    let codec = codec();
    let server = vec![server_row(&codec, 1, 0)];
    let plan = ReconcilePlan::build(&codec, PAGE, &server, &[persisted(1, 0)]);
    assert_eq!(plan.updates.len(), 1);
    assert!(plan.inserts.is_empty());
    assert!(plan.deletes.is_empty());
}

#[test]
fn empty_edit_list_deletes_everything() {
    let codec = codec();
    let server = vec![server_row(&codec, 3, 0), server_row(&codec, 1, 1), server_row(&codec, 2, 2)];
    let plan = ReconcilePlan::build(&codec, PAGE, &server, &[]);
    assert_eq!(plan.deletes, vec![BlockId::new(1), BlockId::new(2), BlockId::new(3)]);
    assert_eq!(plan.resulting_len(), 0);
}

#[test]
fn empty_page_and_empty_edit_list_plan_nothing() {
    let plan = ReconcilePlan::build(&codec(), PAGE, &[], &[]);
    assert!(plan.is_empty());
    assert_eq!(plan.request_count(), 0);
}

#[test]
fn inserts_share_one_request() {
    let codec = codec();
    let edit = vec![heading::create(0), quote::create(1), heading::create(2)];
    let plan = ReconcilePlan::build(&codec, PAGE, &[], &edit);
    assert_eq!(plan.inserts.len(), 3);
    assert_eq!(plan.request_count(), 1);
    let positions: Vec<_> = plan.inserts.iter().map(|i| i.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn orphaned_blocks_are_skipped_and_take_no_position() {
    let codec = codec();
    let server = vec![server_row(&codec, 1, 0)];
    let edit = vec![persisted(99, 0), persisted(1, 1), heading::create(2)];

    let plan = ReconcilePlan::build(&codec, PAGE, &server, &edit);
    assert_eq!(plan.orphaned, vec![BlockId::new(99)]);
    assert_eq!(plan.updates[0].position, 0);
    assert_eq!(plan.inserts[0].position, 1);
    assert!(plan.deletes.is_empty());
}

#[test]
fn duplicate_ids_are_updated_once() {
    let codec = codec();
    let server = vec![server_row(&codec, 1, 0), server_row(&codec, 2, 1)];
    let edit = vec![persisted(1, 0), persisted(1, 1), persisted(2, 2)];

    let plan = ReconcilePlan::build(&codec, PAGE, &server, &edit);
    let updated: Vec<_> = plan.updates.iter().map(|u| (u.id.get(), u.position)).collect();
    assert_eq!(updated, vec![(1, 0), (2, 1)]);
    assert_eq!(plan.duplicates, vec![BlockId::new(1)]);
}

#[test]
fn repeated_orphan_is_reported_once() {
    let codec = codec();
    let server = vec![server_row(&codec, 1, 0)];
    let edit = vec![persisted(99, 0), persisted(1, 1), persisted(99, 2)];

    let plan = ReconcilePlan::build(&codec, PAGE, &server, &edit);
    assert_eq!(plan.orphaned, vec![BlockId::new(99)]);
    assert_eq!(plan.duplicates, vec![BlockId::new(99)]);
    assert_eq!(plan.updates.len(), 1);
    assert_eq!(plan.updates[0].position, 0);
    assert!(plan.inserts.is_empty());
}

mod properties {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    proptest! {
        #[test]
        fn plan_keeps_positions_dense(
            server_len in 0usize..8,
            kept_mask in proptest::collection::vec(any::<bool>(), 8),
            new_blocks in 0usize..4,
            seed in any::<u64>(),
        ) {
            let codec = codec();
            let server: Vec<_> = (0..server_len)
                .map(|i| server_row(&codec, i as i64 + 1, i as u32))
                .collect();

            let mut edit: Vec<ContentBlockConfig> = (0..server_len)
                .filter(|i| kept_mask[*i])
                .map(|i| persisted(i as i64 + 1, i as u32))
                .collect();
            for n in 0..new_blocks {
                let at = (seed as usize + n) % (edit.len() + 1);
                edit.insert(at, heading::create(0));
            }

            let plan = ReconcilePlan::build(&codec, PAGE, &server, &edit);

            let mut positions: Vec<u32> = plan
                .inserts
                .iter()
                .map(|i| i.position)
                .chain(plan.updates.iter().map(|u| u.position))
                .collect();
            positions.sort_unstable();
            prop_assert_eq!(positions, (0..edit.len() as u32).collect::<Vec<_>>());

            let kept: BTreeSet<_> = edit.iter().filter_map(|b| b.id).collect();
            let expected_deletes: Vec<_> = server.iter().map(|r| r.id).filter(|id| !kept.contains(id)).collect();
            prop_assert_eq!(&plan.deletes, &expected_deletes);
            prop_assert!(plan.updates.iter().all(|u| !plan.deletes.contains(&u.id)));
        }
    }
}
