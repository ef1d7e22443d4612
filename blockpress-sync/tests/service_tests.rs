use blockpress_blocks::blocks::{heading, image_grid, quote};
use blockpress_blocks::{BlockConfigCodec, BlockTypeRegistry};
use blockpress_model::{messages, move_block, positions_are_dense, ComponentPayload, ContentBlockConfig};
use blockpress_storage::{Fault, FaultTarget, MemoryBackend, SqliteBackend};
use blockpress_sync::{OperationKind, ReconcileConfig, ReconcileError, ReconciliationService};
use blockpress_types::{BlockId, BlockType, ContentId};
use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const PAGE: ContentId = ContentId::new(7);

fn codec() -> BlockConfigCodec {
    BlockConfigCodec::new(Arc::new(BlockTypeRegistry::with_builtin_blocks()))
}

fn service(backend: &MemoryBackend) -> ReconciliationService {
    ReconciliationService::new(Arc::new(backend.clone()), codec(), ReconcileConfig::default())
}

fn titled(title: &str) -> ContentBlockConfig {
    let mut block = heading::create(0);
    block.set_component_value(0, "title", json!(title)).unwrap();
    block
}

fn titles(blocks: &[ContentBlockConfig]) -> Vec<String> {
    blocks
        .iter()
        .map(|b| {
            b.component_value(0, "title")
                .or_else(|| b.component_value(0, "quote"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Saves `titles` as a fresh page and returns the fetched blocks.
async fn seed_page(service: &ReconciliationService, names: &[&str]) -> Vec<ContentBlockConfig> {
    let edit: Vec<_> = names.iter().map(|t| titled(t)).collect();
    service.save(PAGE, &[], &edit).await.unwrap();
    service.fetch(PAGE).await.unwrap()
}

// ── Happy path ───────────────────────────────────────────────────

#[tokio::test]
async fn first_save_inserts_every_block() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let edit = vec![titled("one"), titled("two")];

    let report = service.save(PAGE, &[], &edit).await.unwrap();
    assert_eq!(report.inserted.succeeded.len(), 2);
    assert!(report.updated.succeeded.is_empty());
    assert!(report.deleted.succeeded.is_empty());
    assert_eq!(backend.mutations().len(), 1);

    let fetched = service.fetch(PAGE).await.unwrap();
    assert_eq!(titles(&fetched), vec!["one", "two"]);
    assert_eq!(fetched[0].id, report.inserted_id(edit[0].key));
    assert_eq!(fetched[1].id, report.inserted_id(edit[1].key));
}

#[tokio::test]
async fn replace_first_block_scenario() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let page = seed_page(&service, &["first", "second"]).await;
    let server = backend.rows(PAGE);
    let (first, second) = (page[0].id.unwrap(), page[1].id.unwrap());
    backend.clear_journal();

    let mut fresh = quote::create(0);
    fresh.set_component_value(0, "quote", json!("new")).unwrap();
    let edit = vec![page[1].clone(), fresh];

    let report = service.save(PAGE, &server, &edit).await.unwrap();
    assert_eq!(report.deleted.succeeded, vec![first]);
    assert_eq!(report.updated.succeeded, vec![second]);
    assert_eq!(report.inserted.succeeded.len(), 1);
    assert_eq!(backend.mutations().len(), 3);

    let fetched = service.fetch(PAGE).await.unwrap();
    assert_eq!(titles(&fetched), vec!["second", "new"]);
    assert_eq!(fetched[0].id, Some(second));
    assert_eq!(fetched[1].block_type, BlockType::Quote);
    assert!(positions_are_dense(&fetched));
}

#[tokio::test]
async fn reordering_keeps_positions_dense() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let mut page = seed_page(&service, &["a", "b", "c", "d"]).await;
    let server = backend.rows(PAGE);

    move_block(&mut page, 3, 0).unwrap();
    page.remove(2);
    page.insert(1, titled("e"));

    service.save(PAGE, &server, &page).await.unwrap();
    let fetched = service.fetch(PAGE).await.unwrap();
    assert_eq!(titles(&fetched), vec!["d", "e", "a", "c"]);
    let positions: Vec<_> = backend.rows(PAGE).iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![0, 1, 2, 3]);
}

// ── Partial failure ──────────────────────────────────────────────

#[tokio::test]
async fn failed_update_does_not_stop_insert_or_delete() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let page = seed_page(&service, &["first", "second"]).await;
    let server = backend.rows(PAGE);
    let (first, second) = (page[0].id.unwrap(), page[1].id.unwrap());
    backend.fail(FaultTarget::Update(second));

    let fresh = titled("fresh");
    let edit = vec![page[1].clone(), fresh.clone()];
    let err = service.save(PAGE, &server, &edit).await.unwrap_err();

    let ReconcileError::Persist(persist) = err else {
        panic!("expected a persist error");
    };
    let report = persist.report;
    assert_eq!(report.failure_count(), 1);
    let failure = report.failures().next().unwrap();
    assert_eq!(failure.kind, OperationKind::Update);
    assert_eq!(failure.block_id, Some(second));
    assert_eq!(report.deleted.succeeded, vec![first]);
    assert!(report.inserted_id(fresh.key).is_some());

    let fetched = service.fetch(PAGE).await.unwrap();
    let ids: Vec<_> = fetched.iter().map(|b| b.id.unwrap()).collect();
    assert!(!ids.contains(&first));
    assert!(ids.contains(&second));
    assert!(ids.contains(&report.inserted_id(fresh.key).unwrap()));
}

#[tokio::test]
async fn failed_insert_reports_every_new_block() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    backend.fail(FaultTarget::Insert);

    let edit = vec![titled("a"), titled("b")];
    let Err(ReconcileError::Persist(persist)) = service.save(PAGE, &[], &edit).await else {
        panic!("expected a persist error");
    };
    let failed: Vec<_> = persist
        .report
        .inserted
        .failed
        .iter()
        .map(|f| (f.kind, f.key, f.position))
        .collect();
    assert_eq!(
        failed,
        vec![
            (OperationKind::Insert, Some(edit[0].key), Some(0)),
            (OperationKind::Insert, Some(edit[1].key), Some(1)),
        ]
    );
    assert!(persist.report.inserted_keys.is_empty());
    assert!(backend.rows(PAGE).is_empty());
}

#[tokio::test]
async fn unreachable_backend_fails_each_operation() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let page = seed_page(&service, &["a", "b"]).await;
    let server = backend.rows(PAGE);
    let (a, b) = (page[0].id.unwrap(), page[1].id.unwrap());
    backend.inject(FaultTarget::Delete(a), Fault::Unreachable("connection reset".into()));
    backend.inject(FaultTarget::Delete(b), Fault::Unreachable("connection reset".into()));

    let Err(ReconcileError::Persist(persist)) = service.save(PAGE, &server, &[]).await else {
        panic!("expected a persist error");
    };
    assert_eq!(persist.report.deleted.failed.len(), 2);
    assert!(persist.report.deleted.failed.iter().all(|f| f.error.contains("connection reset")));
    assert_eq!(backend.rows(PAGE).len(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_operation_times_out_alone() {
    let backend = MemoryBackend::new();
    let config = ReconcileConfig {
        operation_timeout_ms: 100,
        ..ReconcileConfig::default()
    };
    let service = ReconciliationService::new(Arc::new(backend.clone()), codec(), config);
    let page = seed_page(&service, &["slow", "fast"]).await;
    let server = backend.rows(PAGE);
    let (slow, fast) = (page[0].id.unwrap(), page[1].id.unwrap());
    backend.inject(FaultTarget::Update(slow), Fault::Delay(Duration::from_secs(10)));

    let Err(ReconcileError::Persist(persist)) = service.save(PAGE, &server, &page).await else {
        panic!("expected a persist error");
    };
    assert_eq!(persist.report.updated.succeeded, vec![fast]);
    assert_eq!(persist.report.updated.failed.len(), 1);
    assert!(persist.report.updated.failed[0].error.contains("timed out"));
}

// ── Validation gate ──────────────────────────────────────────────

#[tokio::test]
async fn invalid_block_blocks_the_whole_save() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let edit = vec![titled("ok"), heading::create(1)];

    let err = service.save(PAGE, &[], &edit).await.unwrap_err();
    let ReconcileError::Validation(failures) = err else {
        panic!("expected a validation error");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].index, 1);
    assert_eq!(failures[0].key, edit[1].key);
    assert_eq!(
        failures[0].report.messages("components.title"),
        Some(&[messages::REQUIRED.to_string()][..])
    );
    assert!(backend.journal().is_empty());
}

fn filled_grid() -> ContentBlockConfig {
    let mut grid = image_grid::create(0);
    for i in 0..3 {
        let image = json!({ "url": format!("https://cdn.test/tile-{i}.png"), "mime_type": "image/png" });
        grid.set_component_value(i, "image", image).unwrap();
    }
    grid
}

#[tokio::test]
async fn full_image_grid_saves() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let report = service.save(PAGE, &[], &[filled_grid()]).await.unwrap();
    assert_eq!(report.inserted.succeeded.len(), 1);
    assert_eq!(backend.rows(PAGE).len(), 1);
}

#[tokio::test]
async fn too_few_tiles_block_the_save() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let mut grid = filled_grid();
    if let ComponentPayload::Repeated(items) = &mut grid.components.state {
        items.pop();
    }

    let Err(ReconcileError::Validation(failures)) = service.save(PAGE, &[], &[grid]).await else {
        panic!("expected a validation error");
    };
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].report.len(), 1);
    assert_eq!(
        failures[0].report.messages("components"),
        Some(&[messages::MIN_ITEMS.to_string()][..])
    );
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn too_many_tiles_block_the_save() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let mut grid = filled_grid();
    if let ComponentPayload::Repeated(items) = &mut grid.components.state {
        let extra = items[0].clone();
        items.push(extra);
    }

    let Err(ReconcileError::Validation(failures)) = service.save(PAGE, &[], &[grid]).await else {
        panic!("expected a validation error");
    };
    assert_eq!(failures[0].report.len(), 1);
    assert_eq!(
        failures[0].report.messages("components"),
        Some(&[messages::MAX_ITEMS.to_string()][..])
    );
    assert!(backend.mutations().is_empty());
}

#[tokio::test]
async fn validation_can_be_turned_off() {
    let backend = MemoryBackend::new();
    let config = ReconcileConfig {
        validate_before_save: false,
        ..ReconcileConfig::default()
    };
    let service = ReconciliationService::new(Arc::new(backend.clone()), codec(), config);
    let report = service.save(PAGE, &[], &[heading::create(0)]).await.unwrap();
    assert_eq!(report.inserted.succeeded.len(), 1);
}

// ── Orphans and duplicates ───────────────────────────────────────

#[tokio::test]
async fn orphaned_and_duplicate_ids_are_reported() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let page = seed_page(&service, &["kept"]).await;
    let server = backend.rows(PAGE);

    let mut ghost = titled("ghost");
    ghost.id = Some(BlockId::new(999));
    let edit = vec![ghost, page[0].clone(), page[0].clone()];

    let report = service.save(PAGE, &server, &edit).await.unwrap();
    assert_eq!(report.orphaned, vec![BlockId::new(999)]);
    assert_eq!(report.duplicates, vec![page[0].id.unwrap()]);
    assert_eq!(report.updated.succeeded, vec![page[0].id.unwrap()]);
    assert_eq!(backend.rows(PAGE)[0].position, 0);
}

// ── Generations ──────────────────────────────────────────────────

#[tokio::test]
async fn newer_save_makes_older_report_stale() {
    let backend = MemoryBackend::new();
    let service = service(&backend);

    let first = service.save(PAGE, &[], &[titled("a")]).await.unwrap();
    assert!(service.is_current(&first).await);

    let server = backend.rows(PAGE);
    let page = service.fetch(PAGE).await.unwrap();
    let second = service.save(PAGE, &server, &page).await.unwrap();

    assert_eq!(second.generation, first.generation + 1);
    assert!(!service.is_current(&first).await);
    assert!(service.is_current(&second).await);
}

#[tokio::test]
async fn generations_are_per_content() {
    let backend = MemoryBackend::new();
    let service = service(&backend);
    let a = service.save(ContentId::new(1), &[], &[titled("a")]).await.unwrap();
    let b = service.save(ContentId::new(2), &[], &[titled("b")]).await.unwrap();
    assert_eq!(a.generation, 1);
    assert_eq!(b.generation, 1);
    assert!(service.is_current(&a).await);
    assert_eq!(service.current_generation(ContentId::new(3)).await, 0);
}

// ── Fetch ────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_failure_is_a_fetch_error() {
    let backend = MemoryBackend::new();
    backend.fail(FaultTarget::Query);
    let err = service(&backend).fetch(PAGE).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Fetch { content_id, .. } if content_id == PAGE));
}

#[tokio::test]
async fn fetch_of_unknown_block_type_is_a_codec_error() {
    let backend = MemoryBackend::new();
    let now = Utc::now();
    let mut row = codec().encode(&titled("x"), PAGE).into_row(BlockId::new(1), now, now);
    row.block_type = BlockType::Custom("retired".into());
    backend.seed([row]);

    let err = service(&backend).fetch(PAGE).await.unwrap_err();
    assert!(matches!(err, ReconcileError::Codec(_)));
}

// ── SQLite ───────────────────────────────────────────────────────

#[tokio::test]
async fn full_cycle_against_sqlite() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(SqliteBackend::open(dir.path().join("blocks.db")).unwrap());
    let service = ReconciliationService::new(backend, codec(), ReconcileConfig::default());

    service.save(PAGE, &[], &[titled("a"), titled("b"), titled("c")]).await.unwrap();
    let server = service.fetch_rows(PAGE).await.unwrap();
    let mut page = service.codec().decode_all(&server).unwrap();

    page.remove(0);
    page[0].set_component_value(0, "subtitle", json!("edited")).unwrap();
    page.push(titled("d"));
    service.save(PAGE, &server, &page).await.unwrap();

    let fetched = service.fetch(PAGE).await.unwrap();
    assert_eq!(titles(&fetched), vec!["b", "c", "d"]);
    assert_eq!(fetched[0].component_value(0, "subtitle"), Some(&json!("edited")));
    assert!(positions_are_dense(&fetched));
}
