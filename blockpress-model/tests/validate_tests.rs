use blockpress_model::options::Color;
use blockpress_model::{
    cardinality_ok, messages, validate, BlockSection, ComponentPayload, Components, ContentBlockConfig,
    FieldDescriptor, FieldPath, Limits, Schema,
};
use blockpress_types::BlockType;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn block_fields() -> Schema {
    Schema::new(vec![FieldDescriptor::color("background_color", "block.background_color", Color::White)])
}

fn make_grid(tiles: usize) -> ContentBlockConfig {
    let tile = Schema::new(vec![
        FieldDescriptor::text("caption", "grid.caption").required(),
        FieldDescriptor::url("link", "grid.link"),
    ]);
    let mut block = ContentBlockConfig::new(
        BlockType::ImageGrid,
        "blocks.image_grid",
        Components::repeated(tile.clone(), Limits::exactly(3)),
        BlockSection::new(block_fields(), 0),
    );
    block.components.state = ComponentPayload::Repeated((0..tiles).map(|_| tile.default_state()).collect());
    block
}

fn fill_captions(block: &mut ContentBlockConfig) {
    for i in 0..block.component_count() {
        block.set_component_value(i, "caption", json!(format!("tile {i}"))).unwrap();
    }
}

// ── Paths ────────────────────────────────────────────────────────

#[test]
fn field_path_display() {
    let p = FieldPath::root("components").index(2).key("links").index(0).key("label");
    assert_eq!(p.to_string(), "components[2].links[0].label");
    assert_eq!(p.component_index(), Some(2));
    assert_eq!(p.field(), Some("label"));
    assert_eq!(FieldPath::root("block").key("padding").to_string(), "block.padding");
    assert_eq!(FieldPath::root("block").key("padding").component_index(), None);
}

// ── Per-item errors ──────────────────────────────────────────────

#[test]
fn repeated_items_keep_their_index() {
    let mut block = make_grid(3);
    block.set_component_value(0, "caption", json!("first")).unwrap();
    block.set_component_value(2, "caption", json!("third")).unwrap();
    block.set_component_value(2, "link", json!("not a link")).unwrap();

    let report = validate(&block);
    assert!(!report.is_valid());
    assert_eq!(report.len(), 2);
    assert_eq!(report.messages("components[1].caption"), Some(&[messages::REQUIRED.to_string()][..]));
    assert_eq!(report.messages("components[2].link"), Some(&[messages::URL.to_string()][..]));
    assert_eq!(report.messages("components[0].caption"), None);
    assert_eq!(report.for_component(2).count(), 1);
}

#[test]
fn valid_block_has_empty_report() {
    let mut block = make_grid(3);
    fill_captions(&mut block);
    let report = validate(&block);
    assert!(report.is_valid());
    assert!(report.is_empty());
}

#[test]
fn block_settings_are_validated() {
    let mut block = make_grid(3);
    fill_captions(&mut block);
    block.set_block_value("background_color", json!("neon")).unwrap();
    let report = validate(&block);
    assert_eq!(
        report.messages("block.background_color"),
        Some(&[messages::UNKNOWN_OPTION.to_string()][..])
    );
}

#[test]
fn single_payload_paths_have_no_index() {
    let fields = Schema::new(vec![FieldDescriptor::text("title", "heading.title").required()]);
    let block = ContentBlockConfig::new(
        BlockType::Heading,
        "blocks.heading",
        Components::single(fields),
        BlockSection::new(block_fields(), 0),
    );
    let report = validate(&block);
    assert_eq!(report.messages("components.title"), Some(&[messages::REQUIRED.to_string()][..]));
}

#[test]
fn waived_field_is_never_reported() {
    let fields = Schema::new(vec![FieldDescriptor::url("url", "iframe.url").required().waive_validation()]);
    let mut block = ContentBlockConfig::new(
        BlockType::Iframe,
        "blocks.iframe",
        Components::single(fields),
        BlockSection::new(block_fields(), 0),
    );
    block.set_component_value(0, "url", json!("definitely not a url")).unwrap();
    assert!(validate(&block).is_valid());
}

#[test]
fn missing_state_key_is_treated_as_null() {
    let mut block = make_grid(3);
    fill_captions(&mut block);
    if let ComponentPayload::Repeated(items) = &mut block.components.state {
        items[1].remove("caption");
    }
    let report = validate(&block);
    assert_eq!(report.messages("components[1].caption"), Some(&[messages::REQUIRED.to_string()][..]));
}

// ── Nested groups ────────────────────────────────────────────────

#[test]
fn nested_group_items_are_indexed() {
    let link = Schema::new(vec![FieldDescriptor::text("label", "links.label").required()]);
    let fields = Schema::new(vec![FieldDescriptor::group("links", "fields.links", link, Limits::new(1, 3))]);
    let mut block = ContentBlockConfig::new(
        BlockType::Buttons,
        "blocks.buttons",
        Components::single(fields),
        BlockSection::new(block_fields(), 0),
    );
    block
        .set_component_value(0, "links", json!([{"label": "ok"}, {"label": ""}]))
        .unwrap();
    let report = validate(&block);
    assert_eq!(
        report.messages("components.links[1].label"),
        Some(&[messages::REQUIRED.to_string()][..])
    );
    assert_eq!(report.messages("components.links"), None);
}

// ── Cardinality ──────────────────────────────────────────────────

#[test]
fn cardinality_exactly_three() {
    for (tiles, expected) in [(2, Some(messages::MIN_ITEMS)), (3, None), (4, Some(messages::MAX_ITEMS))] {
        let mut block = make_grid(tiles);
        fill_captions(&mut block);
        let report = validate(&block);
        assert_eq!(
            report.messages("components").map(|m| m[0].as_str()),
            expected,
            "tiles = {tiles}"
        );
        assert_eq!(cardinality_ok(&block), expected.is_none());
    }
}

// ── Idempotence ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn validation_is_idempotent(
        captions in proptest::collection::vec(".{0,12}", 3),
        link in ".{0,24}",
    ) {
        let mut block = make_grid(3);
        for (i, caption) in captions.iter().enumerate() {
            block.set_component_value(i, "caption", json!(caption)).unwrap();
        }
        block.set_component_value(1, "link", json!(link)).unwrap();

        let first = validate(&block);
        let second = validate(&block);
        prop_assert_eq!(first, second);
    }
}
