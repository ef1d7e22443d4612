use blockpress_blocks::blocks::{self, hero, image_grid};
use blockpress_blocks::{BlockDefinition, BlockTypeRegistry, RegistryError};
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema};
use blockpress_types::BlockType;
use pretty_assertions::assert_eq;

fn banner(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Custom("banner".into()),
        "blocks.banner",
        Components::single(Schema::new(vec![FieldDescriptor::text("text", "banner.text").required()])),
        BlockSection::new(Schema::default(), position),
    )
}

// ── Built-ins ────────────────────────────────────────────────────

#[test]
fn builtin_registry_holds_every_builtin_type() {
    let registry = BlockTypeRegistry::with_builtin_blocks();
    assert_eq!(registry.len(), BlockType::BUILTIN.len());
    for block_type in BlockType::BUILTIN {
        assert!(registry.contains(block_type), "missing {block_type}");
    }
}

#[test]
fn builtin_definitions_are_distinct() {
    let definitions = blocks::builtin_definitions();
    let mut registry = BlockTypeRegistry::new();
    for definition in definitions.iter().cloned() {
        let block_type = definition.block_type().clone();
        assert_eq!(registry.register(definition), Ok(()), "{block_type} registered twice");
    }
    let listed: Vec<&BlockType> = definitions.iter().map(|d| d.block_type()).collect();
    let expected: Vec<&BlockType> = BlockType::BUILTIN.iter().collect();
    assert_eq!(listed, expected);
}

#[test]
fn listing_follows_registration_order() {
    let registry = BlockTypeRegistry::with_builtin_blocks();
    let listed: Vec<&BlockType> = registry.types().collect();
    assert_eq!(listed.first(), Some(&&BlockType::Heading));
    assert_eq!(listed.last(), Some(&&BlockType::Search));
    assert_eq!(registry.definitions().count(), registry.len());
}

#[test]
fn create_applies_type_name_and_position() {
    let registry = BlockTypeRegistry::with_builtin_blocks();
    for definition in registry.definitions() {
        let block = registry.create(definition.block_type(), 4).unwrap();
        assert_eq!(&block.block_type, definition.block_type());
        assert_eq!(block.name, definition.name());
        assert_eq!(block.position(), 4);
        assert!(block.id.is_none());
    }
}

#[test]
fn create_is_deterministic_apart_from_key() {
    let registry = BlockTypeRegistry::with_builtin_blocks();
    let a = registry.create(&BlockType::Hero, 1).unwrap();
    let b = registry.create(&BlockType::Hero, 1).unwrap();
    assert_eq!(a, b);
    assert_ne!(a.key, b.key);
}

#[test]
fn definition_limits_come_from_the_factory() {
    let registry = BlockTypeRegistry::with_builtin_blocks();
    assert_eq!(registry.get(&BlockType::ImageGrid).unwrap().limits(), Some(image_grid::LIMITS));
    assert_eq!(registry.get(&BlockType::Hero).unwrap().limits(), None);
}

#[test]
fn repeated_blocks_start_at_their_minimum() {
    let registry = BlockTypeRegistry::with_builtin_blocks();
    let grid = registry.create(&BlockType::ImageGrid, 0).unwrap();
    assert_eq!(grid.component_count(), 3);
    let buttons = registry.create(&BlockType::Buttons, 0).unwrap();
    assert_eq!(buttons.component_count(), 1);
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn unknown_type_is_an_error() {
    let registry = BlockTypeRegistry::with_builtin_blocks();
    let custom = BlockType::Custom("banner".into());
    assert_eq!(registry.create(&custom, 0).unwrap_err(), RegistryError::UnknownBlockType(custom));
}

#[test]
fn duplicate_registration_is_rejected() {
    let mut registry = BlockTypeRegistry::with_builtin_blocks();
    let err = registry
        .register(BlockDefinition::new(BlockType::Hero, hero::NAME, hero::create))
        .unwrap_err();
    assert_eq!(err, RegistryError::AlreadyRegistered(BlockType::Hero));
    assert_eq!(registry.len(), BlockType::BUILTIN.len());
}

// ── Custom types ─────────────────────────────────────────────────

#[test]
fn custom_types_can_be_registered() {
    let mut registry = BlockTypeRegistry::new();
    assert!(registry.is_empty());
    registry
        .register(BlockDefinition::new(BlockType::Custom("banner".into()), "blocks.banner", banner))
        .unwrap();

    let block = registry.create(&BlockType::Custom("banner".into()), 2).unwrap();
    assert_eq!(block.name, "blocks.banner");
    assert_eq!(block.component_value(0, "text"), Some(&serde_json::json!("")));
    assert_eq!(block.position(), 2);
}
