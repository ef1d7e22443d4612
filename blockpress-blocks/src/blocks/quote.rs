use super::common;
use blockpress_model::options::{MediaKind, Toolbar};
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.quote";

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::wysiwyg("quote", "quote.quote", Toolbar::Basic).required(),
        FieldDescriptor::text("author", "quote.author"),
        FieldDescriptor::text("role", "quote.role"),
        FieldDescriptor::file("avatar", "quote.avatar", &[MediaKind::Image]),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Quote,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields(), position),
    )
}
