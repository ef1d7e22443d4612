use super::common;
use blockpress_model::options::Toolbar;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.rich_text";

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::wysiwyg("content", "rich_text.content", Toolbar::Full).required(),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::RichText,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields(), position),
    )
}
