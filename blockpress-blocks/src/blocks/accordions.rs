//! Accordions: collapsible question/answer entries under an optional title.

use super::common;
use blockpress_model::options::Toolbar;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Limits, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.accordions";
pub const LIMITS: Limits = Limits::new(1, 20);

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("title", "accordions.item.title").required(),
        FieldDescriptor::wysiwyg("body", "accordions.item.body", Toolbar::Basic).required(),
        FieldDescriptor::checkbox("open_by_default", "accordions.item.open_by_default", false),
    ])
}

pub fn block_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("title", "accordions.title"),
        common::background_color(),
        common::padding(),
        common::visible_for(),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Accordions,
        NAME,
        Components::repeated(component_fields(), LIMITS),
        BlockSection::new(block_fields(), position),
    )
}
