use super::common;
use blockpress_model::options::MediaKind;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Limits, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.media_grid";
pub const LIMITS: Limits = Limits::new(1, 8);

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::file("media", "media_grid.media", &[MediaKind::Image, MediaKind::Video]).required(),
        FieldDescriptor::text("title", "media_grid.title"),
        FieldDescriptor::date("published_at", "media_grid.published_at", false),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::MediaGrid,
        NAME,
        Components::repeated(component_fields(), LIMITS),
        BlockSection::new(common::block_fields(), position),
    )
}
