use super::common;
use blockpress_model::options::MediaKind;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Limits, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.logo_grid";
pub const LIMITS: Limits = Limits::new(2, 12);

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::file("logo", "logo_grid.logo", &[MediaKind::Image]).required(),
        FieldDescriptor::text("name", "logo_grid.name").required(),
        FieldDescriptor::url("url", "logo_grid.url"),
    ])
}

pub fn block_fields() -> Schema {
    Schema::new(vec![
        common::background_color(),
        common::padding(),
        common::visible_for(),
        FieldDescriptor::checkbox("grayscale", "logo_grid.grayscale", true),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::LogoGrid,
        NAME,
        Components::repeated(component_fields(), LIMITS),
        BlockSection::new(block_fields(), position),
    )
}
