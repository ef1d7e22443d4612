//! Image grid: exactly three tiles.
//!
//! The grid layout is fixed at three columns, so the tile count is not
//! adjustable in the editor and a save with any other count is rejected.

use super::common;
use blockpress_model::options::{MediaKind, PickerSource};
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Limits, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.image_grid";
pub const LIMITS: Limits = Limits::exactly(3);

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::file("image", "image_grid.image", &[MediaKind::Image]).required(),
        FieldDescriptor::text("caption", "image_grid.caption").max_length(140),
        FieldDescriptor::content("link", "image_grid.link", PickerSource::Pages),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::ImageGrid,
        NAME,
        Components::repeated(component_fields(), LIMITS),
        BlockSection::new(common::block_fields(), position),
    )
}
