//! Unique-selling-point grid: icon, title and a short description per tile.

use super::common;
use blockpress_model::{
    BlockSection, Components, ContentBlockConfig, FieldDescriptor, Limits, Schema, SelectOption,
};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.usp_grid";
pub const LIMITS: Limits = Limits::new(3, 6);

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::icon("icon", "usp_grid.icon").required(),
        FieldDescriptor::text("title", "usp_grid.title").required().max_length(60),
        FieldDescriptor::text("description", "usp_grid.description").max_length(200),
    ])
}

pub fn block_fields() -> Schema {
    let columns = vec![
        SelectOption::new("3", "usp_grid.columns.3"),
        SelectOption::new("4", "usp_grid.columns.4"),
    ];
    Schema::new(vec![
        common::background_color(),
        common::padding(),
        common::visible_for(),
        FieldDescriptor::select("columns", "usp_grid.columns", columns, "3"),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::UspGrid,
        NAME,
        Components::repeated(component_fields(), LIMITS),
        BlockSection::new(block_fields(), position),
    )
}
