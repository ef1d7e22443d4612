//! Site search box with optional result filters.

use super::common;
use blockpress_model::{
    BlockSection, Components, ContentBlockConfig, Editor, FieldDescriptor, Schema, SelectOption, SelectProps,
};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.search";

fn content_types() -> FieldDescriptor {
    let options = ["pages", "media", "forms"]
        .iter()
        .map(|t| SelectOption::new(*t, format!("search.content_types.{t}")))
        .collect();
    FieldDescriptor::new(
        "content_types",
        "search.content_types",
        Editor::Select(SelectProps {
            options,
            default: None,
            multiple: true,
        }),
    )
}

pub fn component_fields() -> Schema {
    let per_page = ["10", "20", "50"]
        .iter()
        .map(|n| SelectOption::new(*n, *n))
        .collect();
    Schema::new(vec![
        FieldDescriptor::text("placeholder", "search.placeholder").max_length(60),
        content_types(),
        FieldDescriptor::select("results_per_page", "search.results_per_page", per_page, "10"),
        FieldDescriptor::checkbox("show_filters", "search.show_filters", true),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Search,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields(), position),
    )
}
