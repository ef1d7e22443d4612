//! Heading block: a page or section title with an optional subtitle.

use super::common;
use blockpress_model::options::Alignment;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema, SelectOption};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.heading";

/// Longest title the renderer lays out on one line at desktop width.
pub const TITLE_MAX_LENGTH: usize = 120;

pub fn level_options() -> Vec<SelectOption> {
    ["h1", "h2", "h3", "h4"]
        .iter()
        .map(|level| SelectOption::new(*level, format!("heading.level.{level}")))
        .collect()
}

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("title", "heading.title")
            .required()
            .max_length(TITLE_MAX_LENGTH),
        FieldDescriptor::text("subtitle", "heading.subtitle"),
        FieldDescriptor::select("level", "heading.level", level_options(), "h2"),
        FieldDescriptor::align("alignment", "heading.alignment", Alignment::Left),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Heading,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields(), position),
    )
}
