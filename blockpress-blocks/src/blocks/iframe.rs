//! Embedded third-party page.

use super::common;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema, SelectOption};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.iframe";

pub fn height_options() -> Vec<SelectOption> {
    ["small", "medium", "large"]
        .iter()
        .map(|h| SelectOption::new(*h, format!("iframe.height.{h}")))
        .collect()
}

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::url("url", "iframe.url").required(),
        // Screen readers announce the frame by this title.
        FieldDescriptor::text("title", "iframe.title").required(),
        FieldDescriptor::select("height", "iframe.height", height_options(), "medium"),
        FieldDescriptor::checkbox("allow_fullscreen", "iframe.allow_fullscreen", true),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Iframe,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields(), position),
    )
}
