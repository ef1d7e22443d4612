//! Buttons block: a row of one to four buttons.
//!
//! A button links either to an internal page (`link`) or to an external
//! `url`; the renderer prefers the page when both are set.

use super::common;
use blockpress_model::options::{Alignment, PickerSource};
use blockpress_model::{
    BlockSection, Components, ContentBlockConfig, FieldDescriptor, Limits, Schema, SelectOption,
};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.buttons";
pub const LIMITS: Limits = Limits::new(1, 4);

pub fn variant_options() -> Vec<SelectOption> {
    ["primary", "secondary", "ghost"]
        .iter()
        .map(|v| SelectOption::new(*v, format!("buttons.variant.{v}")))
        .collect()
}

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("label", "buttons.label").required().max_length(40),
        FieldDescriptor::content("link", "buttons.link", PickerSource::Pages),
        FieldDescriptor::url("url", "buttons.url"),
        FieldDescriptor::select("variant", "buttons.variant", variant_options(), "primary"),
        FieldDescriptor::icon("icon", "buttons.icon"),
    ])
}

pub fn block_fields() -> Schema {
    Schema::new(vec![
        common::background_color(),
        common::padding(),
        common::visible_for(),
        FieldDescriptor::align("alignment", "buttons.alignment", Alignment::Left),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Buttons,
        NAME,
        Components::repeated(component_fields(), LIMITS),
        BlockSection::new(block_fields(), position),
    )
}
