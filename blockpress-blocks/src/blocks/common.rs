//! Block-wide settings shared by most block types.

use blockpress_model::options::{Color, Padding, PickerSource};
use blockpress_model::{FieldDescriptor, Schema, SelectOption};

pub const BACKGROUND_COLOR: &str = "background_color";
pub const HEADER_BACKGROUND: &str = "header_background";
pub const PADDING: &str = "padding";
pub const VISIBLE_FOR: &str = "visible_for";

pub fn background_color() -> FieldDescriptor {
    FieldDescriptor::color(BACKGROUND_COLOR, "block.background_color", Color::White)
}

pub fn header_background() -> FieldDescriptor {
    FieldDescriptor::color(HEADER_BACKGROUND, "block.header_background", Color::Transparent)
}

pub fn padding() -> FieldDescriptor {
    FieldDescriptor::select(PADDING, "block.padding", padding_options(), Padding::Medium.as_str())
}

/// User groups the block is shown to; empty means everyone.
pub fn visible_for() -> FieldDescriptor {
    FieldDescriptor::content_many(VISIBLE_FOR, "block.visible_for", PickerSource::UserGroups, None)
}

pub fn padding_options() -> Vec<SelectOption> {
    Padding::ALL
        .iter()
        .map(|p| SelectOption::new(p.as_str(), format!("block.padding.{}", p.as_str())))
        .collect()
}

/// The standard block settings.
pub fn block_fields() -> Schema {
    Schema::new(vec![background_color(), padding(), visible_for()])
}

/// The standard block settings plus a header background.
pub fn block_fields_with_header() -> Schema {
    Schema::new(vec![background_color(), header_background(), padding(), visible_for()])
}
