//! Spotlight: image beside a short text, with the image on either side.

use super::common;
use blockpress_model::options::{Alignment, MediaKind, PickerSource, Toolbar};
use blockpress_model::{
    AlignSelectProps, BlockSection, Components, ContentBlockConfig, Editor, FieldDescriptor, Schema,
};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.spotlight";

fn image_position() -> FieldDescriptor {
    // Centered images would leave no room for the text column.
    FieldDescriptor::new(
        "image_position",
        "spotlight.image_position",
        Editor::AlignSelect(AlignSelectProps {
            allowed: vec![Alignment::Left, Alignment::Right],
            default: Alignment::Right,
        }),
    )
}

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("title", "spotlight.title").required(),
        FieldDescriptor::wysiwyg("body", "spotlight.body", Toolbar::Basic),
        FieldDescriptor::file("image", "spotlight.image", &[MediaKind::Image]).required(),
        image_position(),
        FieldDescriptor::text("button_label", "spotlight.button_label"),
        FieldDescriptor::content("button_link", "spotlight.button_link", PickerSource::Pages),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Spotlight,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields_with_header(), position),
    )
}
