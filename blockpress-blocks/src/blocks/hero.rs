//! Hero block: full-width image or video with a headline.

use super::common;
use blockpress_model::options::{Alignment, MediaKind, PickerSource};
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.hero";

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("title", "hero.title").required().max_length(80),
        FieldDescriptor::text("subtitle", "hero.subtitle"),
        FieldDescriptor::file("image", "hero.image", &[MediaKind::Image]).required(),
        // Optional background video; the image stays the poster frame.
        FieldDescriptor::file("video", "hero.video", &[MediaKind::Video]),
        FieldDescriptor::text("button_label", "hero.button_label"),
        FieldDescriptor::content("button_link", "hero.button_link", PickerSource::Pages),
        FieldDescriptor::checkbox("overlay", "hero.overlay", true),
        FieldDescriptor::align("text_alignment", "hero.text_alignment", Alignment::Center),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Hero,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields_with_header(), position),
    )
}
