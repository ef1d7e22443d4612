//! Call-to-action cards, each with its own small set of buttons.

use super::common;
use blockpress_model::options::{MediaKind, PickerSource, Toolbar};
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Limits, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.ctas";
pub const LIMITS: Limits = Limits::new(1, 2);
pub const BUTTON_LIMITS: Limits = Limits::new(0, 2);

pub fn button_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("label", "ctas.button.label").required(),
        FieldDescriptor::content("link", "ctas.button.link", PickerSource::Pages).required(),
    ])
}

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::text("title", "ctas.title").required(),
        FieldDescriptor::wysiwyg("description", "ctas.description", Toolbar::Basic),
        FieldDescriptor::file("image", "ctas.image", &[MediaKind::Image]),
        FieldDescriptor::group("buttons", "ctas.buttons", button_fields(), BUTTON_LIMITS),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::Ctas,
        NAME,
        Components::repeated(component_fields(), LIMITS),
        BlockSection::new(common::block_fields_with_header(), position),
    )
}
