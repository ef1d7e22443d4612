//! Media player for a single video or audio file.

use super::common;
use blockpress_model::options::MediaKind;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.media_player";

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::file("media", "media_player.media", &[MediaKind::Video, MediaKind::Audio]).required(),
        FieldDescriptor::file("poster", "media_player.poster", &[MediaKind::Image]),
        FieldDescriptor::text("title", "media_player.title"),
        FieldDescriptor::checkbox("autoplay", "media_player.autoplay", false),
        FieldDescriptor::checkbox("loop", "media_player.loop", false),
        // Playback window as a percentage of the media duration.
        FieldDescriptor::range("trim", "media_player.trim", 0.0, 100.0, 1.0),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::MediaPlayer,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields(), position),
    )
}
