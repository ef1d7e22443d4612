//! Page overview: cards for hand-picked pages, optionally filtered by tag.

use super::common;
use blockpress_model::options::PickerSource;
use blockpress_model::{BlockSection, Components, ContentBlockConfig, FieldDescriptor, Schema, SelectOption};
use blockpress_types::BlockType;

pub const NAME: &str = "blocks.page_overview";
pub const MAX_PAGES: usize = 12;

pub fn column_options() -> Vec<SelectOption> {
    ["2", "3", "4"]
        .iter()
        .map(|c| SelectOption::new(*c, format!("page_overview.columns.{c}")))
        .collect()
}

pub fn component_fields() -> Schema {
    Schema::new(vec![
        FieldDescriptor::content_many("pages", "page_overview.pages", PickerSource::Pages, Some(MAX_PAGES)),
        // Tags are free-form and older pages stored them as a comma list.
        FieldDescriptor::tags("tags", "page_overview.tags", Some(10)).waive_validation(),
        FieldDescriptor::select("columns", "page_overview.columns", column_options(), "3"),
        FieldDescriptor::date("published_after", "page_overview.published_after", false),
    ])
}

pub fn create(position: u32) -> ContentBlockConfig {
    ContentBlockConfig::new(
        BlockType::PageOverview,
        NAME,
        Components::single(component_fields()),
        BlockSection::new(common::block_fields(), position),
    )
}
