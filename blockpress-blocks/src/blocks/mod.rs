//! Built-in block types.
//!
//! Each module declares the component schema of one block type and a
//! `create(position)` factory. Default state is always derived from the
//! schema, so a factory cannot drift from its own field list.

pub mod accordions;
pub mod buttons;
pub mod common;
pub mod ctas;
pub mod heading;
pub mod hero;
pub mod iframe;
pub mod image_grid;
pub mod logo_grid;
pub mod media_grid;
pub mod media_player;
pub mod page_overview;
pub mod quote;
pub mod rich_text;
pub mod search;
pub mod spotlight;
pub mod usp_grid;

use crate::registry::BlockDefinition;
use blockpress_types::BlockType;

/// Definitions of every built-in block type, in picker order.
pub fn builtin_definitions() -> Vec<BlockDefinition> {
    vec![
        BlockDefinition::new(BlockType::Heading, heading::NAME, heading::create),
        BlockDefinition::new(BlockType::RichText, rich_text::NAME, rich_text::create),
        BlockDefinition::new(BlockType::Buttons, buttons::NAME, buttons::create),
        BlockDefinition::new(BlockType::Ctas, ctas::NAME, ctas::create),
        BlockDefinition::new(BlockType::Hero, hero::NAME, hero::create),
        BlockDefinition::new(BlockType::ImageGrid, image_grid::NAME, image_grid::create),
        BlockDefinition::new(BlockType::LogoGrid, logo_grid::NAME, logo_grid::create),
        BlockDefinition::new(BlockType::UspGrid, usp_grid::NAME, usp_grid::create),
        BlockDefinition::new(BlockType::MediaPlayer, media_player::NAME, media_player::create),
        BlockDefinition::new(BlockType::MediaGrid, media_grid::NAME, media_grid::create),
        BlockDefinition::new(BlockType::Accordions, accordions::NAME, accordions::create),
        BlockDefinition::new(BlockType::Iframe, iframe::NAME, iframe::create),
        BlockDefinition::new(BlockType::Quote, quote::NAME, quote::create),
        BlockDefinition::new(BlockType::Spotlight, spotlight::NAME, spotlight::create),
        BlockDefinition::new(BlockType::PageOverview, page_overview::NAME, page_overview::create),
        BlockDefinition::new(BlockType::Search, search::NAME, search::create),
    ]
}
