use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Discriminator selecting a block's schema, factory and renderer.
///
/// The set is open: the built-in kinds have their own variants and any
/// other stored name round-trips through [`BlockType::Custom`]. The storage
/// representation is the snake_case name returned by [`BlockType::as_str`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockType {
    Heading,
    RichText,
    Buttons,
    Ctas,
    Hero,
    ImageGrid,
    LogoGrid,
    UspGrid,
    MediaPlayer,
    MediaGrid,
    Accordions,
    Iframe,
    Quote,
    Spotlight,
    PageOverview,
    Search,
    /// A kind registered outside the built-in set.
    Custom(String),
}

impl BlockType {
    /// Every built-in block type, in the order the block picker lists them.
    pub const BUILTIN: &'static [BlockType] = &[
        BlockType::Heading,
        BlockType::RichText,
        BlockType::Buttons,
        BlockType::Ctas,
        BlockType::Hero,
        BlockType::ImageGrid,
        BlockType::LogoGrid,
        BlockType::UspGrid,
        BlockType::MediaPlayer,
        BlockType::MediaGrid,
        BlockType::Accordions,
        BlockType::Iframe,
        BlockType::Quote,
        BlockType::Spotlight,
        BlockType::PageOverview,
        BlockType::Search,
    ];

    /// The stored name of this block type.
    pub fn as_str(&self) -> &str {
        match self {
            BlockType::Heading => "heading",
            BlockType::RichText => "rich_text",
            BlockType::Buttons => "buttons",
            BlockType::Ctas => "ctas",
            BlockType::Hero => "hero",
            BlockType::ImageGrid => "image_grid",
            BlockType::LogoGrid => "logo_grid",
            BlockType::UspGrid => "usp_grid",
            BlockType::MediaPlayer => "media_player",
            BlockType::MediaGrid => "media_grid",
            BlockType::Accordions => "accordions",
            BlockType::Iframe => "iframe",
            BlockType::Quote => "quote",
            BlockType::Spotlight => "spotlight",
            BlockType::PageOverview => "page_overview",
            BlockType::Search => "search",
            BlockType::Custom(name) => name,
        }
    }

    /// Returns true for the built-in kinds.
    pub fn is_builtin(&self) -> bool {
        !matches!(self, BlockType::Custom(_))
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(crate::Error::EmptyBlockType);
        }
        Ok(BlockType::BUILTIN
            .iter()
            .find(|t| t.as_str() == name)
            .cloned()
            .unwrap_or_else(|| BlockType::Custom(name.to_string())))
    }
}

impl Serialize for BlockType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
