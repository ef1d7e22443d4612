//! Closed option sets used by the select-style editors.
//!
//! State stores these as their snake_case names so that stored JSON stays
//! readable and independent of the Rust enum layout.

use serde::{Deserialize, Serialize};

macro_rules! named_options {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Every option, in display order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored name of this option.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Looks an option up by its stored name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|o| o.as_str() == name)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Background and accent colours offered by the colour selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    White,
    LightGray,
    Primary,
    Secondary,
    Dark,
    Transparent,
}

named_options!(Color {
    White => "white",
    LightGray => "light_gray",
    Primary => "primary",
    Secondary => "secondary",
    Dark => "dark",
    Transparent => "transparent",
});

/// Vertical spacing around a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Padding {
    None,
    Small,
    Medium,
    Large,
}

named_options!(Padding {
    None => "none",
    Small => "small",
    Medium => "medium",
    Large => "large",
});

/// Horizontal alignment of text or media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

named_options!(Alignment {
    Left => "left",
    Center => "center",
    Right => "right",
});

/// Kind of media a file upload accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Document,
}

named_options!(MediaKind {
    Image => "image",
    Video => "video",
    Audio => "audio",
    Document => "document",
});

impl MediaKind {
    /// Whether a MIME type belongs to this kind.
    pub fn matches_mime(&self, mime: &str) -> bool {
        let mime = mime.trim().to_ascii_lowercase();
        match self {
            MediaKind::Image => mime.starts_with("image/"),
            MediaKind::Video => mime.starts_with("video/"),
            MediaKind::Audio => mime.starts_with("audio/"),
            MediaKind::Document => {
                mime == "application/pdf"
                    || mime.starts_with("text/")
                    || mime.starts_with("application/vnd.")
                    || mime == "application/msword"
            }
        }
    }
}

/// What a content picker selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerSource {
    Pages,
    Media,
    UserGroups,
    Forms,
}

named_options!(PickerSource {
    Pages => "pages",
    Media => "media",
    UserGroups => "user_groups",
    Forms => "forms",
});

/// Input format enforced by a plain text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    #[default]
    Plain,
    Url,
    Email,
}

/// Toolbar preset of the rich text editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Toolbar {
    #[default]
    Basic,
    Full,
}
