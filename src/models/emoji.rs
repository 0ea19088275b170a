use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest text the render endpoint accepts, in characters.
pub const MAX_TEXT_CHARS: usize = 20;

pub const EMOJI_WIDTH: u32 = 128;
pub const EMOJI_HEIGHT: u32 = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

impl fmt::Display for TextAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(TextAlign::Left),
            "center" => Ok(TextAlign::Center),
            "right" => Ok(TextAlign::Right),
            other => Err(format!("unknown alignment '{}'", other)),
        }
    }
}

/// Payload of `POST /emoji`. Field names are the wire names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub text: String,
    pub width: u32,
    pub height: u32,
    pub align: TextAlign,
    pub color: String,
    pub background_color: String,
    pub typeface_name: String,
    pub size_fixed: bool,
    pub disable_stretch: bool,
}

/// Raw image returned by the render endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

impl BinaryImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
