//! Hex ↔ RGBA conversions for the text and background colors.
//!
//! Colors are stored and sent over the wire as canonical lowercase
//! `#rrggbbaa` strings. [`RgbaColor`] is the structured form used while
//! editing: presets and the picker replace only red/green/blue, the alpha
//! channel is changed through [`RgbaColor::with_channel`] alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Swatches offered next to each color input.
pub const PRESET_COLORS: [&str; 12] = [
    "#FFFFFF", "#6B7280", "#1A1A1A", "#EF4444", "#F59E0B", "#F8E71C", "#84CC16", "#22C55E",
    "#3B82F6", "#6366F1", "#8B5CF6", "#EC4899",
];

/// Fully transparent black, sent when the background is disabled.
pub const TRANSPARENT: &str = "#00000000";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("expected 3, 4, 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit '{0}'")]
    InvalidDigit(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Channel::R),
            "g" | "green" => Ok(Channel::G),
            "b" | "blue" => Ok(Channel::B),
            "a" | "alpha" => Ok(Channel::A),
            other => Err(format!("unknown channel '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f64,
}

impl RgbaColor {
    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Takes red, green and blue from `other` and keeps this color's alpha.
    pub fn with_rgb_of(self, other: RgbaColor) -> Self {
        Self {
            r: other.r,
            g: other.g,
            b: other.b,
            a: self.a,
        }
    }

    /// Sets one channel from a numeric input. RGB values are clamped to
    /// `[0, 255]` and rounded, alpha is clamped to `[0, 1]`. NaN is ignored.
    pub fn with_channel(self, channel: Channel, value: f64) -> Self {
        if value.is_nan() {
            return self;
        }
        let byte = || value.clamp(0.0, 255.0).round() as u8;
        match channel {
            Channel::R => Self { r: byte(), ..self },
            Channel::G => Self { g: byte(), ..self },
            Channel::B => Self { b: byte(), ..self },
            Channel::A => Self {
                a: value.clamp(0.0, 1.0),
                ..self
            },
        }
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, alpha)
    }
}

impl FromStr for RgbaColor {
    type Err = ColorParseError;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(bad));
        }

        // All digits are ASCII past this point, so byte slicing is safe.
        let nibble = |i: usize| u8::from_str_radix(&digits[i..=i], 16).map(|n| n * 17);
        let pair = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);

        let parsed = match digits.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(255)),
            4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
            6 => (pair(0), pair(2), pair(4), Ok(255)),
            8 => (pair(0), pair(2), pair(4), pair(6)),
            len => return Err(ColorParseError::InvalidLength(len)),
        };

        match parsed {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Self {
                r,
                g,
                b,
                a: a as f64 / 255.0,
            }),
            _ => Err(ColorParseError::InvalidLength(digits.len())),
        }
    }
}

pub fn hex_to_rgba(hex: &str) -> Result<RgbaColor, ColorParseError> {
    hex.parse()
}

pub fn rgba_to_hex(color: RgbaColor) -> String {
    color.to_hex()
}

/// Re-serializes any accepted hex form as `#rrggbbaa`.
pub fn normalize_hex(hex: &str) -> Result<String, ColorParseError> {
    hex_to_rgba(hex).map(rgba_to_hex)
}

/// Whether a swatch should be highlighted for the current color.
pub fn is_preset_active(color: &str, preset: &str) -> bool {
    color
        .to_ascii_lowercase()
        .starts_with(&preset.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_eight_digit_hex() {
        for hex in ["#ffffffff", "#00000000", "#1A2b3C4d", "#ef444480", "#3b82f601"] {
            let color = hex_to_rgba(hex).unwrap();
            assert_eq!(rgba_to_hex(color), hex.to_lowercase());
        }
    }

    #[test]
    fn test_serialize_then_parse_keeps_channels() {
        let colors = [
            RgbaColor::new(0, 0, 0, 0.0),
            RgbaColor::new(255, 128, 7, 0.5),
            RgbaColor::new(12, 200, 99, 0.333),
            RgbaColor::new(1, 2, 3, 1.0),
        ];
        for color in colors {
            let back = hex_to_rgba(&rgba_to_hex(color)).unwrap();
            assert_eq!((back.r, back.g, back.b), (color.r, color.g, color.b));
            assert!((back.a - color.a).abs() <= 1.0 / 255.0);
        }
    }

    #[test]
    fn test_short_forms_and_missing_alpha() {
        let short = hex_to_rgba("#f80").unwrap();
        assert_eq!((short.r, short.g, short.b, short.a), (255, 136, 0, 1.0));

        let short_alpha = hex_to_rgba("f808").unwrap();
        assert_eq!(rgba_to_hex(short_alpha), "#ff880088");

        let six = hex_to_rgba("#3B82F6").unwrap();
        assert_eq!(rgba_to_hex(six), "#3b82f6ff");
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        assert_eq!(hex_to_rgba("#12345"), Err(ColorParseError::InvalidLength(5)));
        assert_eq!(hex_to_rgba(""), Err(ColorParseError::InvalidLength(0)));
        assert_eq!(hex_to_rgba("#gg0000"), Err(ColorParseError::InvalidDigit('g')));
        assert_eq!(hex_to_rgba("#ffé"), Err(ColorParseError::InvalidDigit('é')));
    }

    #[test]
    fn test_preset_keeps_current_alpha() {
        let current = RgbaColor::new(10, 20, 30, 0.5);
        let preset = hex_to_rgba("#EF4444").unwrap();
        let applied = current.with_rgb_of(preset);
        assert_eq!((applied.r, applied.g, applied.b), (0xef, 0x44, 0x44));
        assert_eq!(applied.a, 0.5);
        assert_eq!(rgba_to_hex(applied), "#ef444480");
    }

    #[test]
    fn test_channel_edits_clamp_and_round() {
        let color = RgbaColor::new(0, 0, 0, 1.0);
        assert_eq!(color.with_channel(Channel::R, 300.0).r, 255);
        assert_eq!(color.with_channel(Channel::G, -4.0).g, 0);
        assert_eq!(color.with_channel(Channel::B, 127.6).b, 128);
        assert_eq!(color.with_channel(Channel::A, 1.7).a, 1.0);
        assert_eq!(color.with_channel(Channel::A, 0.25).a, 0.25);
        assert_eq!(color.with_channel(Channel::R, f64::NAN), color);
    }

    #[test]
    fn test_preset_highlight() {
        assert!(is_preset_active("#ef4444ff", "#EF4444"));
        assert!(!is_preset_active("#ef4445ff", "#EF4444"));
    }
}
