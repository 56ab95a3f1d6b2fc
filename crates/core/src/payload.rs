//! Overlay payload values parsed from host JSON
//!
//! The host sends brushes, anchors and offsets as JSON strings. Parsing is
//! strict: a payload that does not match the expected shape is reported as
//! [`Error::InvalidPayload`] naming the argument it came from, so the caller
//! can surface it as a typed error.
//!
//! ## Wire shapes
//!
//! | Type | JSON |
//! |------|------|
//! | `Brush` | `{"fillColor":"#RRGGBBAA","strokeColor":"#RRGGBBAA","strokeWidth":1.0}` |
//! | `Anchor` | `"center"` (bare or JSON-quoted) |
//! | `PointWithUnit` | `{"x":{"value":0,"unit":"pixel"},"y":{"value":0,"unit":"pixel"}}` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

// =============================================================================
// Color
// =============================================================================

/// RGBA color, serialized as `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Color {
    /// Fully transparent black
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    /// Build a color from channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#RRGGBB` and `#RRGGBBAA`; a missing alpha means opaque.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("color must start with '#': {:?}", s))?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(format!("color must be #RRGGBB or #RRGGBBAA: {:?}", s));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| format!("invalid hex in color {:?}", s))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Brush
// =============================================================================

/// Fill and stroke used to highlight a label or field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brush {
    /// Fill color
    pub fill_color: Color,
    /// Stroke color
    pub stroke_color: Color,
    /// Stroke width in device independent pixels
    #[serde(default)]
    pub stroke_width: f64,
}

impl Brush {
    /// A brush that draws nothing.
    pub const fn transparent() -> Self {
        Brush {
            fill_color: Color::TRANSPARENT,
            stroke_color: Color::TRANSPARENT,
            stroke_width: 0.0,
        }
    }

    /// Parse a brush from the JSON passed under argument `field`.
    pub fn from_json(field: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid_payload(field, e))
    }

    /// JSON form used in event responses.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Default for Brush {
    fn default() -> Self {
        Brush::transparent()
    }
}

// =============================================================================
// Anchor
// =============================================================================

/// Attachment point of an advanced-overlay view relative to its label or field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    /// Top-left corner
    TopLeft,
    /// Middle of the top edge
    TopCenter,
    /// Top-right corner
    TopRight,
    /// Middle of the left edge
    CenterLeft,
    /// Center
    #[default]
    Center,
    /// Middle of the right edge
    CenterRight,
    /// Bottom-left corner
    BottomLeft,
    /// Middle of the bottom edge
    BottomCenter,
    /// Bottom-right corner
    BottomRight,
}

impl Anchor {
    /// Parse an anchor passed under argument `field`.
    ///
    /// Hosts send either the bare name (`center`) or a JSON string
    /// (`"center"`); both are accepted.
    pub fn from_json(field: &str, json: &str) -> Result<Self> {
        let trimmed = json.trim();
        let quoted;
        let candidate = if trimmed.starts_with('"') {
            trimmed
        } else {
            quoted = format!("\"{}\"", trimmed);
            &quoted
        };
        serde_json::from_str(candidate).map_err(|e| Error::invalid_payload(field, e))
    }

    /// Host name of the anchor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "topLeft",
            Anchor::TopCenter => "topCenter",
            Anchor::TopRight => "topRight",
            Anchor::CenterLeft => "centerLeft",
            Anchor::Center => "center",
            Anchor::CenterRight => "centerRight",
            Anchor::BottomLeft => "bottomLeft",
            Anchor::BottomCenter => "bottomCenter",
            Anchor::BottomRight => "bottomRight",
        }
    }
}

// =============================================================================
// Measured values
// =============================================================================

/// Unit of a measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureUnit {
    /// Physical pixels
    #[default]
    Pixel,
    /// Device independent pixels
    Dip,
    /// Fraction of the reference size
    Fraction,
}

/// A scalar with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatWithUnit {
    /// Magnitude
    pub value: f64,
    /// Unit
    pub unit: MeasureUnit,
}

impl FloatWithUnit {
    /// Create a value.
    pub const fn new(value: f64, unit: MeasureUnit) -> Self {
        FloatWithUnit { value, unit }
    }
}

/// A 2D offset with per-axis units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointWithUnit {
    /// Horizontal component
    pub x: FloatWithUnit,
    /// Vertical component
    pub y: FloatWithUnit,
}

impl PointWithUnit {
    /// Zero offset in pixels
    pub const ZERO: PointWithUnit = PointWithUnit {
        x: FloatWithUnit::new(0.0, MeasureUnit::Pixel),
        y: FloatWithUnit::new(0.0, MeasureUnit::Pixel),
    };

    /// Parse an offset passed under argument `field`.
    pub fn from_json(field: &str, json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid_payload(field, e))
    }

    /// JSON form used in event responses.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
