// src/color.rs

//! Defines the `Rgba` color type used by every drawing call, plus a few named
//! colors and hex parsing for configuration files.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// RGBA color in 32-bit format (8 bits per channel).
///
/// Alpha is only consumed transiently while blending; the framebuffer stores
/// RGB only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const GREEN: Rgba = Rgba::opaque(0, 255, 0);
    pub const BLUE: Rgba = Rgba::opaque(0, 0, 255);
    pub const YELLOW: Rgba = Rgba::opaque(255, 255, 0);
    /// Placeholder color used when an image resource cannot be loaded.
    pub const MID_GRAY: Rgba = Rgba::opaque(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Builds a color from wide integer channels, saturating each to [0,255].
    pub fn saturating(r: i32, g: i32, b: i32, a: i32) -> Self {
        let clamp = |v: i32| v.clamp(0, 255) as u8;
        Self::new(clamp(r), clamp(g), clamp(b), clamp(a))
    }

    /// Returns the same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    /// Opaque white, the usual text color on the matrix.
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl From<(u8, u8, u8)> for Rgba {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgba::opaque(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Rgba::new(r, g, b, a)
    }
}

/// Error returned when a `#RRGGBB` / `#RRGGBBAA` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(pub String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

// Colors appear in config files as hex strings.
impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
