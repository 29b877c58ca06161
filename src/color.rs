//! Hex color parsing and color distance metrics.

use std::fmt;
use std::str::FromStr;

use palette::color_difference::Ciede2000;
use palette::{IntoColor, Lab, Srgb};
use serde::{Deserialize, Serialize};

use crate::error::{RecolorError, Result};

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorTriplet {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorTriplet {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#RRGGBB` or `RRGGBB` string.
    ///
    /// Exactly six hex digits are required; shorthand like `#fff` and
    /// surrounding whitespace are rejected.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RecolorError::InvalidColorFormat(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| RecolorError::InvalidColorFormat(hex.to_string()))
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Formats as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn as_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Euclidean distance in RGB space.
    pub fn distance(&self, other: &Self) -> f64 {
        rgb_distance(
            [self.r as f64, self.g as f64, self.b as f64],
            [other.r as f64, other.g as f64, other.b as f64],
        )
    }

    /// CIEDE2000 difference, computed in D65 Lab.
    pub fn delta_e(&self, other: &Self) -> f32 {
        self.to_lab().difference(other.to_lab())
    }

    fn to_lab(self) -> Lab {
        Srgb::new(self.r, self.g, self.b)
            .into_format::<f32>()
            .into_linear()
            .into_color()
    }
}

/// Euclidean distance between two RGB points.
pub fn rgb_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Parses a hex color string into a [`ColorTriplet`].
pub fn hex_to_rgb(hex: &str) -> Result<ColorTriplet> {
    ColorTriplet::from_hex(hex)
}

/// Formats a [`ColorTriplet`] as `#rrggbb`.
pub fn rgb_to_hex(color: ColorTriplet) -> String {
    color.to_hex()
}

impl FromStr for ColorTriplet {
    type Err = RecolorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for ColorTriplet {
    type Error = RecolorError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<ColorTriplet> for String {
    fn from(color: ColorTriplet) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for ColorTriplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(hex_to_rgb("#112233").unwrap(), ColorTriplet::new(0x11, 0x22, 0x33));
        assert_eq!(hex_to_rgb("FF0000").unwrap(), ColorTriplet::new(255, 0, 0));
        assert_eq!(hex_to_rgb("#aBcDeF").unwrap(), ColorTriplet::new(0xab, 0xcd, 0xef));
    }

    #[test]
    fn rejects_anything_but_six_digits() {
        for bad in ["#fff", "fff", "#1122334", "#11223", "", "#", "#GG0000", " #112233", "#112233 ", "##112233", "#+1+2+3"] {
            let err = hex_to_rgb(bad).unwrap_err();
            assert!(
                matches!(err, RecolorError::InvalidColorFormat(ref s) if s == bad),
                "expected InvalidColorFormat for {bad:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn hex_formatting_is_lowercase() {
        let color = ColorTriplet::new(0xAB, 0x01, 0xFF);
        assert_eq!(color.to_hex(), "#ab01ff");
        assert_eq!(rgb_to_hex(color), "#ab01ff");
        assert_eq!(color.to_string(), "#ab01ff");
        assert_eq!(hex_to_rgb(&color.to_hex()).unwrap(), color);
    }

    #[test]
    fn euclidean_distance() {
        let black = ColorTriplet::new(0, 0, 0);
        let c = ColorTriplet::new(3, 4, 0);
        assert!((black.distance(&c) - 5.0).abs() < 1e-9);
        assert_eq!(c.distance(&c), 0.0);
    }

    #[test]
    fn delta_e_orders_like_perception() {
        let red = ColorTriplet::new(255, 0, 0);
        let near = ColorTriplet::new(250, 5, 5);
        let far = ColorTriplet::new(0, 0, 255);
        assert!(red.delta_e(&red) < 0.001);
        assert!(red.delta_e(&near) < red.delta_e(&far));
    }

    #[test]
    fn serde_uses_hex_string() {
        let color = ColorTriplet::new(0x11, 0x22, 0x33);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#112233\"");
        let back: ColorTriplet = serde_json::from_str("\"#112233\"").unwrap();
        assert_eq!(back, color);
        assert!(serde_json::from_str::<ColorTriplet>("\"#123\"").is_err());
    }
}
