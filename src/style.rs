//! Colors, style presets and the currently selected style.

use image::Rgba;
use std::fmt;
use std::str::FromStr;

use crate::error::{QreatorError, Result};

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (the leading `#` is optional).
    ///
    /// # Example
    ///
    /// ```
    /// use qreator::style::Color;
    ///
    /// assert_eq!(Color::from_hex("#ffa000").unwrap(), Color::rgb(0xff, 0xa0, 0x00));
    /// assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || QreatorError::InvalidColor(hex.to_string());
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
                Ok(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = QreatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// The color triple applied to the main preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedStyle {
    pub dots_color: Color,
    pub background_color: Color,
    pub corners_color: Color,
}

impl Default for SelectedStyle {
    /// Black on white, used before anything has been generated.
    fn default() -> Self {
        Self {
            dots_color: Color::BLACK,
            background_color: Color::WHITE,
            corners_color: Color::BLACK,
        }
    }
}

/// A palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePreset {
    /// Tooltip text.
    pub label: &'static str,
    /// Placeholder content rendered in the thumbnail.
    pub value: &'static str,
    /// Icon drawn over the thumbnail, if any.
    pub image: Option<&'static str>,
    pub dots_color: Color,
    pub background_color: Color,
    pub corners_color: Color,
}

impl StylePreset {
    pub fn style(&self) -> SelectedStyle {
        SelectedStyle {
            dots_color: self.dots_color,
            background_color: self.background_color,
            corners_color: self.corners_color,
        }
    }
}

/// The palette, in display order. The first entry is applied on every generation.
pub const PRESETS: [StylePreset; 5] = [
    StylePreset {
        label: "SVG Preview 1",
        value: "https://svg-preview.com/1",
        image: Some("/qr-preview-1.svg"),
        dots_color: Color::rgb(0x00, 0x00, 0x00),
        background_color: Color::rgb(0xff, 0xff, 0xff),
        corners_color: Color::rgb(0x00, 0x00, 0x00),
    },
    StylePreset {
        label: "SVG Preview 2",
        value: "https://svg-preview.com/2",
        image: Some("/qr-preview-2.svg"),
        dots_color: Color::rgb(0x18, 0x77, 0xf2),
        background_color: Color::rgb(0xff, 0xff, 0xff),
        corners_color: Color::rgb(0x18, 0x77, 0xf2),
    },
    StylePreset {
        label: "SVG Preview 3",
        value: "https://svg-preview.com/3",
        image: Some("/qr-preview-3.svg"),
        dots_color: Color::rgb(0xff, 0xa0, 0x00),
        background_color: Color::rgb(0x00, 0x00, 0x00),
        corners_color: Color::rgb(0xff, 0xcd, 0x4e),
    },
    StylePreset {
        label: "SVG Preview 4",
        value: "https://svg-preview.com/4",
        image: Some("/qr-preview-4.svg"),
        dots_color: Color::rgb(0x7b, 0x1f, 0xa2),
        background_color: Color::rgb(0xff, 0xff, 0xff),
        corners_color: Color::rgb(0x51, 0x2d, 0xa8),
    },
    StylePreset {
        label: "SVG Preview 5",
        value: "https://svg-preview.com/5",
        image: Some("/qr-preview-5.svg"),
        dots_color: Color::rgb(0xff, 0x71, 0x71),
        background_color: Color::rgb(0x00, 0x00, 0x00),
        corners_color: Color::rgb(0xff, 0x71, 0x71),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::from_hex("#000").unwrap(), Color::BLACK);
        assert_eq!("1877f2".parse::<Color>().unwrap(), Color::rgb(0x18, 0x77, 0xf2));
        assert!(Color::from_hex("#12").is_err());
        assert!(Color::from_hex("#gggggg").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Color::rgb(0xff, 0xcd, 0x4e).to_string(), "#ffcd4e");
        assert_eq!(Color::BLACK.to_rgba(), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_default_style_matches_first_preset() {
        assert_eq!(SelectedStyle::default(), PRESETS[0].style());
    }

    #[test]
    fn test_preset_values_are_placeholders() {
        for (i, preset) in PRESETS.iter().enumerate() {
            assert_eq!(preset.value, format!("https://svg-preview.com/{}", i + 1));
        }
    }
}
