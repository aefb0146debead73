use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// Opaque RGB color. Parses `#rrggbb`, `#rgb` and a few CSS names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid color '{0}', expected #rrggbb, #rgb or a color name")]
pub struct ColorParseError(pub String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        let named = match value.as_str() {
            "black" => Some([0, 0, 0]),
            "white" => Some([255, 255, 255]),
            "red" => Some([255, 0, 0]),
            "green" => Some([0, 128, 0]),
            "blue" => Some([0, 0, 255]),
            "yellow" => Some([255, 255, 0]),
            "gray" | "grey" => Some([128, 128, 128]),
            _ => None,
        };
        if let Some(rgb) = named {
            return Ok(Color(rgb));
        }

        let err = || ColorParseError(s.to_string());
        let hex = value.strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Color([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ])),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Color([short(0)?, short(1)?, short(2)?]))
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// How a background image is fitted to the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundMode {
    /// Resized to exactly the frame, ignoring aspect ratio.
    Stretch,
    /// Shrunk (never enlarged) to fit and centered on the background color.
    Letterbox,
}

#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pub image: RgbImage,
    pub mode: BackgroundMode,
}

#[derive(Debug, Clone)]
pub struct CaptionStyle {
    pub font_size: u32,
    pub background_color: Color,
    pub text_color: Color,
    pub background: Option<BackgroundImage>,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size: super::DEFAULT_FONT_SIZE,
            background_color: Color::BLACK,
            text_color: Color::WHITE,
            background: None,
        }
    }
}
