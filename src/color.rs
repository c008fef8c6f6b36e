// src/color.rs

//! Defines the RGBA `Color` type, the `NamedColor` palette and alpha blending.

use serde::{Deserialize, Serialize};

/// A straight (non-premultiplied) RGBA color, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Composites `self` over `dst` (source-over).
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            255 => self,
            0 => dst,
            src_a => {
                let sa = src_a as u32;
                let da = dst.a as u32;
                // out_a = sa + da * (1 - sa), all in 0..=255 fixed point.
                let out_a = sa + div255(da * (255 - sa));
                if out_a == 0 {
                    return Color::TRANSPARENT;
                }
                let channel = |s: u8, d: u8| -> u8 {
                    let num = s as u32 * sa + div255(d as u32 * da * (255 - sa));
                    ((num + out_a / 2) / out_a).min(255) as u8
                };
                Color::rgba(
                    channel(self.r, dst.r),
                    channel(self.g, dst.g),
                    channel(self.b, dst.b),
                    out_a as u8,
                )
            }
        }
    }
}

impl Default for Color {
    /// Black, the default drawing color.
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<(u8, u8, u8, u8)> for Color {
    fn from((r, g, b, a): (u8, u8, u8, u8)) -> Self {
        Color::rgba(r, g, b, a)
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        named.to_color()
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(px: image::Rgba<u8>) -> Self {
        Color::from_bytes(px.0)
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(c: Color) -> Self {
        image::Rgba(c.to_bytes())
    }
}

/// Fast x / 255 with rounding for x in 0..=255*255*255.
#[inline]
fn div255(x: u32) -> u32 {
    (x + 1 + (x >> 8)) >> 8
}

/// The sixteen standard named colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,       // Also known as Grey
    BrightBlack = 8, // Also known as Dark Grey
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    /// Converts an index (0-15) to a `NamedColor`.
    pub fn from_index(idx: u8) -> Option<Self> {
        use NamedColor::*;
        const ALL: [NamedColor; 16] = [
            Black,
            Red,
            Green,
            Yellow,
            Blue,
            Magenta,
            Cyan,
            White,
            BrightBlack,
            BrightRed,
            BrightGreen,
            BrightYellow,
            BrightBlue,
            BrightMagenta,
            BrightCyan,
            BrightWhite,
        ];
        ALL.get(idx as usize).copied()
    }

    /// Returns the opaque RGB value of this named color.
    pub fn to_color(&self) -> Color {
        match self {
            NamedColor::Black => Color::rgb(0, 0, 0),
            NamedColor::Red => Color::rgb(205, 0, 0),
            NamedColor::Green => Color::rgb(0, 205, 0),
            NamedColor::Yellow => Color::rgb(205, 205, 0),
            NamedColor::Blue => Color::rgb(0, 0, 238),
            NamedColor::Magenta => Color::rgb(205, 0, 205),
            NamedColor::Cyan => Color::rgb(0, 205, 205),
            NamedColor::White => Color::rgb(229, 229, 229),
            NamedColor::BrightBlack => Color::rgb(127, 127, 127),
            NamedColor::BrightRed => Color::rgb(255, 0, 0),
            NamedColor::BrightGreen => Color::rgb(0, 255, 0),
            NamedColor::BrightYellow => Color::rgb(255, 255, 0),
            NamedColor::BrightBlue => Color::rgb(92, 92, 255),
            NamedColor::BrightMagenta => Color::rgb(255, 0, 255),
            NamedColor::BrightCyan => Color::rgb(0, 255, 255),
            NamedColor::BrightWhite => Color::rgb(255, 255, 255),
        }
    }
}
