// src/text.rs

//! Text rendering into [`Image`]s and the `Text` actor.
//!
//! Glyphs come from a [`FontDriver`]. The built-in [`BitmapFont`] carries a
//! 5x7 ASCII glyph table and scales it by whole pixels, so text renders the
//! same everywhere without any system font lookup.

use crate::actor::{Actor, Sprite};
use crate::color::Color;
use crate::image::Image;
use log::trace;

/// Font size used when none is given.
pub const DEFAULT_FONT_SIZE: u32 = 15;

/// Source of glyph bitmaps.
///
/// Implementors resolve characters to glyph ids and rasterize them into a
/// fixed-size cell. Rasterized glyphs are white with the coverage in the alpha
/// channel (straight alpha, RGBA row-major); [`render_text`] tints them.
pub trait FontDriver {
    /// Glyph handle type.
    type GlyphId: Copy;

    /// `(width, height)` of one character cell in pixels.
    fn cell_size(&self) -> (u32, u32);

    /// Glyph for `ch`, or `None` if the font has no such glyph.
    fn find_glyph(&self, ch: char) -> Option<Self::GlyphId>;

    /// Glyph drawn for characters the font lacks.
    fn fallback_glyph(&self) -> Self::GlyphId;

    /// Rasterize a glyph into a `cell_width_px` x `cell_height_px` RGBA buffer.
    /// Length must be `cell_width_px * cell_height_px * 4`.
    fn rasterize_glyph(
        &self,
        glyph_id: Self::GlyphId,
        cell_width_px: usize,
        cell_height_px: usize,
    ) -> Vec<u8>;
}

const GLYPH_COLUMNS: usize = 5;
const GLYPH_ROWS: usize = 7;
const FIRST_GLYPH: u8 = 0x20;
const LAST_GLYPH: u8 = 0x7E;

/// Column-major 5x7 glyphs for ASCII 0x20..=0x7E. Bit 0 is the top row.
#[rustfmt::skip]
const GLYPHS: [[u8; GLYPH_COLUMNS]; (LAST_GLYPH - FIRST_GLYPH + 1) as usize] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // !
    [0x00, 0x07, 0x00, 0x07, 0x00], // "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // $
    [0x23, 0x13, 0x08, 0x64, 0x62], // %
    [0x36, 0x49, 0x55, 0x22, 0x50], // &
    [0x00, 0x05, 0x03, 0x00, 0x00], // '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // +
    [0x00, 0x50, 0x30, 0x00, 0x00], // ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // -
    [0x00, 0x60, 0x60, 0x00, 0x00], // .
    [0x20, 0x10, 0x08, 0x04, 0x02], // /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // :
    [0x00, 0x56, 0x36, 0x00, 0x00], // ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // <
    [0x14, 0x14, 0x14, 0x14, 0x14], // =
    [0x41, 0x22, 0x14, 0x08, 0x00], // >
    [0x02, 0x01, 0x51, 0x09, 0x06], // ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // R
    [0x46, 0x49, 0x49, 0x49, 0x31], // S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // W
    [0x63, 0x14, 0x08, 0x14, 0x63], // X
    [0x03, 0x04, 0x78, 0x04, 0x03], // Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // [
    [0x02, 0x04, 0x08, 0x10, 0x20], // backslash
    [0x41, 0x41, 0x7F, 0x00, 0x00], // ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // _
    [0x00, 0x01, 0x02, 0x04, 0x00], // `
    [0x20, 0x54, 0x54, 0x54, 0x78], // a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // b
    [0x38, 0x44, 0x44, 0x44, 0x20], // c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // d
    [0x38, 0x54, 0x54, 0x54, 0x18], // e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // n
    [0x38, 0x44, 0x44, 0x44, 0x38], // o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // r
    [0x48, 0x54, 0x54, 0x54, 0x20], // s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // w
    [0x44, 0x28, 0x10, 0x28, 0x44], // x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // z
    [0x00, 0x08, 0x36, 0x41, 0x00], // {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // |
    [0x00, 0x41, 0x36, 0x08, 0x00], // }
    [0x10, 0x08, 0x08, 0x10, 0x08], // ~
];

/// The built-in font: 5x7 glyphs in a 6x8 cell, scaled by whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFont {
    scale: u32,
}

impl BitmapFont {
    /// A font whose cell height roughly matches `size` pixels.
    pub fn new(size: u32) -> Self {
        Self {
            scale: (size / 8).max(1),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl Default for BitmapFont {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE)
    }
}

impl FontDriver for BitmapFont {
    type GlyphId = u8;

    fn cell_size(&self) -> (u32, u32) {
        (
            (GLYPH_COLUMNS as u32 + 1) * self.scale,
            (GLYPH_ROWS as u32 + 1) * self.scale,
        )
    }

    fn find_glyph(&self, ch: char) -> Option<u8> {
        let code = u32::from(ch);
        if (FIRST_GLYPH as u32..=LAST_GLYPH as u32).contains(&code) {
            Some(code as u8 - FIRST_GLYPH)
        } else {
            None
        }
    }

    fn fallback_glyph(&self) -> u8 {
        b'?' - FIRST_GLYPH
    }

    fn rasterize_glyph(&self, glyph_id: u8, cell_width_px: usize, cell_height_px: usize) -> Vec<u8> {
        let mut out = vec![0u8; cell_width_px * cell_height_px * 4];
        let Some(columns) = GLYPHS.get(glyph_id as usize) else {
            return out;
        };
        let scale = self.scale as usize;
        for (col, bits) in columns.iter().enumerate() {
            for row in 0..GLYPH_ROWS {
                if bits & (1 << row) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    let y = row * scale + sy;
                    if y >= cell_height_px {
                        break;
                    }
                    for sx in 0..scale {
                        let x = col * scale + sx;
                        if x >= cell_width_px {
                            break;
                        }
                        let i = (y * cell_width_px + x) * 4;
                        out[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
                    }
                }
            }
        }
        out
    }
}

/// Renders `text` into a new image sized to fit it. Lines are split on `\n`.
/// `bg` fills the image first; without it the background is transparent.
pub fn render_text<F: FontDriver>(font: &F, text: &str, color: Color, bg: Option<Color>) -> Image {
    let (cell_w, cell_h) = font.cell_size();
    let lines: Vec<&str> = text.split('\n').collect();
    let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    let width = (columns * cell_w).max(1);
    let height = (lines.len() as u32 * cell_h).max(1);

    let mut img = Image::with_style(width, height, color, 1);
    if let Some(bg) = bg {
        img.fill(Some(bg));
    }
    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let glyph = font.find_glyph(ch).unwrap_or_else(|| font.fallback_glyph());
            let coverage = font.rasterize_glyph(glyph, cell_w as usize, cell_h as usize);
            let origin_x = col as u32 * cell_w;
            let origin_y = row as u32 * cell_h;
            for (i, px) in coverage.chunks_exact(4).enumerate() {
                if px[3] == 0 {
                    continue;
                }
                let x = origin_x + i as u32 % cell_w;
                let y = origin_y + i as u32 / cell_w;
                let alpha = (color.a as u32 * px[3] as u32 / 255) as u8;
                let ink = Color::rgba(color.r, color.g, color.b, alpha);
                let dst = img.get_color_at((x as i32, y as i32)).unwrap_or(Color::TRANSPARENT);
                img.put(x as i32, y as i32, ink.over(dst));
            }
        }
    }
    trace!("render_text: {:?} -> {}x{}", text, width, height);
    img
}

/// An actor that displays a line of text. Changing the message, color or
/// background re-renders its image.
#[derive(Debug)]
pub struct Text {
    sprite: Sprite,
    message: String,
    font: BitmapFont,
    color: Color,
    bg: Option<Color>,
}

impl Text {
    /// Black text at the default size on a transparent background.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_style(message, DEFAULT_FONT_SIZE, Color::BLACK, None)
    }

    pub fn with_style(message: impl Into<String>, size: u32, color: Color, bg: Option<Color>) -> Self {
        let message = message.into();
        let font = BitmapFont::new(size);
        let image = render_text(&font, &message, color, bg);
        Self {
            sprite: Sprite::new(image),
            message,
            font,
            color,
            bg,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        if message != self.message {
            self.message = message;
            self.render();
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.render();
    }

    pub fn set_background(&mut self, bg: Option<Color>) {
        self.bg = bg;
        self.render();
    }

    fn render(&mut self) {
        let image = render_text(&self.font, &self.message, self.color, self.bg);
        self.sprite.set_image(image);
    }
}

impl Actor for Text {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn it_should_scale_the_cell_with_the_font_size() {
        assert_eq!(BitmapFont::new(8).cell_size(), (6, 8));
        assert_eq!(BitmapFont::new(15).cell_size(), (6, 8));
        assert_eq!(BitmapFont::new(16).cell_size(), (12, 16));
        assert_eq!(BitmapFont::new(0).scale(), 1);
    }

    #[test]
    fn it_should_fall_back_for_characters_outside_the_table() {
        let font = BitmapFont::default();
        assert_eq!(font.find_glyph('A'), Some(b'A' - FIRST_GLYPH));
        assert_eq!(font.find_glyph('\u{e9}'), None);
        let fallback = font.rasterize_glyph(font.fallback_glyph(), 6, 8);
        let question = font.rasterize_glyph(font.find_glyph('?').unwrap(), 6, 8);
        assert_eq!(fallback, question);
    }

    #[test]
    fn it_should_size_rendered_text_to_the_longest_line() {
        let img = render_text(&BitmapFont::default(), "ab\nlonger", Color::BLACK, None);
        assert_eq!(img.dimensions(), (6 * 6, 16));
    }

    #[test]
    fn it_should_ink_glyph_pixels_and_leave_the_rest_transparent() {
        let red = Color::rgb(255, 0, 0);
        let img = render_text(&BitmapFont::default(), "|", red, None);
        // '|' is a full-height bar in the middle column.
        assert_eq!(img.get_color_at((2, 0)).unwrap(), red);
        assert_eq!(img.get_color_at((2, 6)).unwrap(), red);
        assert_eq!(img.get_color_at((0, 0)).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn it_should_fill_the_background_when_given() {
        let img = render_text(&BitmapFont::default(), " ", Color::BLACK, Some(Color::WHITE));
        assert_eq!(img.get_color_at((0, 0)).unwrap(), Color::WHITE);
    }

    #[test]
    fn it_should_rerender_only_when_the_message_changes() {
        let mut text = Text::new("hi");
        text.sprite_mut().image_mut().take_dirty();
        text.set_message("hi");
        assert!(!text.sprite().image().requires_update());
        text.set_message("hello");
        assert!(text.sprite().image().requires_update());
        assert_eq!(text.sprite().image().width(), 5 * 6);
    }
}
