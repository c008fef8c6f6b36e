// src/image.rs

//! The `Image` type: an owned RGBA surface with drawing primitives and a dirty
//! flag.
//!
//! Every actor, the world background and the display buffer itself are
//! `Image`s. Mutating calls set `requires_update`; the compositor clears it
//! once the new pixels have been put on screen.
//!
//! Drawing primitives live in [`draw`], resampling and rotation in
//! [`transform`].

pub mod draw;
pub mod transform;


use crate::color::Color;
use crate::error::{FootError, Result};
use crate::geometry::{Point, Rect};
use ::image::RgbaImage;
use log::debug;
use std::fmt;
use std::path::Path;

/// File extensions `Image::from_path` accepts.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// How a blit combines source and destination pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Source-over alpha compositing.
    Over,
    /// Source pixels replace destination pixels, alpha included.
    Replace,
}

#[derive(Clone)]
pub struct Image {
    surface: RgbaImage,
    /// Color used by the draw methods when no explicit color is given.
    pub drawing_color: Color,
    /// Stroke width of the draw methods; 0 fills shapes.
    pub drawing_width: u32,
    requires_update: bool,
}

impl Image {
    /// A blank (fully transparent) image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_style(width, height, Color::BLACK, 1)
    }

    /// A blank image with an explicit drawing color and stroke width.
    pub fn with_style(width: u32, height: u32, drawing_color: Color, drawing_width: u32) -> Self {
        Self {
            surface: RgbaImage::new(width, height),
            drawing_color,
            drawing_width,
            requires_update: true,
        }
    }

    /// An image filled with a single color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        let mut img = Self::new(width, height);
        img.fill(Some(color));
        img
    }

    /// Wraps an existing surface.
    pub fn from_surface(surface: RgbaImage) -> Self {
        Self {
            surface,
            drawing_color: Color::BLACK,
            drawing_width: 1,
            requires_update: true,
        }
    }

    /// Loads an image file. Supported types are jpg, jpeg, png and gif.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FootError::NotFound(path.to_path_buf()));
        }
        if !path.is_file() {
            return Err(FootError::NotAFile(path.to_path_buf()));
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(FootError::UnsupportedFormat(format!(".{}", ext)));
        }
        let decoded = ::image::open(path).map_err(|source| FootError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let surface = decoded.to_rgba8();
        debug!(
            "Image: loaded {} ({}x{})",
            path.display(),
            surface.width(),
            surface.height()
        );
        Ok(Self::from_surface(surface))
    }

    /// The underlying pixel surface.
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Mutable access to the surface for drawing outside this type. The image
    /// is marked dirty because the caller may change any pixel.
    pub fn surface_mut(&mut self) -> &mut RgbaImage {
        self.requires_update = true;
        &mut self.surface
    }

    pub fn into_surface(self) -> RgbaImage {
        self.surface
    }

    pub(crate) fn replace_surface(&mut self, surface: RgbaImage) {
        self.surface = surface;
        self.requires_update = true;
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// The image's extent as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    /// Rescales horizontally, keeping the height.
    pub fn set_width(&mut self, width: u32) {
        let height = self.height();
        self.scale(width, height);
    }

    /// Rescales vertically, keeping the width.
    pub fn set_height(&mut self, height: u32) {
        let width = self.width();
        self.scale(width, height);
    }

    /// True when the pixels changed since they were last composited.
    pub fn requires_update(&self) -> bool {
        self.requires_update
    }

    pub fn mark_dirty(&mut self) {
        self.requires_update = true;
    }

    /// Clears the dirty flag, returning its previous value.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.requires_update, false)
    }

    /// Color of a single pixel.
    pub fn get_color_at(&self, pos: impl Into<Point>) -> Result<Color> {
        let p = pos.into();
        if !self.bounds().contains_point(p) {
            return Err(FootError::OutOfBounds {
                x: p.x,
                y: p.y,
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(Color::from(*self.surface.get_pixel(p.x as u32, p.y as u32)))
    }

    /// Copies `rect` out into a new image, clipped to this image.
    pub fn sub_image(&self, rect: Rect) -> Option<Image> {
        let clipped = rect.clip_to(&self.bounds())?;
        let view = ::image::imageops::crop_imm(
            &self.surface,
            clipped.x as u32,
            clipped.y as u32,
            clipped.width,
            clipped.height,
        );
        Some(Image::from_surface(view.to_image()))
    }

    /// Composites all of `src` with its top-left corner at `pos`.
    /// Returns the affected rectangle, or `None` if nothing landed inside.
    pub fn blit(&mut self, src: &Image, pos: impl Into<Point>) -> Option<Rect> {
        self.composite(src, src.bounds(), pos.into(), BlendMode::Over)
    }

    /// Composites the `src_rect` region of `src` at `pos`.
    pub fn blit_region(&mut self, src: &Image, src_rect: Rect, pos: impl Into<Point>) -> Option<Rect> {
        self.composite(src, src_rect, pos.into(), BlendMode::Over)
    }

    /// Copies the `src_rect` region of `src` to `pos`, replacing the
    /// destination pixels including alpha.
    pub fn copy_from(&mut self, src: &Image, src_rect: Rect, pos: impl Into<Point>) -> Option<Rect> {
        self.composite(src, src_rect, pos.into(), BlendMode::Replace)
    }

    /// Shared clipping blit used by `blit`, `blit_region` and `copy_from`.
    pub fn composite(
        &mut self,
        src: &Image,
        src_rect: Rect,
        dest: Point,
        mode: BlendMode,
    ) -> Option<Rect> {
        let requested = src_rect;
        let src_rect = requested.clip_to(&src.bounds())?;
        // Clipping the source on its top/left shifts the destination too.
        let dest = Point::new(
            dest.x + (src_rect.x - requested.x),
            dest.y + (src_rect.y - requested.y),
        );
        let dest_rect = Rect::new(dest.x, dest.y, src_rect.width, src_rect.height);
        let clipped = dest_rect.clip_to(&self.bounds())?;

        let off_x = (clipped.x - dest.x + src_rect.x) as u32;
        let off_y = (clipped.y - dest.y + src_rect.y) as u32;
        for row in 0..clipped.height {
            let sy = off_y + row;
            let dy = clipped.y as u32 + row;
            for col in 0..clipped.width {
                let sx = off_x + col;
                let dx = clipped.x as u32 + col;
                let s = Color::from(*src.surface.get_pixel(sx, sy));
                let out = match mode {
                    BlendMode::Replace => s,
                    BlendMode::Over => s.over(Color::from(*self.surface.get_pixel(dx, dy))),
                };
                self.surface.put_pixel(dx, dy, out.into());
            }
        }
        self.requires_update = true;
        Some(clipped)
    }

    /// Writes one pixel, ignoring coordinates outside the surface.
    #[inline]
    pub(crate) fn put(&mut self, x: i32, y: i32, color: Color) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.surface.put_pixel(x as u32, y as u32, color.into());
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("drawing_color", &self.drawing_color)
            .field("drawing_width", &self.drawing_width)
            .field("requires_update", &self.requires_update)
            .finish()
    }
}
