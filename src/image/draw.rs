// src/image/draw.rs

//! Drawing primitives on [`Image`]. Shapes write their color directly (no
//! blending), images are composited source-over.

use super::Image;
use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::text::{render_text, BitmapFont};

impl Image {
    /// Fills the whole image.
    pub fn fill(&mut self, color: Option<Color>) {
        let color = color.unwrap_or(self.drawing_color);
        let px: ::image::Rgba<u8> = color.into();
        for p in self.surface.pixels_mut() {
            *p = px;
        }
        self.requires_update = true;
    }

    /// Draws a `width` x `height` rectangle with its top-left corner at `pos`.
    /// A `drawing_width` of 0 fills it; otherwise the border is drawn inside
    /// the rectangle.
    pub fn draw_rect(&mut self, width: u32, height: u32, pos: impl Into<Point>, color: Option<Color>) {
        let color = color.unwrap_or(self.drawing_color);
        let pos = pos.into();
        let rect = Rect::new(pos.x, pos.y, width, height);
        let stroke = self.drawing_width;
        if stroke == 0 || stroke * 2 >= width || stroke * 2 >= height {
            self.fill_rect(rect, color);
        } else {
            let t = stroke;
            self.fill_rect(Rect::new(rect.x, rect.y, width, t), color);
            self.fill_rect(Rect::new(rect.x, rect.bottom() - t as i32, width, t), color);
            self.fill_rect(Rect::new(rect.x, rect.y, t, height), color);
            self.fill_rect(Rect::new(rect.right() - t as i32, rect.y, t, height), color);
        }
        self.requires_update = true;
    }

    /// Draws a circle. A `drawing_width` of 0 (or one at least the radius)
    /// fills it; otherwise a ring of that thickness is drawn inside the radius.
    pub fn draw_circle(&mut self, radius: u32, center: impl Into<Point>, color: Option<Color>) {
        let color = color.unwrap_or(self.drawing_color);
        let c = center.into();
        let r = radius as i64;
        let outer = r * r;
        let stroke = self.drawing_width as i64;
        let inner = if stroke == 0 || stroke >= r {
            None
        } else {
            Some((r - stroke) * (r - stroke))
        };
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 > outer {
                    continue;
                }
                if let Some(inner) = inner {
                    if d2 < inner {
                        continue;
                    }
                }
                self.put(c.x + dx as i32, c.y + dy as i32, color);
            }
        }
        self.requires_update = true;
    }

    /// Draws a line of `drawing_width` pixels. Width 0 draws nothing.
    pub fn draw_line(&mut self, start: impl Into<Point>, end: impl Into<Point>, color: Option<Color>) {
        let color = color.unwrap_or(self.drawing_color);
        let width = self.drawing_width;
        self.line_with(start.into(), end.into(), color, width);
        self.requires_update = true;
    }

    /// Draws a closed polygon. `width` overrides `drawing_width`; 0 fills.
    pub fn draw_polygon(&mut self, points: &[Point], width: Option<u32>, color: Option<Color>) {
        let color = color.unwrap_or(self.drawing_color);
        let width = width.unwrap_or(self.drawing_width);
        if points.is_empty() {
            return;
        }
        if width == 0 {
            self.fill_polygon(points, color);
            // The scanline fill samples pixel centres; trace the edges so the
            // outline belongs to the shape as well.
            self.outline(points, color, 1);
        } else {
            self.outline(points, color, width);
        }
        self.requires_update = true;
    }

    /// Composites another image onto this one.
    pub fn draw_image(&mut self, img: &Image, pos: impl Into<Point>) {
        self.blit(img, pos);
        self.requires_update = true;
    }

    /// Renders `text` with the built-in bitmap font at its default size.
    pub fn draw_text(&mut self, text: &str, pos: impl Into<Point>, color: Option<Color>) {
        let color = color.unwrap_or(self.drawing_color);
        let rendered = render_text(&BitmapFont::default(), text, color, None);
        self.blit(&rendered, pos);
        self.requires_update = true;
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(clipped) = rect.clip_to(&self.bounds()) else {
            return;
        };
        let px: ::image::Rgba<u8> = color.into();
        for y in clipped.y as u32..clipped.bottom() as u32 {
            for x in clipped.x as u32..clipped.right() as u32 {
                self.surface.put_pixel(x, y, px);
            }
        }
    }

    fn outline(&mut self, points: &[Point], color: Color, width: u32) {
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line_with(a, b, color, width);
        }
    }

    /// Bresenham line. Thick lines extend across the minor axis, centred on
    /// the ideal line.
    pub(crate) fn line_with(&mut self, start: Point, end: Point, color: Color, width: u32) {
        if width == 0 {
            return;
        }
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        let sx = if start.x < end.x { 1 } else { -1 };
        let sy = if start.y < end.y { 1 } else { -1 };
        let x_major = dx >= -dy;
        let half = (width as i32 - 1) / 2;

        let (mut x, mut y) = (start.x, start.y);
        let mut err = dx + dy;
        loop {
            for k in 0..width as i32 {
                let o = k - half;
                if x_major {
                    self.put(x, y + o, color);
                } else {
                    self.put(x + o, y, color);
                }
            }
            if x == end.x && y == end.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Even-odd scanline fill sampling pixel centres.
    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
        let max_y = points
            .iter()
            .map(|p| p.y)
            .max()
            .unwrap_or(0)
            .min(self.height() as i32 - 1);
        let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
        for y in min_y..=max_y {
            let scan = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                let (ay, by) = (a.y as f64, b.y as f64);
                if (ay <= scan && by > scan) || (by <= scan && ay > scan) {
                    let t = (scan - ay) / (by - ay);
                    crossings.push(a.x as f64 + t * (b.x - a.x) as f64);
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                let x0 = (pair[0] - 0.5).ceil() as i32;
                let x1 = (pair[1] - 0.5).floor() as i32;
                for x in x0..=x1 {
                    self.put(x, y, color);
                }
            }
        }
    }
}
