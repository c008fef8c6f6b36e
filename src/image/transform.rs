// src/image/transform.rs

//! Resampling and rotation. Both use nearest-neighbour sampling; quarter turns
//! are exact pixel permutations.

use super::Image;
use crate::geometry::{normalize_degrees, rotated_bounds, Point};
use ::image::imageops::{self, FilterType};
use ::image::RgbaImage;

impl Image {
    /// Resizes the image to exactly `width` x `height`. The aspect ratio is
    /// not preserved.
    pub fn scale(&mut self, width: u32, height: u32) {
        let scaled = if width == 0 || height == 0 || self.width() == 0 || self.height() == 0 {
            RgbaImage::new(width, height)
        } else if (width, height) == self.dimensions() {
            self.surface.clone()
        } else {
            imageops::resize(&self.surface, width, height, FilterType::Nearest)
        };
        self.replace_surface(scaled);
    }

    /// Scales both sides by `factor`.
    pub fn scale_by(&mut self, factor: f64) {
        let w = (self.width() as f64 * factor).max(0.0) as u32;
        let h = (self.height() as f64 * factor).max(0.0) as u32;
        self.scale(w, h);
    }

    /// Rotates the image counter-clockwise by `degrees`. The canvas grows to
    /// the rotated bounding box; uncovered corners are transparent.
    pub fn rotate(&mut self, degrees: f64) {
        let rotated = rotate_surface(&self.surface, degrees);
        self.replace_surface(rotated);
    }

    /// A rotated copy, leaving `self` untouched.
    pub fn rotated(&self, degrees: f64) -> Image {
        let mut out = Image::from_surface(rotate_surface(&self.surface, degrees));
        out.drawing_color = self.drawing_color;
        out.drawing_width = self.drawing_width;
        out
    }

    /// Grows the canvas so every point lies inside it. Points left of or above
    /// the origin shift the existing content right/down; the applied shift is
    /// returned so callers can translate their own coordinates.
    pub fn expand_to(&mut self, points: &[Point]) -> (i32, i32) {
        let mut right = self.width() as i32;
        let mut bottom = self.height() as i32;
        let mut shift_x = 0;
        let mut shift_y = 0;
        for p in points {
            right = right.max(p.x + 1);
            bottom = bottom.max(p.y + 1);
            shift_x = shift_x.max(-p.x);
            shift_y = shift_y.max(-p.y);
        }
        let new_w = (right + shift_x) as u32;
        let new_h = (bottom + shift_y) as u32;
        if (new_w, new_h) == self.dimensions() {
            return (0, 0);
        }
        let mut grown = RgbaImage::new(new_w, new_h);
        imageops::replace(&mut grown, &self.surface, shift_x as i64, shift_y as i64);
        self.replace_surface(grown);
        (shift_x, shift_y)
    }
}

fn rotate_surface(src: &RgbaImage, degrees: f64) -> RgbaImage {
    let angle = normalize_degrees(degrees);
    // imageops turns clockwise; positive angles here are counter-clockwise.
    if angle == 0.0 {
        return src.clone();
    } else if angle == 90.0 {
        return imageops::rotate270(src);
    } else if angle == 180.0 {
        return imageops::rotate180(src);
    } else if angle == 270.0 {
        return imageops::rotate90(src);
    }

    let (w, h) = src.dimensions();
    let (nw, nh) = rotated_bounds(w, h, angle);
    let mut out = RgbaImage::new(nw, nh);
    if w == 0 || h == 0 {
        return out;
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let (ncx, ncy) = (nw as f64 / 2.0, nh as f64 / 2.0);
    for y in 0..nh {
        for x in 0..nw {
            // Inverse-map each destination pixel centre back into the source.
            let dx = x as f64 + 0.5 - ncx;
            let dy = y as f64 + 0.5 - ncy;
            let u = dx * cos - dy * sin + cx;
            let v = dx * sin + dy * cos + cy;
            if u >= 0.0 && v >= 0.0 && u < w as f64 && v < h as f64 {
                out.put_pixel(x, y, *src.get_pixel(u as u32, v as u32));
            }
        }
    }
    out
}
