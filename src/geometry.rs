// src/geometry.rs

//! Screen-space geometry: points, axis-aligned rectangles and the bounding box
//! of a rotated image.

use serde::{Deserialize, Serialize};

/// A pixel coordinate. The origin is the top-left corner of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point { x, y }
    }
}

/// An axis-aligned rectangle with a signed origin and an unsigned size.
///
/// The right and bottom edges are exclusive, so a 10x10 rectangle at (0, 0)
/// covers pixels 0..=9 on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of the given size anchored at the origin.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Builds a rectangle from two corners (`right`/`bottom` exclusive).
    /// Returns an empty rectangle if the corners are inverted.
    pub fn from_corners(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let width = (right - left).max(0) as u32;
        let height = (bottom - top).max(0) as u32;
        Self::new(left, top, width, height)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// True if the two rectangles share at least one pixel. Empty rectangles
    /// never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// The overlapping region, or `None` if the rectangles do not intersect.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        Some(Rect::from_corners(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        ))
    }

    /// Alias of [`Rect::intersection`] that reads better at call sites that
    /// restrict a rectangle to surface bounds.
    pub fn clip_to(&self, bounds: &Rect) -> Option<Rect> {
        self.intersection(bounds)
    }

    /// Smallest rectangle containing both. Empty inputs are ignored.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Rect::from_corners(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Union of a list of rectangles, `None` for an empty list.
pub fn union_all<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Option<Rect> {
    let mut it = rects.into_iter().copied();
    let first = it.next()?;
    Some(it.fold(first, |acc, r| acc.union(&r)))
}

/// Size of the bounding box of a `width` x `height` image rotated by
/// `degrees`. Quarter turns are exact; other angles round up.
pub fn rotated_bounds(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let normalized = normalize_degrees(degrees);
    if normalized == 0.0 || normalized == 180.0 {
        return (width, height);
    }
    if normalized == 90.0 || normalized == 270.0 {
        return (height, width);
    }
    let rad = normalized.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let w = width as f64;
    let h = height as f64;
    // Trim float noise before rounding up so 45 degree turns stay stable.
    let new_w = (w * cos + h * sin - 1e-9).ceil().max(0.0) as u32;
    let new_h = (w * sin + h * cos - 1e-9).ceil().max(0.0) as u32;
    (new_w, new_h)
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs.
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn intersection_is_clipped_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, -5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 0, 5, 5)));
    }

    #[test]
    fn union_covers_both() {
        let a = Rect::new(50, 50, 10, 10);
        let b = Rect::new(60, 50, 10, 10);
        assert_eq!(a.union(&b), Rect::new(50, 50, 20, 10));
        assert_eq!(union_all([&a, &b]), Some(Rect::new(50, 50, 20, 10)));
        assert_eq!(union_all(std::iter::empty()), None);
    }

    #[test]
    fn empty_rects_are_ignored_by_union() {
        let a = Rect::new(3, 3, 0, 5);
        let b = Rect::new(1, 1, 2, 2);
        assert_eq!(a.union(&b), b);
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        assert_eq!(rotated_bounds(10, 20, 90.0), (20, 10));
        assert_eq!(rotated_bounds(10, 20, 180.0), (10, 20));
        assert_eq!(rotated_bounds(10, 20, -90.0), (20, 10));
    }

    #[test]
    fn diagonal_turn_grows_square() {
        let (w, h) = rotated_bounds(10, 10, 45.0);
        assert_eq!((w, h), (15, 15));
    }

    #[test]
    fn degrees_are_normalized() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }
}
