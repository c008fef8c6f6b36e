// src/actor.rs

//! Actors: the user-defined behaviour (`Actor`) and the framework-owned state
//! every actor carries (`Sprite`).
//!
//! A user type implements [`Actor`] by exposing its `Sprite` and, optionally,
//! overriding `act`. The world stores actors as `Box<dyn Actor>` and keys them
//! by [`ActorKind`], a per-type identifier that also fixes paint order.
//!
//! Spatial and input queries live on `Sprite` and take the world explicitly.


use crate::color::Color;
use crate::config::CONFIG;
use crate::error::{FootError, Result};
use crate::game::Context;
use crate::geometry::{normalize_degrees, rotated_bounds, Point, Rect};
use crate::image::Image;
use crate::input::Input;
use crate::keys::MouseButton;
use crate::world::World;
use log::trace;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Handle of an actor inside a world. Ids are never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub(crate) u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identifier of an actor type.
#[derive(Debug, Clone, Copy)]
pub struct ActorKind {
    type_id: TypeId,
    name: &'static str,
}

impl ActorKind {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path.
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for ActorKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ActorKind {}

impl Hash for ActorKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Downcasting support for actors. Implemented for every `'static` type.
///
/// Call these through `&dyn Actor` (e.g. `(*boxed).as_any()`), not on the
/// `Box` itself, which is `Any` in its own right.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn actor_kind(&self) -> ActorKind;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn actor_kind(&self) -> ActorKind {
        ActorKind::of::<T>()
    }
}

/// A game object.
pub trait Actor: AsAny {
    fn sprite(&self) -> &Sprite;

    fn sprite_mut(&mut self) -> &mut Sprite;

    /// Runs once per frame, before anything is drawn.
    fn act(&mut self, _ctx: &mut Context<'_>) {}
}

/// A bare sprite is an actor that does nothing.
impl Actor for Sprite {
    fn sprite(&self) -> &Sprite {
        self
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        self
    }
}

/// Framework-owned actor state.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Grid column (pixel column in free worlds).
    pub x: i32,
    /// Grid row (pixel row in free worlds).
    pub y: i32,
    /// Pixel offset inside the cell, set by `realign`.
    pub x_offset: i32,
    pub y_offset: i32,
    rotation: f64,
    image: Image,
    rendered: Option<Image>,
    prev_rect: Option<Rect>,
    trigger_on_relief: bool,
    id: Option<ActorId>,
    fit_to_cell: bool,
}

impl Sprite {
    pub fn new(image: Image) -> Self {
        Self {
            x: 0,
            y: 0,
            x_offset: 0,
            y_offset: 0,
            rotation: 0.0,
            image,
            rendered: None,
            prev_rect: None,
            trigger_on_relief: false,
            id: None,
            fit_to_cell: false,
        }
    }

    /// A sprite showing the default logo. In grid worlds the logo is scaled to
    /// the cell when the actor is added.
    pub fn with_default_image() -> Self {
        let size = CONFIG.actors.default_size;
        let mut sprite = Self::new(default_image(size));
        sprite.fit_to_cell = true;
        sprite
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Image::from_path(path)?))
    }

    /// Id assigned when the actor was added to a world.
    pub fn id(&self) -> Option<ActorId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: ActorId) {
        self.id = Some(id);
    }

    pub(crate) fn fits_to_cell(&self) -> bool {
        self.fit_to_cell
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Mutable image access. Drawing on it marks it dirty.
    pub fn image_mut(&mut self) -> &mut Image {
        &mut self.image
    }

    /// Replaces the image; it is redrawn on the next update.
    pub fn set_image(&mut self, image: Image) {
        self.image = image;
        self.image.mark_dirty();
        self.fit_to_cell = false;
    }

    /// Last composited render (image rotated by `rotation`).
    pub fn rendered(&self) -> Option<&Image> {
        self.rendered.as_ref()
    }

    /// Screen rectangle this actor was last drawn into.
    pub fn prev_rect(&self) -> Option<Rect> {
        self.prev_rect
    }

    pub fn set_location(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    pub fn location(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Rotation in degrees, counter-clockwise, in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Sets the rotation. Setting the current value again is a no-op.
    pub fn set_rotation(&mut self, degrees: f64) {
        let normalized = normalize_degrees(degrees);
        if normalized == self.rotation {
            return;
        }
        trace!(
            "Sprite {:?}: rotation {} -> {}",
            self.id,
            self.rotation,
            normalized
        );
        self.rotation = normalized;
        self.image.mark_dirty();
    }

    /// Rotates by `degrees` relative to the current rotation.
    pub fn rotate(&mut self, degrees: f64) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Scales the image and re-centres it in its cell.
    pub fn scale(&mut self, width: u32, height: u32, cell_size: u32) {
        self.image.scale(width, height);
        self.realign(cell_size);
    }

    /// Centres the image in its cell. Free worlds have no cells; offsets are
    /// left alone there.
    pub fn realign(&mut self, cell_size: u32) {
        if cell_size > 1 {
            self.x_offset = (cell_size as i32 - self.image.width() as i32) / 2;
            self.y_offset = (cell_size as i32 - self.image.height() as i32) / 2;
        }
    }

    /// Top-left of the unrotated image in world pixels.
    pub fn pixel_pos(&self, cell_size: u32) -> Point {
        let cell = cell_size as i32;
        Point::new(
            self.x * cell + self.x_offset,
            self.y * cell + self.y_offset,
        )
    }

    /// Screen rectangle of the rendered (rotated) image. Rotation happens
    /// around the image centre, so the box grows equally on both sides.
    pub fn screen_rect(&self, cell_size: u32) -> Rect {
        let base = self.pixel_pos(cell_size);
        let (w, h) = self.image.dimensions();
        let (rw, rh) = rotated_bounds(w, h, self.rotation);
        let grow_x = (rw as i32 - w as i32) / 2;
        let grow_y = (rh as i32 - h as i32) / 2;
        Rect::new(base.x - grow_x, base.y - grow_y, rw, rh)
    }

    /// True when the image changed, the sprite was never drawn, or it moved.
    pub fn needs_repaint(&self, cell_size: u32) -> bool {
        if self.image.requires_update() {
            return true;
        }
        match self.prev_rect {
            None => true,
            Some(prev) => self.screen_rect(cell_size).top_left() != prev.top_left(),
        }
    }

    /// Re-renders the rotated image cache.
    pub(crate) fn refresh_render(&mut self) {
        self.rendered = Some(self.image.rotated(self.rotation));
    }

    /// Records a finished composite: the render now on screen sits at `rect`.
    pub(crate) fn mark_drawn(&mut self, rect: Rect) {
        self.prev_rect = Some(rect);
        self.image.take_dirty();
    }

    /// Converts a world pixel coordinate to a coordinate on this sprite's
    /// image. Points off the image map outside its bounds.
    pub fn to_image_pos(&self, pos: Point, cell_size: u32) -> Point {
        let origin = self.pixel_pos(cell_size);
        Point::new(pos.x - origin.x, pos.y - origin.y)
    }

    /// True if any part of the rendered image is outside the world.
    pub fn at_edge(&self, world: &World) -> bool {
        !world.bounds().contains_rect(&self.screen_rect(world.cell_size()))
    }

    fn others<'w>(
        &'w self,
        world: &'w World,
        kind: Option<ActorKind>,
    ) -> impl Iterator<Item = (ActorId, &'w Sprite)> + 'w {
        world
            .get_objects(kind)
            .into_iter()
            .filter(move |id| Some(*id) != self.id)
            .filter_map(move |id| world.sprite(id).map(|s| (id, s)))
    }

    /// True if this sprite's rendered box overlaps that of any other actor of
    /// kind `T`. Bounding boxes only, not pixels.
    pub fn is_touching<T: Actor>(&self, world: &World) -> bool {
        self.get_intersecting::<T>(world).is_some()
    }

    /// True if this sprite's rendered box overlaps that of actor `other`.
    pub fn is_touching_actor(&self, world: &World, other: ActorId) -> Result<bool> {
        let sprite = world.sprite(other).ok_or(FootError::UnknownActor(other))?;
        let cell = world.cell_size();
        Ok(self.screen_rect(cell).intersects(&sprite.screen_rect(cell)))
    }

    /// First actor of kind `T` (in paint order) whose box overlaps this one.
    pub fn get_intersecting<T: Actor>(&self, world: &World) -> Option<ActorId> {
        let cell = world.cell_size();
        let mine = self.screen_rect(cell);
        self.others(world, Some(ActorKind::of::<T>()))
            .find(|(_, s)| mine.intersects(&s.screen_rect(cell)))
            .map(|(id, _)| id)
    }

    /// Closest other actor of kind `T`, measured between grid positions in
    /// pixels.
    pub fn get_closest<T: Actor>(&self, world: &World) -> Result<ActorId> {
        self.closest_of(world, Some(ActorKind::of::<T>()))
    }

    /// Closest other actor of `kind`, or of any kind when `None`.
    pub fn closest_of(&self, world: &World, kind: Option<ActorKind>) -> Result<ActorId> {
        let cell = world.cell_size() as i32;
        let here = Point::new(self.x * cell, self.y * cell);
        self.others(world, kind)
            .map(|(id, s)| (id, here.distance_to(Point::new(s.x * cell, s.y * cell))))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
            .ok_or(FootError::NoCandidates(
                kind.map(|k| k.short_name()).unwrap_or("Actor"),
            ))
    }

    /// Rotates so the top of the image points at actor `other`.
    pub fn turn_towards(&mut self, world: &World, other: ActorId) -> Result<()> {
        let target = world.sprite(other).ok_or(FootError::UnknownActor(other))?;
        let cell = world.cell_size() as i32;
        let centre = |s: &Sprite| {
            (
                (s.x * cell) as f64 + (s.image.width() / 2) as f64,
                (s.y * cell) as f64 + (s.image.height() / 2) as f64,
            )
        };
        let (x1, y1) = centre(self);
        let (x2, y2) = centre(target);
        let (dx, dy) = (x2 - x1, y2 - y1);
        // Angle from the direction vector to "up" (0, -1); screen y grows down.
        let degrees = -90.0 - dy.atan2(dx).to_degrees();
        self.set_rotation(degrees);
        Ok(())
    }

    /// True if the mouse is over the rendered image.
    pub fn mouse_over(&self, world: &World, input: &Input) -> bool {
        self.screen_rect(world.cell_size())
            .contains_point(input.mouse_pos())
    }

    /// Click detection. Pressing `button` (any button for `None`) over the
    /// sprite arms a latch and returns false; the first later frame without
    /// the press disarms it and reports a click if the mouse is still over
    /// the sprite.
    pub fn clicked(&mut self, world: &World, input: &Input, button: Option<MouseButton>) -> bool {
        let hovered = self.mouse_over(world, input);
        if hovered && input.is_pressed(button) {
            self.trigger_on_relief = true;
            false
        } else if self.trigger_on_relief {
            self.trigger_on_relief = false;
            hovered
        } else {
            false
        }
    }
}

/// The default actor image: a footprint on a transparent square.
pub fn default_image(size: u32) -> Image {
    let size = size.max(1);
    let mut img = Image::new(50, 50);
    img.drawing_width = 0;
    let ink = Color::rgb(120, 72, 40);
    img.draw_circle(15, (25, 32), Some(ink));
    img.draw_circle(5, (11, 13), Some(ink));
    img.draw_circle(5, (21, 8), Some(ink));
    img.draw_circle(5, (31, 8), Some(ink));
    img.draw_circle(4, (40, 14), Some(ink));
    img.drawing_width = 2;
    img.draw_circle(24, (25, 25), Some(Color::rgb(40, 40, 40)));
    if size != 50 {
        img.scale(size, size);
    }
    img
}
