// src/world.rs

//! The world: actor registry, paint order, background and the damage-aware
//! update that turns actor changes into display rectangles.


use crate::actor::{Actor, ActorId, ActorKind, Sprite};
use crate::color::Color;
use crate::config::CONFIG;
use crate::damage::{self, BlitOp, BlitSource};
use crate::error::{FootError, Result};
use crate::game::{Command, Context};
use crate::geometry::{union_all, Rect};
use crate::image::Image;
use crate::input::Input;
use crate::text::Text;
use log::{debug, info, trace, warn};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Per-frame behaviour of the world itself. Closures taking a `Context`
/// implement it.
pub trait WorldScript {
    fn act(&mut self, ctx: &mut Context<'_>);
}

impl<F> WorldScript for F
where
    F: FnMut(&mut Context<'_>),
{
    fn act(&mut self, ctx: &mut Context<'_>) {
        self(ctx)
    }
}

pub struct World {
    width: u32,
    height: u32,
    cell_size: u32,
    speed: u32,
    background: Image,
    actors: HashMap<ActorId, Box<dyn Actor>>,
    /// Kinds in paint order; earlier buckets paint first (behind).
    buckets: Vec<(ActorKind, Vec<ActorId>)>,
    next_id: u64,
    script: Option<Box<dyn WorldScript>>,
    pending_erase: Vec<Rect>,
}

impl World {
    /// A world `width` x `height` cells large. A `cell_size` of 1 gives a free
    /// world with pixel positions; larger cells snap actors to a grid. Each
    /// edge is capped at [`MAX_WORLD_PX`] pixels.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        let width = world_px(width, cell_size);
        let height = world_px(height, cell_size);
        info!(
            "World::new {}x{} px, cell size {}",
            width, height, cell_size
        );
        let background = default_background(width, height, cell_size);
        Self {
            width,
            height,
            cell_size,
            speed: CONFIG.window.speed,
            background,
            actors: HashMap::new(),
            buckets: Vec::new(),
            next_id: 0,
            script: None,
            pending_erase: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// The world in pixels, anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Target frames per second. 0 runs unthrottled.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: u32) {
        self.speed = speed;
    }

    pub fn background(&self) -> &Image {
        &self.background
    }

    /// Drawing on the returned image triggers a full repaint.
    pub fn background_mut(&mut self) -> &mut Image {
        &mut self.background
    }

    /// Replaces the background. Free worlds, and grid worlds with
    /// `full_image`, stretch the image over the whole world; otherwise it is
    /// scaled to one cell and tiled.
    pub fn set_background(&mut self, mut image: Image, full_image: bool) {
        if self.cell_size == 1 || full_image {
            image.scale(self.width, self.height);
            self.background = image;
        } else {
            image.scale(self.cell_size, self.cell_size);
            self.background = tile(&image, self.width, self.height, self.cell_size);
        }
        self.background.mark_dirty();
        debug!("World: background replaced (full_image: {})", full_image);
    }

    pub fn set_background_path(&mut self, path: impl AsRef<Path>, full_image: bool) -> Result<()> {
        let image = Image::from_path(path)?;
        self.set_background(image, full_image);
        Ok(())
    }

    pub fn set_script(&mut self, script: impl WorldScript + 'static) {
        self.script = Some(Box::new(script));
    }

    pub fn clear_script(&mut self) {
        self.script = None;
    }

    // --- registry ---

    pub fn add<A: Actor>(&mut self, actor: A) -> ActorId {
        self.add_boxed(Box::new(actor))
    }

    pub fn add_at<A: Actor>(&mut self, mut actor: A, x: i32, y: i32) -> ActorId {
        actor.sprite_mut().set_location(x, y);
        self.add(actor)
    }

    pub fn add_all(&mut self, actors: impl IntoIterator<Item = Box<dyn Actor>>) -> Vec<ActorId> {
        actors.into_iter().map(|a| self.add_boxed(a)).collect()
    }

    /// Adds a boxed actor. A kind seen for the first time gets a new bucket at
    /// the end of the paint order.
    pub fn add_boxed(&mut self, mut actor: Box<dyn Actor>) -> ActorId {
        let kind = (*actor).actor_kind();
        let id = ActorId(self.next_id);
        self.next_id += 1;

        let cell = self.cell_size;
        let sprite = actor.sprite_mut();
        sprite.set_id(id);
        if cell > 1 {
            if sprite.fits_to_cell() {
                sprite.image_mut().scale(cell, cell);
            }
            sprite.realign(cell);
        }

        self.bucket_mut(kind).push(id);
        self.actors.insert(id, actor);
        debug!("World: added {} {}", kind, id);
        id
    }

    /// Registers a kind without adding an actor, so it can take part in
    /// `set_paint_order` and `kind_named` before any instance exists.
    pub fn register<A: Actor>(&mut self) -> ActorKind {
        let kind = ActorKind::of::<A>();
        self.bucket_mut(kind);
        kind
    }

    /// Removes an actor. The area it was last drawn in is restored on the
    /// next update. An actor removing itself from inside `act` is dropped once
    /// its `act` returns, and `None` is returned here.
    pub fn remove(&mut self, id: ActorId) -> Option<Box<dyn Actor>> {
        let mut listed = false;
        for (_, ids) in &mut self.buckets {
            if let Some(pos) = ids.iter().position(|i| *i == id) {
                ids.remove(pos);
                listed = true;
                break;
            }
        }
        if !listed {
            return None;
        }
        let actor = self.actors.remove(&id)?;
        if let Some(rect) = actor.sprite().prev_rect() {
            self.pending_erase.push(rect);
        }
        debug!("World: removed {}", id);
        Some(actor)
    }

    /// Reorders buckets: the given kinds move to the end (painted last, in
    /// front) in the given order; the rest keep their relative order in front
    /// of them. Kinds without a bucket get an empty one.
    pub fn set_paint_order(&mut self, kinds: &[ActorKind]) {
        let mut remaining = std::mem::take(&mut self.buckets);
        let mut ordered: Vec<(ActorKind, Vec<ActorId>)> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if ordered.iter().any(|(k, _)| k == kind) {
                continue;
            }
            let bucket = match remaining.iter().position(|(k, _)| k == kind) {
                Some(i) => remaining.remove(i),
                None => (*kind, Vec::new()),
            };
            ordered.push(bucket);
        }
        remaining.extend(ordered);
        self.buckets = remaining;
        debug!(
            "World: paint order now {:?}",
            self.buckets.iter().map(|(k, _)| k.short_name()).collect::<Vec<_>>()
        );
    }

    /// Kinds in paint order.
    pub fn paint_order(&self) -> Vec<ActorKind> {
        self.buckets.iter().map(|(k, _)| *k).collect()
    }

    /// Actors of `kind`, or all actors when `None`, in paint order.
    pub fn get_objects(&self, kind: Option<ActorKind>) -> Vec<ActorId> {
        match kind {
            Some(kind) => self
                .buckets
                .iter()
                .find(|(k, _)| *k == kind)
                .map(|(_, ids)| ids.clone())
                .unwrap_or_default(),
            None => self
                .buckets
                .iter()
                .flat_map(|(_, ids)| ids.iter().copied())
                .collect(),
        }
    }

    pub fn objects_of<A: Actor>(&self) -> Vec<ActorId> {
        self.get_objects(Some(ActorKind::of::<A>()))
    }

    /// Resolves a registered kind by its type name, with or without module
    /// path.
    pub fn kind_named(&self, name: &str) -> Result<ActorKind> {
        self.buckets
            .iter()
            .map(|(k, _)| *k)
            .find(|k| k.short_name() == name || k.name() == name)
            .ok_or_else(|| FootError::NotAnActor(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, ids)| ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn actor(&self, id: ActorId) -> Option<&dyn Actor> {
        self.actors.get(&id).map(|a| &**a)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut dyn Actor> {
        self.actors.get_mut(&id).map(|a| &mut **a)
    }

    pub fn downcast_ref<A: Actor>(&self, id: ActorId) -> Option<&A> {
        self.actors
            .get(&id)
            .and_then(|a| (**a).as_any().downcast_ref::<A>())
    }

    pub fn downcast_mut<A: Actor>(&mut self, id: ActorId) -> Option<&mut A> {
        self.actors
            .get_mut(&id)
            .and_then(|a| (**a).as_any_mut().downcast_mut::<A>())
    }

    pub fn sprite(&self, id: ActorId) -> Option<&Sprite> {
        self.actors.get(&id).map(|a| a.sprite())
    }

    pub fn sprite_mut(&mut self, id: ActorId) -> Option<&mut Sprite> {
        self.actors.get_mut(&id).map(|a| a.sprite_mut())
    }

    /// Shows `text` at cell `(x, y)` by adding a `Text` actor.
    pub fn show_text(&mut self, text: &str, x: i32, y: i32) -> ActorId {
        self.add_at(Text::new(text), x, y)
    }

    fn bucket_mut(&mut self, kind: ActorKind) -> &mut Vec<ActorId> {
        let index = match self.buckets.iter().position(|(k, _)| *k == kind) {
            Some(i) => i,
            None => {
                self.buckets.push((kind, Vec::new()));
                self.buckets.len() - 1
            }
        };
        &mut self.buckets[index].1
    }

    fn is_listed(&self, id: ActorId) -> bool {
        self.buckets.iter().any(|(_, ids)| ids.contains(&id))
    }

    // --- act ---

    /// Runs the world script, then every actor's `act` in paint order.
    pub(crate) fn act_all(&mut self, input: &Input, commands: &mut Vec<Command>) {
        self.run_script(input, commands);
        for id in self.get_objects(None) {
            self.act_actor(id, input, commands);
        }
    }

    /// Runs the world script, if any. The script is detached while it runs.
    pub(crate) fn run_script(&mut self, input: &Input, commands: &mut Vec<Command>) {
        let Some(mut script) = self.script.take() else {
            return;
        };
        let mut ctx = Context::new(self, input, None, commands);
        script.act(&mut ctx);
        // The script may have installed a replacement for itself.
        if self.script.is_none() {
            self.script = Some(script);
        }
    }

    /// Runs one actor's `act`. The actor is taken out of the world for the
    /// duration, so `ctx.world` does not see it; it stays listed in its
    /// bucket and keeps its paint position.
    pub(crate) fn act_actor(&mut self, id: ActorId, input: &Input, commands: &mut Vec<Command>) {
        let Some(mut actor) = self.actors.remove(&id) else {
            return;
        };
        {
            let mut ctx = Context::new(self, input, Some(id), commands);
            actor.act(&mut ctx);
        }
        if self.is_listed(id) {
            self.actors.insert(id, actor);
        } else {
            // Removed itself while acting.
            if let Some(rect) = actor.sprite().prev_rect() {
                self.pending_erase.push(rect);
            }
            debug!("World: {} removed during act", id);
        }
    }

    // --- update ---

    /// Every actor with its last drawn rectangle, in paint order.
    fn drawn_order(&self) -> Vec<(ActorId, Option<Rect>)> {
        self.get_objects(None)
            .into_iter()
            .map(|id| (id, self.sprite(id).and_then(|s| s.prev_rect())))
            .collect()
    }

    /// Background pass. A dirty background repaints the whole display
    /// (background, then every actor's last render where it was drawn) and
    /// returns the world rectangle. Otherwise only the areas of removed actors
    /// are restored. `None` when nothing was drawn.
    pub fn update(&mut self, display: &mut Image) -> Option<Rect> {
        let bounds = self.bounds();
        if self.background.take_dirty() {
            display.copy_from(&self.background, bounds, (0, 0));
            for id in self.get_objects(None) {
                let Some(sprite) = self.sprite(id) else {
                    continue;
                };
                if let (Some(render), Some(rect)) = (sprite.rendered(), sprite.prev_rect()) {
                    display.blit(render, rect.top_left());
                }
            }
            self.pending_erase.clear();
            debug!("World: full repaint {:?}", bounds);
            return Some(bounds);
        }

        if self.pending_erase.is_empty() {
            return None;
        }
        let order = self.drawn_order();
        let mut touched = Vec::new();
        for rect in std::mem::take(&mut self.pending_erase) {
            let ops = damage::plan_erase(rect, bounds, &order);
            touched.extend(self.execute(&ops, display));
        }
        union_all(&touched)
    }

    /// Repaints one actor if it changed. Returns every rectangle touched, or
    /// `None` when the actor needs no repaint or lies entirely outside the
    /// world.
    pub fn update_actor(&mut self, id: ActorId, display: &mut Image) -> Option<Vec<Rect>> {
        let cell = self.cell_size;
        let bounds = self.bounds();
        let needs_repaint = self.sprite(id)?.needs_repaint(cell);
        if !needs_repaint {
            return None;
        }
        let order = self.drawn_order();

        let sprite = self.sprite_mut(id)?;
        sprite.refresh_render();
        let new_rect = sprite.screen_rect(cell);
        let prev_rect = sprite.prev_rect();
        sprite.mark_drawn(new_rect);

        let ops = damage::plan_actor_repaint(id, new_rect, prev_rect, bounds, &order);
        let touched = self.execute(&ops, display);
        if touched.is_empty() {
            None
        } else {
            Some(touched)
        }
    }

    /// Background pass followed by every actor in paint order. Returns all
    /// rectangles touched this frame.
    pub fn render(&mut self, display: &mut Image) -> Vec<Rect> {
        let mut rects: Vec<Rect> = self.update(display).into_iter().collect();
        for id in self.get_objects(None) {
            if let Some(touched) = self.update_actor(id, display) {
                rects.extend(touched);
            }
        }
        rects
    }

    fn execute(&self, ops: &[BlitOp], display: &mut Image) -> Vec<Rect> {
        ops.iter()
            .filter_map(|op| {
                let touched = match op.source {
                    BlitSource::Background => {
                        display.copy_from(&self.background, op.dest, op.dest.top_left())
                    }
                    BlitSource::Actor { id, .. } => {
                        let render = self.sprite(id).and_then(|s| s.rendered())?;
                        display.blit_region(render, op.source_rect(), op.dest.top_left())
                    }
                };
                trace!("World: {:?} -> {:?}", op, touched);
                touched
            })
            .collect()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cell_size", &self.cell_size)
            .field("speed", &self.speed)
            .field("actors", &self.len())
            .field("paint_order", &self.paint_order())
            .finish()
    }
}

/// Largest world edge in pixels. Larger requests are clamped to it.
pub const MAX_WORLD_PX: u32 = 16_384;

/// `cells * cell_size`, clamped to [`MAX_WORLD_PX`].
fn world_px(cells: u32, cell_size: u32) -> u32 {
    let px = cells.checked_mul(cell_size).unwrap_or(u32::MAX);
    if px > MAX_WORLD_PX {
        warn!(
            "World: {} cells of {} px exceeds {} px, clamping",
            cells, cell_size, MAX_WORLD_PX
        );
        return MAX_WORLD_PX;
    }
    px
}

/// White with diagonal hatching in free worlds; a tiled bordered cell in grid
/// worlds.
fn default_background(width: u32, height: u32, cell_size: u32) -> Image {
    let background = &CONFIG.background;
    if cell_size == 1 {
        let mut img = Image::new(width, height);
        img.fill(Some(Color::WHITE));
        let spacing = background.hatch_spacing.max(1) as usize;
        let (w, h) = (width as i32, height as i32);
        for i in (0..w).step_by(spacing) {
            img.draw_line((i, 0), (w, h - i), None);
        }
        for i in (0..h).step_by(spacing) {
            img.draw_line((0, i), (w - i, h), None);
        }
        img
    } else {
        let mut cell = Image::new(cell_size, cell_size);
        cell.fill(Some(Color::WHITE));
        cell.drawing_width = background.grid_border;
        cell.draw_rect(cell_size, cell_size, (0, 0), None);
        tile(&cell, width, height, cell_size)
    }
}

fn tile(cell: &Image, width: u32, height: u32, cell_size: u32) -> Image {
    let mut img = Image::new(width, height);
    for y in (0..height).step_by(cell_size as usize) {
        for x in (0..width).step_by(cell_size as usize) {
            img.copy_from(cell, cell.bounds(), (x as i32, y as i32));
        }
    }
    img
}
