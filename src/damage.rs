// src/damage.rs

//! Repaint planning for the incremental compositor.
//!
//! Planning is pure: given the rectangles involved and the paint order, these
//! functions return the blits to perform, in order. `World` executes them
//! against the display buffer.
//!
//! Every blit is clipped to the damage rectangle of its pass, so a pass
//! rebuilds that rectangle back to front and never touches pixels outside it.

use crate::actor::ActorId;
use crate::geometry::{Point, Rect};
use log::trace;

/// Where the pixels of a blit come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlitSource {
    /// The world background; `dest` is copied from the same region of it.
    Background,
    /// An actor's cached render, whose top-left sits at `origin` on screen.
    Actor { id: ActorId, origin: Point },
}

/// One step of a repaint. `dest` is the screen region written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlitOp {
    pub source: BlitSource,
    pub dest: Rect,
}

impl BlitOp {
    pub fn background(dest: Rect) -> Self {
        Self {
            source: BlitSource::Background,
            dest,
        }
    }

    /// The part of an actor drawn at `rect` that falls inside `damage`, or
    /// `None` if they do not overlap.
    pub fn actor(id: ActorId, rect: Rect, damage: Rect) -> Option<Self> {
        let dest = rect.intersection(&damage)?;
        Some(Self {
            source: BlitSource::Actor {
                id,
                origin: rect.top_left(),
            },
            dest,
        })
    }

    /// For actor blits, the region of the actor's render that lands on `dest`.
    pub fn source_rect(&self) -> Rect {
        match self.source {
            BlitSource::Background => self.dest,
            BlitSource::Actor { origin, .. } => self.dest.translate(-origin.x, -origin.y),
        }
    }
}

/// Plans the repaint of `target` moving (or changing) from `prev_rect` to
/// `new_rect`.
///
/// `order` lists every actor of the world in paint order with its last drawn
/// rectangle. For each of the new and the previous rectangle, clipped to
/// `bounds`: the background is restored, earlier actors touching it are
/// recomposited, then `target` at `new_rect`, then later actors touching it.
pub fn plan_actor_repaint(
    target: ActorId,
    new_rect: Rect,
    prev_rect: Option<Rect>,
    bounds: Rect,
    order: &[(ActorId, Option<Rect>)],
) -> Vec<BlitOp> {
    let (before, after) = match order.iter().position(|(id, _)| *id == target) {
        Some(i) => (&order[..i], &order[i + 1..]),
        None => (order, &order[order.len()..]),
    };

    let mut ops = Vec::new();
    for damage in std::iter::once(new_rect).chain(prev_rect) {
        let Some(damage) = damage.clip_to(&bounds) else {
            continue;
        };
        ops.push(BlitOp::background(damage));
        ops.extend(intersecting(before, damage));
        ops.extend(BlitOp::actor(target, new_rect, damage));
        ops.extend(intersecting(after, damage));
    }
    trace!(
        "plan_actor_repaint {}: {} op(s) for {:?} <- {:?}",
        target,
        ops.len(),
        new_rect,
        prev_rect
    );
    ops
}

/// Plans erasing `rect` (e.g. where a removed actor was): restore the
/// background, then recomposite every actor touching it in paint order.
pub fn plan_erase(rect: Rect, bounds: Rect, order: &[(ActorId, Option<Rect>)]) -> Vec<BlitOp> {
    let Some(damage) = rect.clip_to(&bounds) else {
        return Vec::new();
    };
    std::iter::once(BlitOp::background(damage))
        .chain(intersecting(order, damage))
        .collect()
}

fn intersecting(
    group: &[(ActorId, Option<Rect>)],
    damage: Rect,
) -> impl Iterator<Item = BlitOp> + '_ {
    group
        .iter()
        .filter_map(move |(id, rect)| rect.and_then(|r| BlitOp::actor(*id, r, damage)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const BOUNDS: Rect = Rect::from_size(200, 200);

    fn id(n: u64) -> ActorId {
        ActorId(n)
    }

    fn clipped(n: u64, rect: Rect, damage: Rect) -> BlitOp {
        BlitOp::actor(id(n), rect, damage).unwrap()
    }

    #[test]
    fn it_should_paint_only_new_rect_on_first_draw() {
        let new = Rect::new(10, 10, 5, 5);
        let ops = plan_actor_repaint(id(1), new, None, BOUNDS, &[(id(1), None)]);
        assert_eq!(ops, vec![BlitOp::background(new), clipped(1, new, new)]);
    }

    #[test]
    fn it_should_restore_both_rects_when_moving() {
        let prev = Rect::new(50, 50, 10, 10);
        let new = Rect::new(60, 50, 10, 10);
        let ops = plan_actor_repaint(id(1), new, Some(prev), BOUNDS, &[(id(1), Some(prev))]);
        // The actor no longer covers any of `prev`, so that pass is background only.
        assert_eq!(
            ops,
            vec![
                BlitOp::background(new),
                clipped(1, new, new),
                BlitOp::background(prev),
            ]
        );
    }

    #[test]
    fn it_should_draw_the_overlap_of_a_short_move_in_both_passes() {
        let prev = Rect::new(50, 50, 10, 10);
        let new = Rect::new(55, 50, 10, 10);
        let ops = plan_actor_repaint(id(1), new, Some(prev), BOUNDS, &[(id(1), Some(prev))]);
        assert_eq!(ops[3], clipped(1, new, prev));
        assert_eq!(ops[3].dest, Rect::new(55, 50, 5, 10));
        assert_eq!(ops[3].source_rect(), Rect::new(0, 0, 5, 10));
    }

    #[test]
    fn it_should_sandwich_self_between_earlier_and_later_neighbours() {
        let below = Rect::new(0, 0, 10, 10);
        let above = Rect::new(5, 5, 10, 10);
        let me = Rect::new(3, 3, 4, 4);
        let order = [(id(1), Some(below)), (id(2), Some(me)), (id(3), Some(above))];
        let ops = plan_actor_repaint(id(2), me, Some(me), BOUNDS, &order);
        assert_eq!(
            &ops[..4],
            &[
                BlitOp::background(me),
                clipped(1, below, me),
                clipped(2, me, me),
                clipped(3, above, me),
            ]
        );
        assert_eq!(ops[1].dest, me);
        assert_eq!(ops[3].dest, Rect::new(5, 5, 2, 2));
        assert_eq!(ops[3].source_rect(), Rect::new(0, 0, 2, 2));
    }

    #[test]
    fn it_should_keep_later_neighbours_out_of_the_old_rect_pass() {
        // `me` moves right into `front`'s area; the old rect pass must not
        // redraw `me` over the part of `front` outside it.
        let prev = Rect::new(0, 0, 10, 10);
        let new = Rect::new(10, 0, 10, 10);
        let front = Rect::new(15, 0, 10, 10);
        let order = [(id(1), Some(prev)), (id(2), Some(front))];
        let ops = plan_actor_repaint(id(1), new, Some(prev), BOUNDS, &order);
        assert_eq!(
            ops,
            vec![
                BlitOp::background(new),
                clipped(1, new, new),
                clipped(2, front, new),
                BlitOp::background(prev),
            ]
        );
        assert!(ops.iter().all(|op| new.contains_rect(&op.dest) || prev.contains_rect(&op.dest)));
    }

    #[test]
    fn it_should_skip_neighbours_that_do_not_touch_the_damage() {
        let me = Rect::new(0, 0, 10, 10);
        let far = Rect::new(100, 100, 10, 10);
        let never_drawn = None;
        let order = [(id(1), Some(far)), (id(2), never_drawn), (id(3), None)];
        let ops = plan_actor_repaint(id(3), me, None, BOUNDS, &order);
        assert_eq!(ops.len(), 2);
    }

    #[test]
    fn it_should_clip_damage_to_the_world() {
        let new = Rect::new(195, 195, 10, 10);
        let ops = plan_actor_repaint(id(1), new, None, BOUNDS, &[]);
        assert_eq!(ops[0], BlitOp::background(Rect::new(195, 195, 5, 5)));
        assert_eq!(ops[1].dest, Rect::new(195, 195, 5, 5));
        assert_eq!(ops[1].source_rect(), Rect::new(0, 0, 5, 5));
    }

    #[test]
    fn it_should_plan_nothing_outside_the_world() {
        let new = Rect::new(300, 300, 10, 10);
        let prev = Rect::new(-50, -50, 10, 10);
        assert!(plan_actor_repaint(id(1), new, Some(prev), BOUNDS, &[]).is_empty());
        assert!(plan_erase(prev, BOUNDS, &[]).is_empty());
    }

    #[test]
    fn it_should_recomposite_everything_under_an_erased_rect() {
        let gone = Rect::new(0, 0, 10, 10);
        let a = Rect::new(5, 0, 10, 10);
        let b = Rect::new(50, 50, 10, 10);
        let ops = plan_erase(gone, BOUNDS, &[(id(1), Some(a)), (id(2), Some(b))]);
        assert_eq!(ops, vec![BlitOp::background(gone), clipped(1, a, gone)]);
        assert_eq!(ops[1].dest, Rect::new(5, 0, 5, 10));
    }
}
