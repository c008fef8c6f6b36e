//! Damage tracking scenarios driven through the public `World` API.

use ferrofoot::geometry::union_all;
use ferrofoot::{Actor, ActorKind, Color, Image, Point, Rect, Sprite, World};
use test_log::test;

const RED: Color = Color::rgb(255, 0, 0);
const GREEN: Color = Color::rgb(0, 255, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

macro_rules! block_actor {
    ($($name:ident),*) => {
        $(
            struct $name(Sprite);

            impl $name {
                fn at(x: i32, y: i32, color: Color) -> Self {
                    let mut sprite = Sprite::new(Image::solid(10, 10, color));
                    sprite.set_location(x, y);
                    Self(sprite)
                }
            }

            impl Actor for $name {
                fn sprite(&self) -> &Sprite {
                    &self.0
                }

                fn sprite_mut(&mut self) -> &mut Sprite {
                    &mut self.0
                }
            }
        )*
    };
}

block_actor!(Alpha, Beta, Gamma);

fn painted_world(width: u32, height: u32) -> (World, Image) {
    let mut world = World::new(width, height, 1);
    world.set_background(Image::solid(1, 1, Color::WHITE), true);
    let mut display = Image::new(width, height);
    world.render(&mut display);
    (world, display)
}

fn pixel(display: &Image, x: i32, y: i32) -> Color {
    display.get_color_at((x, y)).unwrap()
}

#[test]
fn moving_actor_damages_old_and_new_area_only() {
    let (mut world, mut display) = painted_world(200, 200);
    let id = world.add_at(Alpha::at(0, 0, RED), 50, 50);

    let first = world.update_actor(id, &mut display).unwrap();
    assert_eq!(union_all(&first), Some(Rect::new(50, 50, 10, 10)));
    assert!(world.update_actor(id, &mut display).is_none());

    world.sprite_mut(id).unwrap().set_location(60, 50);
    let moved = world.update_actor(id, &mut display).unwrap();
    assert_eq!(union_all(&moved), Some(Rect::new(50, 50, 20, 10)));
    assert!(world.update_actor(id, &mut display).is_none());
    assert!(world.render(&mut display).is_empty());
}

#[test]
fn grid_actors_are_centred_in_their_cell() {
    let mut world = World::new(10, 10, 20);
    let id = world.add_at(Alpha::at(0, 0, RED), 3, 3);
    let mut display = Image::new(200, 200);
    world.render(&mut display);
    let rect = world.sprite(id).unwrap().prev_rect().unwrap();
    assert_eq!(rect.top_left(), Point::new(65, 65));
}

#[test]
fn paint_order_decides_who_is_on_top() {
    let (mut world, mut display) = painted_world(40, 40);
    world.add_at(Alpha::at(0, 0, RED), 5, 5);
    world.add_at(Beta::at(0, 0, GREEN), 5, 5);
    world.add_at(Gamma::at(0, 0, BLUE), 5, 5);
    world.set_paint_order(&[
        ActorKind::of::<Gamma>(),
        ActorKind::of::<Alpha>(),
        ActorKind::of::<Beta>(),
    ]);
    world.render(&mut display);
    assert_eq!(pixel(&display, 9, 9), GREEN);

    world.background_mut().mark_dirty();
    world.set_paint_order(&[ActorKind::of::<Beta>(), ActorKind::of::<Gamma>()]);
    world.render(&mut display);
    assert_eq!(pixel(&display, 9, 9), BLUE);
}

#[test]
fn removed_actor_leaves_background_behind() {
    let (mut world, mut display) = painted_world(50, 50);
    let id = world.add_at(Alpha::at(0, 0, RED), 20, 20);
    world.render(&mut display);
    assert_eq!(pixel(&display, 25, 25), RED);

    world.remove(id).unwrap();
    let touched = world.render(&mut display);
    assert_eq!(touched, vec![Rect::new(20, 20, 10, 10)]);
    assert_eq!(pixel(&display, 25, 25), Color::WHITE);
}

#[test]
fn rotated_actor_is_redrawn_with_grown_bounds() {
    let (mut world, mut display) = painted_world(60, 60);
    let mut sprite = Sprite::new(Image::solid(10, 20, RED));
    sprite.set_location(20, 20);
    let id = world.add(sprite);
    world.render(&mut display);

    world.sprite_mut(id).unwrap().set_rotation(90.0);
    world.render(&mut display);
    assert_eq!(
        world.sprite(id).unwrap().prev_rect(),
        Some(Rect::new(15, 25, 20, 10))
    );
    assert_eq!(pixel(&display, 16, 30), RED);
    assert_eq!(pixel(&display, 25, 22), Color::WHITE);

    world.sprite_mut(id).unwrap().set_rotation(450.0);
    assert!(world.render(&mut display).is_empty());
}

#[test]
fn back_actor_moving_under_a_front_actor_stays_behind() {
    let (mut world, mut display) = painted_world(60, 20);
    let back = world.add_at(Alpha::at(0, 0, RED), 0, 0);
    world.add_at(Beta::at(0, 0, BLUE), 15, 0);
    world.render(&mut display);

    world.sprite_mut(back).unwrap().x = 10;
    world.render(&mut display);
    assert_eq!(pixel(&display, 5, 5), Color::WHITE);
    assert_eq!(pixel(&display, 12, 5), RED);
    assert_eq!(pixel(&display, 17, 5), BLUE);
    assert_eq!(pixel(&display, 22, 5), BLUE);
    assert_eq!(pixel(&display, 26, 5), Color::WHITE);
}

#[test]
fn back_actor_sliding_out_from_under_a_front_actor_uncovers_the_background() {
    let (mut world, mut display) = painted_world(60, 20);
    let back = world.add_at(Alpha::at(0, 0, RED), 10, 0);
    world.add_at(Beta::at(0, 0, BLUE), 15, 0);
    world.render(&mut display);
    assert_eq!(pixel(&display, 12, 5), RED);
    assert_eq!(pixel(&display, 17, 5), BLUE);

    world.sprite_mut(back).unwrap().x = 30;
    world.render(&mut display);
    assert_eq!(pixel(&display, 12, 5), Color::WHITE);
    assert_eq!(pixel(&display, 17, 5), BLUE);
    assert_eq!(pixel(&display, 22, 5), BLUE);
    assert_eq!(pixel(&display, 32, 5), RED);
}

#[test]
fn front_actor_moving_off_a_back_actor_uncovers_it() {
    let (mut world, mut display) = painted_world(60, 20);
    world.add_at(Alpha::at(0, 0, RED), 0, 0);
    let front = world.add_at(Beta::at(0, 0, BLUE), 5, 0);
    world.render(&mut display);
    assert_eq!(pixel(&display, 7, 5), BLUE);

    world.sprite_mut(front).unwrap().x = 20;
    world.render(&mut display);
    assert_eq!(pixel(&display, 3, 5), RED);
    assert_eq!(pixel(&display, 7, 5), RED);
    assert_eq!(pixel(&display, 12, 5), Color::WHITE);
    assert_eq!(pixel(&display, 22, 5), BLUE);
}

#[test]
fn front_actor_moving_onto_a_back_actor_covers_it() {
    let (mut world, mut display) = painted_world(60, 20);
    world.add_at(Alpha::at(0, 0, RED), 20, 0);
    let front = world.add_at(Beta::at(0, 0, BLUE), 0, 0);
    world.render(&mut display);

    world.sprite_mut(front).unwrap().x = 15;
    world.render(&mut display);
    assert_eq!(pixel(&display, 5, 5), Color::WHITE);
    assert_eq!(pixel(&display, 17, 5), BLUE);
    assert_eq!(pixel(&display, 22, 5), BLUE);
    assert_eq!(pixel(&display, 27, 5), RED);
}

#[test]
fn overlap_chains_three_deep_stay_in_paint_order() {
    let (mut world, mut display) = painted_world(60, 20);
    let a = world.add_at(Alpha::at(0, 0, RED), 0, 0);
    world.add_at(Beta::at(0, 0, BLUE), 8, 0);
    world.add_at(Gamma::at(0, 0, GREEN), 16, 0);
    world.render(&mut display);
    assert_eq!(pixel(&display, 17, 5), GREEN);

    world.sprite_mut(a).unwrap().x = 1;
    let touched = world.render(&mut display);
    assert_eq!(union_all(&touched), Some(Rect::new(0, 0, 11, 10)));
    assert_eq!(pixel(&display, 0, 5), Color::WHITE);
    assert_eq!(pixel(&display, 5, 5), RED);
    assert_eq!(pixel(&display, 9, 5), BLUE);
    assert_eq!(pixel(&display, 17, 5), GREEN);
    assert_eq!(pixel(&display, 20, 5), GREEN);
}
