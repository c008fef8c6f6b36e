// src/game/tests.rs

use super::*;
use crate::actor::{Actor, Sprite};
use crate::display::{DisplayEvent, HeadlessDisplayDriver};
use crate::geometry::Rect;
use crate::world::WorldScript;
use test_log::test;

const RED: Color = Color::rgb(255, 0, 0);

/// A white free world that runs unthrottled.
fn quick_world(width: u32, height: u32) -> World {
    let mut world = World::new(width, height, 1);
    world.set_background(Image::solid(1, 1, Color::WHITE), true);
    world.set_speed(0);
    world
}

fn game_with(world: World) -> Game<HeadlessDisplayDriver> {
    Game::with_world(HeadlessDisplayDriver::default(), world).expect("headless init")
}

struct Mover(Sprite);

impl Actor for Mover {
    fn sprite(&self) -> &Sprite {
        &self.0
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.0
    }

    fn act(&mut self, _ctx: &mut Context<'_>) {
        self.0.x += 10;
    }
}

fn mover(x: i32, y: i32) -> Mover {
    let mut sprite = Sprite::new(Image::solid(10, 10, RED));
    sprite.set_location(x, y);
    Mover(sprite)
}

#[test]
fn it_should_require_a_world() {
    let mut game = Game::new(HeadlessDisplayDriver::default());
    assert!(matches!(game.world(), Err(FootError::NoWorld)));
    assert!(matches!(game.color_at(0, 0), Err(FootError::NoWorld)));
    assert!(game.step().is_err());
    assert!(game.run().is_err());
}

#[test]
fn it_should_open_the_window_at_world_size() {
    let game = game_with(quick_world(120, 80));
    assert_eq!(game.driver().size(), Some((120, 80)));
    assert_eq!(game.driver().title(), CONFIG.window.title);
    assert_eq!(game.display().unwrap().dimensions(), (120, 80));
}

#[test]
fn it_should_present_the_whole_world_first_then_only_damage() {
    let mut game = game_with(quick_world(100, 100));
    let id = game.world_mut().unwrap().add(mover(0, 0));

    assert_eq!(game.step().unwrap(), FrameStatus::Running);
    let first = game.driver().presents()[0].clone();
    assert_eq!(first[0], Rect::from_size(100, 100));

    assert_eq!(game.step().unwrap(), FrameStatus::Running);
    let second = &game.driver().presents()[1];
    assert!(second.iter().all(|r| r.intersects(&Rect::new(10, 0, 20, 10))));
    assert!(!second.contains(&Rect::from_size(100, 100)));

    assert_eq!(game.world().unwrap().sprite(id).unwrap().x, 20);
    assert_eq!(game.color_at(25, 5).unwrap(), RED);
    assert_eq!(game.color_at(5, 5).unwrap(), Color::WHITE);
}

#[test]
fn it_should_skip_present_when_nothing_changed() {
    let mut game = game_with(quick_world(50, 50));
    game.world_mut().unwrap().add(Sprite::new(Image::solid(5, 5, RED)));
    game.step().unwrap();
    game.step().unwrap();
    assert_eq!(game.driver().presents().len(), 1);
}

#[test]
fn it_should_shut_down_when_the_window_closes() {
    let mut game = game_with(quick_world(50, 50));
    game.driver_mut().push_event(DisplayEvent::CloseRequested);
    assert_eq!(game.step().unwrap(), FrameStatus::Shutdown);
    assert!(game.driver().presents().is_empty());
}

#[test]
fn it_should_leave_run_on_close() {
    let mut game = game_with(quick_world(50, 50));
    game.driver_mut().push_event(DisplayEvent::CloseRequested);
    game.run().unwrap();
}

struct Stopper;

impl WorldScript for Stopper {
    fn act(&mut self, ctx: &mut Context<'_>) {
        ctx.set_title("stopping");
        ctx.stop();
    }
}

#[test]
fn it_should_finish_the_frame_before_stopping() {
    let mut world = quick_world(40, 40);
    world.set_script(Stopper);
    let mut game = game_with(world);
    assert_eq!(game.step().unwrap(), FrameStatus::Shutdown);
    assert_eq!(game.driver().presents().len(), 1);
    assert_eq!(game.driver().title(), "stopping");
}

struct Switcher {
    next: Option<World>,
}

impl WorldScript for Switcher {
    fn act(&mut self, ctx: &mut Context<'_>) {
        if let Some(world) = self.next.take() {
            ctx.switch_world(world);
        }
    }
}

#[test]
fn it_should_switch_worlds_between_frames() {
    let mut first = quick_world(40, 40);
    first.set_script(Switcher {
        next: Some(quick_world(60, 30)),
    });
    let mut game = game_with(first);

    assert_eq!(game.step().unwrap(), FrameStatus::Running);
    assert_eq!(game.world().unwrap().width(), 60);
    assert_eq!(game.driver().size(), Some((60, 30)));
    assert_eq!(game.driver().presents()[0], vec![Rect::from_size(60, 30)]);
}

#[test]
fn it_should_keep_the_frame_after_a_failed_present() {
    let mut game = game_with(quick_world(30, 30));
    game.driver_mut().fail_next_present();
    assert!(game.step().is_err());
    assert!(game.display().is_ok());

    // The failed frame is not repainted; the game carries on.
    game.world_mut().unwrap().add(Sprite::new(Image::solid(4, 4, RED)));
    assert_eq!(game.step().unwrap(), FrameStatus::Running);
    assert_eq!(game.color_at(1, 1).unwrap(), RED);
}

#[test]
fn it_should_forward_title_and_icon() {
    let mut game = game_with(quick_world(20, 20));
    game.set_title("Crab Hunt").unwrap();
    game.set_icon(Image::new(16, 16)).unwrap();
    assert_eq!(game.driver().title(), "Crab Hunt");
    assert_eq!(game.driver().icon_size(), Some((16, 16)));
}

#[test]
fn it_should_return_the_previous_world() {
    let mut game = game_with(quick_world(20, 20));
    let old = game.set_world(quick_world(10, 10)).unwrap();
    assert_eq!(old.map(|w| w.width()), Some(20));
    assert_eq!(game.display().unwrap().dimensions(), (10, 10));
}

#[test]
fn it_should_feed_events_to_input() {
    let mut game = game_with(quick_world(20, 20));
    game.driver_mut().push_event(DisplayEvent::MouseMove {
        x: 7,
        y: 9,
        modifiers: crate::keys::Modifiers::empty(),
    });
    game.step().unwrap();
    assert_eq!(game.input().mouse_pos(), crate::geometry::Point::new(7, 9));
    assert_eq!(game.input().events().len(), 1);
}
