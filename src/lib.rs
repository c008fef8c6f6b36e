//! ferrofoot library crate.
//!
//! A small 2D game framework: actors live in a world, act once per frame, and
//! the world repaints only the screen areas that changed.
//!
//! ```no_run
//! use ferrofoot::display::{DisplayDriver, HeadlessDisplayDriver};
//! use ferrofoot::{Game, Sprite, World};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut world = World::new(600, 400, 1);
//! world.add_at(Sprite::with_default_image(), 200, 200);
//! let mut game = Game::with_world(HeadlessDisplayDriver::new()?, world)?;
//! game.step()?;
//! # Ok(())
//! # }
//! ```

pub mod actor;
pub mod clock;
pub mod color;
pub mod config;
pub mod damage;
pub mod display;
pub mod error;
pub mod game;
pub mod geometry;
pub mod image;
pub mod input;
pub mod keys;
pub mod scaffold;
pub mod text;
pub mod world;

pub use actor::{default_image, Actor, ActorId, ActorKind, Sprite};
pub use color::{Color, NamedColor};
pub use error::{FootError, Result};
pub use game::{Context, FrameStatus, Game};
pub use geometry::{Point, Rect};
pub use image::Image;
pub use input::{all_keys, Input, MouseInfo};
pub use keys::{KeySymbol, Modifiers, MouseButton};
pub use text::Text;
pub use world::{World, WorldScript};

/// Initializes `env_logger`. The default filter is `info`; `RUST_LOG`
/// overrides it. Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .try_init();
}
