// src/scaffold.rs

//! Project skeletons for `ferrofoot init`.
//!
//! A new project gets folders for its assets and a small game with one actor
//! steered by the W, A, S and D keys.

use crate::error::{FootError, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Asset folders every project starts with.
pub const ASSET_DIRS: [&str; 2] = ["Graphics", "Sounds"];

const CARGO_TEMPLATE: &str = r#"[package]
name = "{name}"
version = "0.1.0"
edition = "2021"

[dependencies]
anyhow = "1.0"
ferrofoot = { version = "{version}", features = ["x11"] }
"#;

const MAIN_TEMPLATE: &str = r#"use ferrofoot::display::{DisplayDriver, X11DisplayDriver};
use ferrofoot::{Actor, Context, Game, Sprite, World};

struct MyActor {
    sprite: Sprite,
}

impl Actor for MyActor {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn act(&mut self, ctx: &mut Context<'_>) {
        let down = |key| ctx.input.is_key_down(key).unwrap_or(false);
        if down("w") {
            self.sprite.y -= 1;
        }
        if down("s") {
            self.sprite.y += 1;
        }
        if down("a") {
            self.sprite.x -= 1;
        }
        if down("d") {
            self.sprite.x += 1;
        }
    }
}

fn main() -> anyhow::Result<()> {
    ferrofoot::init_logging();
    let mut world = World::new(600, 400, 1);
    world.add_at(
        MyActor {
            sprite: Sprite::with_default_image(),
        },
        200,
        200,
    );
    let mut game = Game::with_world(X11DisplayDriver::new()?, world)?;
    game.set_title("{name}")?;
    game.run()
}
"#;

/// Creates `<dir>/<name>/` with the asset folders, a `Cargo.toml` and a
/// starter `src/main.rs`. Fails if `<dir>/<name>` already exists.
pub fn init_project(name: &str, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let root = dir.as_ref().join(name);
    if root.exists() {
        return Err(FootError::AlreadyExists(root));
    }
    create_dir(&root)?;
    for asset in ASSET_DIRS {
        create_dir(&root.join(asset))?;
    }
    create_dir(&root.join("src"))?;

    let cargo = CARGO_TEMPLATE
        .replace("{name}", &crate_name(name))
        .replace("{version}", env!("CARGO_PKG_VERSION"));
    write_file(&root.join("Cargo.toml"), &cargo)?;
    write_file(&root.join("src").join("main.rs"), &MAIN_TEMPLATE.replace("{name}", name))?;

    info!("Created project '{}' in {}", name, root.display());
    Ok(root)
}

/// Cargo package names allow alphanumerics, `-` and `_`.
fn crate_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        format!("game_{}", cleaned)
    } else {
        cleaned.to_ascii_lowercase()
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path).map_err(|source| FootError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| FootError::Io {
        path: path.to_path_buf(),
        source,
    })
}
