// In src/main.rs

//! The `ferrofoot` command line tool.
//!
//! ```text
//! ferrofoot init <name> [-dir <dir>]   create a new game project
//! ferrofoot demo                       run the bundled demo
//! ```

use anyhow::{bail, Context as _};
use ferrofoot::display::DisplayDriver;
use ferrofoot::{scaffold, Actor, Context, Game, Sprite, Text, World};
use log::info;
use std::path::PathBuf;

const USAGE: &str = "usage: ferrofoot init <name> [-dir <dir>] | ferrofoot demo";

/// Frames the headless demo runs before exiting.
#[cfg(not(feature = "x11"))]
const HEADLESS_DEMO_FRAMES: u32 = 120;

enum Command {
    Init { name: String, dir: PathBuf },
    Demo,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Command> {
    match args.next().as_deref() {
        Some("init") => {
            let Some(name) = args.next() else {
                bail!("missing project name\n{}", USAGE);
            };
            let mut dir = PathBuf::from(".");
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "-dir" | "--dir" => {
                        dir = args
                            .next()
                            .map(PathBuf::from)
                            .with_context(|| format!("{} needs a folder\n{}", arg, USAGE))?;
                    }
                    other => bail!("unexpected argument '{}'\n{}", other, USAGE),
                }
            }
            Ok(Command::Init { name, dir })
        }
        Some("demo") => Ok(Command::Demo),
        Some(other) => bail!("unknown command '{}'\n{}", other, USAGE),
        None => bail!("{}", USAGE),
    }
}

/// Main entry point for the `ferrofoot` tool.
fn main() -> anyhow::Result<()> {
    ferrofoot::init_logging();

    match parse_args(std::env::args().skip(1))? {
        Command::Init { name, dir } => {
            let root = scaffold::init_project(&name, &dir)
                .with_context(|| format!("Failed to create project '{}'", name))?;
            println!("Created {}", root.display());
            Ok(())
        }
        Command::Demo => run_demo(),
    }
}

/// Walks around with W/A/S/D and counts its steps on screen.
struct Walker {
    sprite: Sprite,
    steps: u32,
    counter: Option<ferrofoot::ActorId>,
}

impl Actor for Walker {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    fn act(&mut self, ctx: &mut Context<'_>) {
        let down = |key| ctx.input.is_key_down(key).unwrap_or(false);
        let (dx, dy) = match (down("a"), down("d"), down("w"), down("s")) {
            (true, false, _, _) => (-2, 0),
            (false, true, _, _) => (2, 0),
            (_, _, true, false) => (0, -2),
            (_, _, false, true) => (0, 2),
            _ => (0, 0),
        };
        if (dx, dy) == (0, 0) {
            return;
        }
        self.sprite.x += dx;
        self.sprite.y += dy;
        if self.sprite.at_edge(ctx.world) {
            self.sprite.x -= dx;
            self.sprite.y -= dy;
            return;
        }
        self.steps += 1;
        if let Some(text) = self.counter.and_then(|id| ctx.world.downcast_mut::<Text>(id)) {
            text.set_message(format!("steps: {}", self.steps));
        }
    }
}

fn demo_world() -> World {
    let mut world = World::new(600, 400, 1);
    let counter = world.show_text("steps: 0", 10, 10);
    world.add_at(
        Walker {
            sprite: Sprite::with_default_image(),
            steps: 0,
            counter: Some(counter),
        },
        275,
        175,
    );
    world
}

#[cfg(feature = "x11")]
fn run_demo() -> anyhow::Result<()> {
    use ferrofoot::display::X11DisplayDriver;

    let driver = X11DisplayDriver::new().context("Failed to open X11 display")?;
    let mut game = Game::with_world(driver, demo_world())?;
    game.set_title("ferrofoot demo")?;
    game.run()?;
    info!("ferrofoot demo exited successfully.");
    Ok(())
}

#[cfg(not(feature = "x11"))]
fn run_demo() -> anyhow::Result<()> {
    use ferrofoot::display::HeadlessDisplayDriver;
    use ferrofoot::FrameStatus;

    info!("Built without the x11 feature; running the demo headless");
    let driver = HeadlessDisplayDriver::new()?;
    let mut game = Game::with_world(driver, demo_world())?;
    for _ in 0..HEADLESS_DEMO_FRAMES {
        if game.step()? == FrameStatus::Shutdown {
            break;
        }
    }
    info!(
        "ferrofoot demo presented {} frame(s).",
        game.driver().presents().len()
    );
    Ok(())
}
