// src/game.rs
//! The frame loop. `Game` owns the active world, the display buffer and the
//! display driver, and drives one frame per `step`:
//! poll input, tick the clock, act, update, present.

#[cfg(test)]
mod tests;

use crate::actor::ActorId;
use crate::clock::FrameClock;
use crate::color::Color;
use crate::config::CONFIG;
use crate::display::{DisplayDriver, DisplayError, DriverRequest, DriverResponse, FrameSnapshot};
use crate::error::{FootError, Result as FootResult};
use crate::image::Image;
use crate::input::Input;
use crate::world::World;
use anyhow::{anyhow, Context as _, Result};
use log::{debug, error, info, trace};

/// Represents the status of the game after a frame.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FrameStatus {
    /// The frame completed and the loop should continue.
    Running,
    /// The window was closed or a script asked to stop.
    Shutdown,
}

/// Requests queued by `act` code and applied after the act phase.
#[derive(Debug)]
pub enum Command {
    Stop,
    SwitchWorld(Box<World>),
    SetTitle(String),
}

/// What `act` callbacks get to work with.
pub struct Context<'a> {
    /// The active world. An acting actor is not in it while it acts.
    pub world: &'a mut World,
    pub input: &'a Input,
    id: Option<ActorId>,
    commands: &'a mut Vec<Command>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        world: &'a mut World,
        input: &'a Input,
        id: Option<ActorId>,
        commands: &'a mut Vec<Command>,
    ) -> Self {
        Self {
            world,
            input,
            id,
            commands,
        }
    }

    /// Id of the acting actor; `None` inside the world script.
    pub fn id(&self) -> Option<ActorId> {
        self.id
    }

    /// Ends the loop after the current frame has been presented.
    pub fn stop(&mut self) {
        self.commands.push(Command::Stop);
    }

    /// Makes `world` the active world from the next update on.
    pub fn switch_world(&mut self, world: World) {
        self.commands.push(Command::SwitchWorld(Box::new(world)));
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(title.into()));
    }

    /// Removes the acting actor from the world once its `act` returns.
    pub fn remove_self(&mut self) {
        if let Some(id) = self.id {
            self.world.remove(id);
        }
    }
}

pub struct Game<D: DisplayDriver> {
    driver: D,
    world: Option<World>,
    /// Taken while the driver holds it for `Present`.
    display: Option<Image>,
    input: Input,
    clock: FrameClock,
    title: String,
}

impl<D: DisplayDriver> Game<D> {
    /// Wraps a driver. The window is created by the first `set_world`.
    pub fn new(driver: D) -> Self {
        info!("Game::new");
        Self {
            driver,
            world: None,
            display: None,
            input: Input::new(),
            clock: FrameClock::new(),
            title: CONFIG.window.title.clone(),
        }
    }

    /// `new` followed by `set_world`.
    pub fn with_world(driver: D, world: World) -> Result<Self> {
        let mut game = Self::new(driver);
        game.set_world(world)?;
        Ok(game)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn world(&self) -> FootResult<&World> {
        self.world.as_ref().ok_or(FootError::NoWorld)
    }

    pub fn world_mut(&mut self) -> FootResult<&mut World> {
        self.world.as_mut().ok_or(FootError::NoWorld)
    }

    /// The composited frame.
    pub fn display(&self) -> FootResult<&Image> {
        self.display.as_ref().ok_or(FootError::NoWorld)
    }

    /// Makes `world` the active world, resizing the window to it. The old
    /// world is returned.
    pub fn set_world(&mut self, mut world: World) -> Result<Option<World>> {
        let (width_px, height_px) = (world.width(), world.height());
        let response = self
            .driver
            .handle_request(DriverRequest::Init {
                width_px,
                height_px,
                title: self.title.clone(),
            })
            .context("Failed to initialize display for the new world")?;
        match response {
            DriverResponse::InitComplete {
                width_px: w,
                height_px: h,
            } if (w, h) != (width_px, height_px) => {
                info!(
                    "Game: display is {}x{}, world is {}x{}",
                    w, h, width_px, height_px
                );
            }
            DriverResponse::InitComplete { .. } => {}
            other => return Err(anyhow!("unexpected response to Init: {:?}", other)),
        }
        self.display = Some(Image::new(width_px, height_px));
        world.background_mut().mark_dirty();
        info!("Game: active world is {:?}", world);
        Ok(self.world.replace(world))
    }

    /// Color of a pixel of the last composited frame.
    pub fn color_at(&self, x: i32, y: i32) -> FootResult<Color> {
        self.world()?;
        self.display()?.get_color_at((x, y))
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        self.driver
            .handle_request(DriverRequest::SetTitle(title.clone()))
            .context("Failed to set window title")?;
        self.title = title;
        Ok(())
    }

    pub fn set_icon(&mut self, icon: Image) -> Result<()> {
        self.driver
            .handle_request(DriverRequest::SetIcon(icon))
            .context("Failed to set window icon")?;
        Ok(())
    }

    /// Runs one frame.
    pub fn step(&mut self) -> Result<FrameStatus> {
        let events = match self
            .driver
            .handle_request(DriverRequest::PollEvents)
            .context("Failed to poll events")?
        {
            DriverResponse::Events(events) => events,
            other => return Err(anyhow!("unexpected response to PollEvents: {:?}", other)),
        };
        self.input.apply(&events);
        if self.input.quit_requested() {
            info!("Game: close requested");
            return Ok(FrameStatus::Shutdown);
        }

        let mut status = FrameStatus::Running;
        let mut commands = Vec::new();
        {
            let world = self.world.as_mut().ok_or(FootError::NoWorld)?;
            let elapsed = self.clock.tick(world.speed());
            trace!("Game: frame {} after {:?}", self.clock.frames(), elapsed);
            world.act_all(&self.input, &mut commands);
        }

        for command in commands {
            match command {
                Command::Stop => status = FrameStatus::Shutdown,
                Command::SwitchWorld(world) => {
                    self.set_world(*world)?;
                }
                Command::SetTitle(title) => self.set_title(title)?,
            }
        }

        let world = self.world.as_mut().ok_or(FootError::NoWorld)?;
        let mut display = self
            .display
            .take()
            .ok_or_else(|| anyhow!("display buffer is held by the driver"))?;
        let dirty = world.render(&mut display);
        if dirty.is_empty() {
            self.display = Some(display);
            return Ok(status);
        }

        debug!("Game: presenting {} rect(s)", dirty.len());
        let snapshot = FrameSnapshot {
            frame: display,
            dirty,
        };
        match self.driver.handle_request(DriverRequest::Present(snapshot)) {
            Ok(DriverResponse::PresentComplete(snapshot)) => {
                self.display = Some(snapshot.frame);
                Ok(status)
            }
            Ok(other) => Err(anyhow!("unexpected response to Present: {:?}", other)),
            Err(DisplayError::PresentationFailed(snapshot, msg)) => {
                self.display = Some(snapshot.frame);
                Err(anyhow!("presenting frame failed: {}", msg))
            }
            Err(e) => Err(e).context("Failed to present frame"),
        }
    }

    /// Steps until shutdown.
    pub fn run(&mut self) -> Result<()> {
        self.world().context("Cannot run without a world")?;
        info!("Game: entering frame loop");
        loop {
            match self.step() {
                Ok(FrameStatus::Running) => {}
                Ok(FrameStatus::Shutdown) => {
                    info!("Game: shutdown requested, leaving frame loop");
                    return Ok(());
                }
                Err(e) => {
                    error!("Game: frame failed: {:#}", e);
                    return Err(e);
                }
            }
        }
    }
}
