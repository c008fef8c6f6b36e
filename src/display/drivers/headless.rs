//! Headless display driver.
//!
//! Nothing is shown. Events are scripted with `push_event` and every present
//! is recorded, which makes this the driver the frame loop is tested against.

use crate::display::driver::DisplayDriver;
use crate::display::messages::{
    DisplayError, DisplayEvent, DriverRequest, DriverResponse, FrameSnapshot,
};
use crate::geometry::Rect;
use anyhow::Result;
use log::{info, trace};

#[derive(Debug, Default)]
pub struct HeadlessDisplayDriver {
    size: Option<(u32, u32)>,
    title: String,
    icon_size: Option<(u32, u32)>,
    pending: Vec<DisplayEvent>,
    presents: Vec<Vec<Rect>>,
    fail_next_present: bool,
}

impl HeadlessDisplayDriver {
    /// Queues an event for the next `PollEvents`.
    pub fn push_event(&mut self, event: DisplayEvent) {
        self.pending.push(event);
    }

    /// Dirty rectangles of every successful present, oldest first.
    pub fn presents(&self) -> &[Vec<Rect>] {
        &self.presents
    }

    /// Window size from the last `Init`.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon_size(&self) -> Option<(u32, u32)> {
        self.icon_size
    }

    /// Makes the next `Present` fail, handing the snapshot back in the error.
    pub fn fail_next_present(&mut self) {
        self.fail_next_present = true;
    }

    fn handle_present(&mut self, snapshot: FrameSnapshot) -> Result<DriverResponse, DisplayError> {
        if self.size.is_none() {
            return Err(DisplayError::PresentationFailed(
                snapshot,
                "Present before Init".to_string(),
            ));
        }
        if std::mem::take(&mut self.fail_next_present) {
            return Err(DisplayError::PresentationFailed(
                snapshot,
                "scripted failure".to_string(),
            ));
        }
        trace!(
            "HeadlessDisplayDriver: Present {} rect(s)",
            snapshot.dirty.len()
        );
        self.presents.push(snapshot.dirty.clone());
        Ok(DriverResponse::PresentComplete(snapshot))
    }
}

impl DisplayDriver for HeadlessDisplayDriver {
    fn new() -> Result<Self> {
        info!("HeadlessDisplayDriver::new()");
        Ok(Self::default())
    }

    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError> {
        match request {
            DriverRequest::Init {
                width_px,
                height_px,
                title,
            } => {
                info!(
                    "HeadlessDisplayDriver: Init {}x{} '{}'",
                    width_px, height_px, title
                );
                self.size = Some((width_px, height_px));
                self.title = title;
                Ok(DriverResponse::InitComplete {
                    width_px,
                    height_px,
                })
            }
            DriverRequest::PollEvents => Ok(DriverResponse::Events(self.pending.drain(..).collect())),
            DriverRequest::Present(snapshot) => self.handle_present(snapshot),
            DriverRequest::SetTitle(title) => {
                info!("HeadlessDisplayDriver: SetTitle '{}'", title);
                self.title = title;
                Ok(DriverResponse::TitleSet)
            }
            DriverRequest::SetIcon(icon) => {
                info!(
                    "HeadlessDisplayDriver: SetIcon {}x{}",
                    icon.width(),
                    icon.height()
                );
                self.icon_size = Some(icon.dimensions());
                Ok(DriverResponse::IconSet)
            }
        }
    }
}
