// src/display/mod.rs
//! Message-based display layer.
//!
//! - DisplayDriver: platform-specific primitives (headless, X11)
//! - Messages: request/response protocol between the frame loop and a driver

pub mod driver;
pub mod drivers;
pub mod messages;

pub use driver::DisplayDriver;
pub use drivers::HeadlessDisplayDriver;
pub use messages::{DisplayError, DisplayEvent, DriverRequest, DriverResponse, FrameSnapshot};

#[cfg(feature = "x11")]
pub use drivers::X11DisplayDriver;
