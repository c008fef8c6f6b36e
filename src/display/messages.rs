// src/display/messages.rs
//! Message types for communication between the frame loop and a DisplayDriver.
//!
//! All communication happens via ownership transfer - no shared state. The
//! frame buffer travels to the driver inside `Present` and comes back inside
//! `PresentComplete` (or inside the error, if presenting failed).

use crate::geometry::Rect;
use crate::image::Image;
use crate::keys::{KeySymbol, Modifiers};
use thiserror::Error;

/// A finished frame plus the rectangles that changed since the last one.
#[derive(Debug)]
pub struct FrameSnapshot {
    pub frame: Image,
    pub dirty: Vec<Rect>,
}

/// Requests sent from the frame loop to the DisplayDriver.
#[derive(Debug)]
pub enum DriverRequest {
    /// Create (or resize) the window. Driver responds with InitComplete.
    Init {
        width_px: u32,
        height_px: u32,
        title: String,
    },

    /// Request pending native events from the platform.
    /// Driver responds with Events containing any queued events.
    PollEvents,

    /// Display the dirty rectangles of the frame. The driver takes ownership,
    /// displays it, and hands it back with PresentComplete.
    Present(FrameSnapshot),

    /// Set the window title.
    SetTitle(String),

    /// Set the window icon.
    SetIcon(Image),
}

/// Responses sent from the DisplayDriver back to the frame loop.
#[derive(Debug)]
pub enum DriverResponse {
    /// Window is ready at the given size.
    InitComplete { width_px: u32, height_px: u32 },

    /// Native events that occurred.
    Events(Vec<DisplayEvent>),

    /// Frame presentation complete, frame ownership returned for reuse.
    PresentComplete(FrameSnapshot),

    /// Window title was set.
    TitleSet,

    /// Window icon was set.
    IconSet,
}

/// Platform-agnostic display events.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// Key press event.
    Key {
        symbol: KeySymbol,
        modifiers: Modifiers,
        text: Option<String>,
    },

    /// Key release event.
    KeyRelease {
        symbol: KeySymbol,
        modifiers: Modifiers,
    },

    /// User requested window close.
    CloseRequested,

    /// Mouse button press. `button` is zero-based: 0 left, 1 middle, 2 right.
    MouseButtonPress {
        button: u8,
        x: i32,
        y: i32,
        modifiers: Modifiers,
    },

    /// Mouse button release.
    MouseButtonRelease {
        button: u8,
        x: i32,
        y: i32,
        modifiers: Modifiers,
    },

    /// Mouse movement.
    MouseMove {
        x: i32,
        y: i32,
        modifiers: Modifiers,
    },
}

/// Errors returned by a DisplayDriver.
#[derive(Debug, Error)]
pub enum DisplayError {
    /// Presenting failed. The snapshot is handed back so the frame buffer is
    /// never lost.
    #[error("presentation failed: {1}")]
    PresentationFailed(FrameSnapshot, String),

    /// A request that needs a window arrived before `Init`.
    #[error("display driver is not initialized")]
    NotInitialized,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
