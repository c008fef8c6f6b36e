// src/display/driver.rs
//! DisplayDriver trait - minimal interface for platform-specific display primitives.
//!
//! ## Lifecycle
//! 1. `new()` - Pure initialization (connect to the display server)
//! 2. `handle_request(Init)` - Create the window at the world's size
//! 3. Request/response loop - All operations via messages
//! 4. `Drop` - Cleanup (no explicit shutdown message)

use crate::display::messages::{DisplayError, DriverRequest, DriverResponse};
use anyhow::Result;

/// Minimal platform-specific display driver interface.
pub trait DisplayDriver {
    /// Pure initialization only - no window creation.
    ///
    /// Window creation happens in `handle_request(Init)`.
    fn new() -> Result<Self>
    where
        Self: Sized;

    /// Handle a request from the frame loop, returning a response.
    ///
    /// ## Request/Response Pairs
    /// - `Init { .. }` → `InitComplete`
    /// - `PollEvents` → `Events` (fetch pending native events)
    /// - `Present(snapshot)` → `PresentComplete(snapshot)` (display and return ownership)
    /// - `SetTitle(s)` → `TitleSet`
    /// - `SetIcon(img)` → `IconSet`
    ///
    /// ## Error Handling
    /// Returns `DisplayError` instead of `anyhow::Result` to enable safe buffer recovery.
    /// When a `Present` request fails, the frame is returned via
    /// `DisplayError::PresentationFailed` so the caller keeps its buffer.
    fn handle_request(&mut self, request: DriverRequest) -> Result<DriverResponse, DisplayError>;
}
