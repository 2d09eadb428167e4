use std::thread;
use std::time::Duration;

use thiserror::Error;
use winit::error::{EventLoopError, ExternalError, OsError};

use super::{Key, MouseButton};

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to grab mouse cursor: {0}")]
    CursorGrab(#[source] ExternalError),
    #[error("display has already been destroyed")]
    DisplayUnavailable,
}

/// Level-sensed view of the native input and windowing layer.
///
/// Queries report the state as of the latest `pump`. The two delta queries
/// are consuming: each call returns the movement since the previous call.
pub trait Platform {
    /// Refreshes native state. Called once at the top of every loop
    /// iteration.
    fn pump(&mut self) {}

    fn is_key_down(&self, key: Key) -> bool;

    fn is_mouse_button_down(&self, button: MouseButton) -> bool;

    fn mouse_delta(&mut self) -> (i32, i32);

    fn mouse_wheel_delta(&mut self) -> i32;

    fn is_close_requested(&self) -> bool;

    fn is_window_visible(&self) -> bool;

    /// The display needs a redraw even though the loop is not simulating.
    fn is_surface_dirty(&self) -> bool;

    /// Called after every render so the dirty flag can be cleared.
    fn surface_presented(&mut self) {}

    /// Waits up to `timeout` while the window is hidden. Returning early is
    /// not an error.
    fn idle(&mut self, timeout: Duration) {
        thread::sleep(timeout);
    }

    fn create_input_devices(&mut self) -> Result<(), PlatformError>;

    /// Safe to call more than once, and after a failed create.
    fn destroy_input_devices(&mut self);

    /// Safe to call more than once.
    fn destroy_display(&mut self);
}
