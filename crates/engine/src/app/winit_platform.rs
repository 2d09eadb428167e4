use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{
    DeviceEvent, ElementState, Event, MouseButton as WinitMouseButton, MouseScrollDelta,
    WindowEvent,
};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Window, WindowBuilder};

use super::input::{KeyStates, MouseButtonStates};
use super::{Key, MouseButton, Platform, PlatformError, WHEEL_UNITS_PER_NOTCH};

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub grab_cursor: bool,
}

/// `Platform` backed by a single winit window, driven by pumping the event
/// loop instead of handing control to it.
pub struct WinitPlatform {
    event_loop: EventLoop<()>,
    window: Option<Arc<Window>>,
    state: NativeState,
    grab_cursor: bool,
    input_devices_created: bool,
}

impl WinitPlatform {
    pub fn new(config: &WindowConfig) -> Result<Self, PlatformError> {
        let event_loop = EventLoop::new().map_err(PlatformError::CreateEventLoop)?;
        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(
                config.width as f64,
                config.height as f64,
            ))
            .build(&event_loop)
            .map_err(PlatformError::CreateWindow)?;

        Ok(Self {
            event_loop,
            window: Some(Arc::new(window)),
            state: NativeState::default(),
            grab_cursor: config.grab_cursor,
            input_devices_created: false,
        })
    }

    /// Shared handle for binding a render surface. `None` once the display
    /// has been destroyed.
    pub fn window(&self) -> Option<Arc<Window>> {
        self.window.as_ref().map(Arc::clone)
    }

    fn pump_with_timeout(&mut self, timeout: Option<Duration>) {
        let Some(window) = self.window.as_ref() else {
            self.state.close_requested = true;
            return;
        };
        let window_id = window.id();
        let was_visible = self.state.is_visible();

        let state = &mut self.state;
        let status = self.event_loop.pump_events(timeout, |event, _target| match event {
            Event::WindowEvent {
                window_id: event_window_id,
                event,
            } if event_window_id == window_id => state.handle_window_event(event),
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta },
                ..
            } => state.add_mouse_motion(delta),
            _ => {}
        });

        if let PumpStatus::Exit(code) = status {
            debug!(code, "event_loop_exit_status");
            self.state.close_requested = true;
        }
        if let Some(minimized) = window.is_minimized() {
            self.state.minimized = minimized;
        }

        let is_visible = self.state.is_visible();
        if is_visible != was_visible {
            debug!(visible = is_visible, "window_visibility_changed");
        }
    }
}

impl Platform for WinitPlatform {
    fn pump(&mut self) {
        self.pump_with_timeout(Some(Duration::ZERO));
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.state.keys.is_down(key)
    }

    fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.state.mouse_buttons.is_down(button)
    }

    fn mouse_delta(&mut self) -> (i32, i32) {
        self.state.take_mouse_delta()
    }

    fn mouse_wheel_delta(&mut self) -> i32 {
        self.state.take_wheel_delta()
    }

    fn is_close_requested(&self) -> bool {
        self.state.close_requested
    }

    fn is_window_visible(&self) -> bool {
        self.window.is_some() && self.state.is_visible()
    }

    fn is_surface_dirty(&self) -> bool {
        self.state.surface_dirty
    }

    fn surface_presented(&mut self) {
        self.state.surface_dirty = false;
    }

    fn idle(&mut self, timeout: Duration) {
        self.pump_with_timeout(Some(timeout));
    }

    fn create_input_devices(&mut self) -> Result<(), PlatformError> {
        if self.input_devices_created {
            return Ok(());
        }
        let window = self
            .window
            .as_ref()
            .ok_or(PlatformError::DisplayUnavailable)?;

        if self.grab_cursor {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|locked_error| {
                    warn!(error = %locked_error, "cursor_grab_unavailable");
                    window.set_cursor_grab(CursorGrabMode::Confined)
                })
                .map_err(PlatformError::CursorGrab)?;
            window.set_cursor_visible(false);
        }

        self.input_devices_created = true;
        info!(cursor_grabbed = self.grab_cursor, "input_devices_created");
        Ok(())
    }

    fn destroy_input_devices(&mut self) {
        if !self.input_devices_created {
            return;
        }
        if let Some(window) = &self.window {
            if self.grab_cursor {
                if let Err(error) = window.set_cursor_grab(CursorGrabMode::None) {
                    warn!(error = %error, "cursor_release_failed");
                }
                window.set_cursor_visible(true);
            }
        }
        self.state.keys.release_all();
        self.state.mouse_buttons.release_all();
        self.input_devices_created = false;
        info!("input_devices_destroyed");
    }

    fn destroy_display(&mut self) {
        if self.window.take().is_some() {
            info!("display_destroyed");
        }
    }
}

#[derive(Debug)]
struct NativeState {
    keys: KeyStates,
    mouse_buttons: MouseButtonStates,
    mouse_motion: (f64, f64),
    wheel_units: f64,
    close_requested: bool,
    focused: bool,
    occluded: bool,
    minimized: bool,
    surface_dirty: bool,
}

impl Default for NativeState {
    fn default() -> Self {
        Self {
            keys: KeyStates::default(),
            mouse_buttons: MouseButtonStates::default(),
            mouse_motion: (0.0, 0.0),
            wheel_units: 0.0,
            close_requested: false,
            focused: true,
            occluded: false,
            minimized: false,
            // Nothing has been drawn yet.
            surface_dirty: true,
        }
    }
}

impl NativeState {
    fn is_visible(&self) -> bool {
        !self.occluded && !self.minimized
    }

    fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::KeyboardInput { event, .. } => {
                self.set_key_level(event.physical_key, event.state == ElementState::Pressed);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_mouse_button_level(button, state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => self.add_wheel(delta),
            WindowEvent::Focused(focused) => self.set_focused(focused),
            WindowEvent::Occluded(occluded) => self.set_occluded(occluded),
            WindowEvent::Resized(size) => self.resized(size),
            WindowEvent::RedrawRequested | WindowEvent::ScaleFactorChanged { .. } => {
                self.surface_dirty = true;
            }
            _ => {}
        }
    }

    fn set_key_level(&mut self, key: PhysicalKey, is_down: bool) {
        if let Some(key) = key_from_physical(key) {
            self.keys.set(key, is_down);
        }
    }

    fn set_mouse_button_level(&mut self, button: WinitMouseButton, is_down: bool) {
        if let Some(button) = mouse_button_from_winit(button) {
            self.mouse_buttons.set(button, is_down);
        }
    }

    fn add_mouse_motion(&mut self, delta: (f64, f64)) {
        if !self.focused {
            return;
        }
        self.mouse_motion.0 += delta.0;
        self.mouse_motion.1 += delta.1;
    }

    fn add_wheel(&mut self, delta: MouseScrollDelta) {
        self.wheel_units += wheel_units_from_scroll_delta(delta);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            // Release events for keys held while focus moves away never arrive.
            self.keys.release_all();
            self.mouse_buttons.release_all();
            self.mouse_motion = (0.0, 0.0);
        }
    }

    fn set_occluded(&mut self, occluded: bool) {
        self.occluded = occluded;
        if !occluded {
            self.surface_dirty = true;
        }
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        self.minimized = size.width == 0 || size.height == 0;
        if !self.minimized {
            self.surface_dirty = true;
        }
    }

    /// Whole units only; the fractional remainder carries into the next call.
    fn take_mouse_delta(&mut self) -> (i32, i32) {
        let dx = self.mouse_motion.0.trunc();
        let dy = self.mouse_motion.1.trunc();
        self.mouse_motion.0 -= dx;
        self.mouse_motion.1 -= dy;
        (dx as i32, dy as i32)
    }

    fn take_wheel_delta(&mut self) -> i32 {
        let units = self.wheel_units.trunc();
        self.wheel_units -= units;
        units as i32
    }
}

fn key_from_physical(key: PhysicalKey) -> Option<Key> {
    match key {
        PhysicalKey::Code(KeyCode::KeyW) => Some(Key::W),
        PhysicalKey::Code(KeyCode::KeyS) => Some(Key::S),
        PhysicalKey::Code(KeyCode::KeyA) => Some(Key::A),
        PhysicalKey::Code(KeyCode::KeyD) => Some(Key::D),
        PhysicalKey::Code(KeyCode::Space) => Some(Key::Space),
        PhysicalKey::Code(KeyCode::Escape) => Some(Key::Escape),
        _ => None,
    }
}

fn mouse_button_from_winit(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

fn wheel_units_from_scroll_delta(delta: MouseScrollDelta) -> f64 {
    let notch = WHEEL_UNITS_PER_NOTCH as f64;
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y as f64 * notch,
        MouseScrollDelta::PixelDelta(position) => {
            if position.y > 0.0 {
                notch
            } else if position.y < 0.0 {
                -notch
            } else {
                0.0
            }
        }
    }
}
