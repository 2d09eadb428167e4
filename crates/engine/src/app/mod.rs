mod collaborators;
mod edge;
mod frame_clock;
mod input;
mod loop_runner;
mod metrics;
mod platform;
mod rendering;
mod winit_platform;

pub use collaborators::{Renderer, Simulation};
pub use edge::EdgeDetector;
pub use frame_clock::{FrameClock, MonotonicClock, TimeSource, DEFAULT_MAX_DELTA_MS};
pub use input::{
    FrameInputSnapshot, Key, MouseButton, MovementKeys, PressEvents, WHEEL_UNITS_PER_NOTCH,
};
pub use loop_runner::{AppError, ControlLoop, Iteration};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use platform::{Platform, PlatformError};
pub use rendering::PixelSurface;
pub use winit_platform::{WindowConfig, WinitPlatform};
