//! Real-time control loop: edge-triggered input polling, clamped frame
//! timing and the simulate/render/idle state machine, plus a winit platform
//! backend and a `pixels` render surface.

pub mod app;
pub mod config;

pub use app::{
    AppError, ControlLoop, EdgeDetector, FrameClock, FrameInputSnapshot, Iteration, Key,
    LoopMetricsSnapshot, MetricsHandle, MonotonicClock, MouseButton, MovementKeys, PixelSurface,
    Platform, PlatformError, PressEvents, Renderer, Simulation, TimeSource, WindowConfig,
    WinitPlatform, DEFAULT_MAX_DELTA_MS, WHEEL_UNITS_PER_NOTCH,
};
pub use config::{
    load_loop_config, ConfigError, LoopConfig, TimeStepMode, CONFIG_ENV_VAR,
    DEFAULT_FIXED_STEP_MS, DEFAULT_IDLE_SLEEP_MS, TIME_STEP_ENV_VAR,
};
