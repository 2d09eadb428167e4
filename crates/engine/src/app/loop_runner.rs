use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::info;

use crate::config::{
    ConfigError, LoopConfig, TimeStepMode, DEFAULT_FIXED_STEP_MS, DEFAULT_IDLE_SLEEP_MS,
    DEFAULT_METRICS_LOG_INTERVAL_MS,
};

use super::metrics::MetricsAccumulator;
use super::{
    EdgeDetector, FrameClock, FrameInputSnapshot, Key, MetricsHandle, MonotonicClock,
    MouseButton, MovementKeys, Platform, PlatformError, PressEvents, Renderer, Simulation,
    TimeSource, DEFAULT_MAX_DELTA_MS,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to initialize native platform: {0}")]
    Platform(#[from] PlatformError),
    #[error("failed to create input devices: {0}")]
    CreateInputDevices(#[source] PlatformError),
    #[error("failed to initialize renderer surface: {0}")]
    CreateRenderer(#[source] PixelsError),
}

/// What a single pass through the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iteration {
    Terminated,
    Simulated,
    IdleRendered,
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    WindowClose,
    EscapeKey,
}

impl ShutdownReason {
    fn as_str(self) -> &'static str {
        match self {
            ShutdownReason::WindowClose => "window_close",
            ShutdownReason::EscapeKey => "escape_key",
        }
    }
}

#[derive(Debug, Default)]
struct PressDetectors {
    jump: EdgeDetector,
    left_click: EdgeDetector,
    right_click: EdgeDetector,
}

#[derive(Debug, Clone, Copy)]
struct Pacing {
    time_step_mode: TimeStepMode,
    fixed_step_ms: f32,
    idle_sleep: Duration,
}

/// Polls the platform, advances the simulation and renders it, one
/// iteration at a time, until the window is closed or Escape is held.
///
/// Teardown releases input devices before the display binding; the
/// simulation and renderer are dropped after both.
pub struct ControlLoop<P: Platform, S, R, T: TimeSource = MonotonicClock> {
    platform: P,
    simulation: S,
    renderer: R,
    detectors: PressDetectors,
    clock: FrameClock<T>,
    pacing: Pacing,
    metrics: MetricsAccumulator,
    metrics_handle: MetricsHandle,
    destroyed: bool,
}

impl<P, S, R> ControlLoop<P, S, R>
where
    P: Platform,
    S: Simulation,
    R: Renderer<S>,
{
    pub fn new(
        platform: P,
        simulation: S,
        renderer: R,
        config: &LoopConfig,
    ) -> Result<Self, AppError> {
        Self::with_time_source(
            platform,
            simulation,
            renderer,
            config,
            MonotonicClock::default(),
        )
    }
}

impl<P, S, R, T> ControlLoop<P, S, R, T>
where
    P: Platform,
    S: Simulation,
    R: Renderer<S>,
    T: TimeSource,
{
    /// Creates the input devices; a failure releases whatever the platform
    /// already bound and is returned without starting the loop.
    pub fn with_time_source(
        mut platform: P,
        simulation: S,
        renderer: R,
        config: &LoopConfig,
        time_source: T,
    ) -> Result<Self, AppError> {
        if let Err(error) = platform.create_input_devices() {
            platform.destroy_input_devices();
            platform.destroy_display();
            return Err(AppError::CreateInputDevices(error));
        }

        let max_delta_ms = normalize_positive_ms(config.max_delta_ms, DEFAULT_MAX_DELTA_MS);
        let pacing = Pacing {
            time_step_mode: config.time_step_mode,
            fixed_step_ms: normalize_positive_ms(config.fixed_step_ms, DEFAULT_FIXED_STEP_MS),
            idle_sleep: normalize_non_zero_duration(
                Duration::from_millis(config.idle_sleep_ms),
                Duration::from_millis(DEFAULT_IDLE_SLEEP_MS),
            ),
        };
        let metrics_log_interval = normalize_non_zero_duration(
            Duration::from_millis(config.metrics_log_interval_ms),
            Duration::from_millis(DEFAULT_METRICS_LOG_INTERVAL_MS),
        );

        info!(
            time_step_mode = pacing.time_step_mode.as_str(),
            fixed_step_ms = pacing.fixed_step_ms,
            max_delta_ms,
            idle_sleep_ms = pacing.idle_sleep.as_millis() as u64,
            metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
            "loop_config"
        );

        Ok(Self {
            platform,
            simulation,
            renderer,
            detectors: PressDetectors::default(),
            clock: FrameClock::with_source(time_source, max_delta_ms),
            pacing,
            metrics: MetricsAccumulator::new(metrics_log_interval),
            metrics_handle: MetricsHandle::default(),
            destroyed: false,
        })
    }

    /// Blocks until the window is closed or Escape is held.
    pub fn run(&mut self) {
        while self.run_iteration() != Iteration::Terminated {}
    }

    pub fn run_iteration(&mut self) -> Iteration {
        if self.destroyed {
            return Iteration::Terminated;
        }

        self.platform.pump();
        if let Some(reason) = self.shutdown_reason() {
            info!(reason = reason.as_str(), "shutdown_requested");
            return Iteration::Terminated;
        }

        let iteration = if self.platform.is_window_visible() {
            self.simulate_and_render();
            Iteration::Simulated
        } else {
            self.idle_while_hidden()
        };

        if let Some(snapshot) = self.metrics.maybe_snapshot(Instant::now()) {
            self.metrics_handle.publish(snapshot);
            info!(
                fps = snapshot.fps,
                tps = snapshot.tps,
                frame_time_ms = snapshot.frame_time_ms,
                worst_frame_time_ms = snapshot.worst_frame_time_ms,
                idle_iterations = snapshot.idle_iterations,
                "loop_metrics"
            );
        }

        iteration
    }

    /// Releases input devices, then the display. Later calls do nothing.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.platform.destroy_input_devices();
        self.platform.destroy_display();
        info!("shutdown");
    }

    pub fn metrics_handle(&self) -> MetricsHandle {
        self.metrics_handle.clone()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn shutdown_reason(&self) -> Option<ShutdownReason> {
        if self.platform.is_close_requested() {
            Some(ShutdownReason::WindowClose)
        } else if self.platform.is_key_down(Key::Escape) {
            Some(ShutdownReason::EscapeKey)
        } else {
            None
        }
    }

    fn simulate_and_render(&mut self) {
        let input = self.poll_input();
        let time_step_ms = self.next_time_step();
        self.simulation.simulate(&input, time_step_ms);
        self.render();
    }

    fn idle_while_hidden(&mut self) -> Iteration {
        let rendered = self.platform.is_surface_dirty();
        if rendered {
            self.render();
        }
        self.platform.idle(self.pacing.idle_sleep);
        self.metrics.record_idle();

        if rendered {
            Iteration::IdleRendered
        } else {
            Iteration::Idle
        }
    }

    fn render(&mut self) {
        self.renderer.render(&self.simulation);
        self.platform.surface_presented();
        self.metrics.record_frame();
    }

    /// Samples every edge detector exactly once.
    fn poll_input(&mut self) -> FrameInputSnapshot {
        let platform = &mut self.platform;
        let detectors = &mut self.detectors;

        let movement = MovementKeys {
            forward: platform.is_key_down(Key::W),
            backward: platform.is_key_down(Key::S),
            left: platform.is_key_down(Key::A),
            right: platform.is_key_down(Key::D),
        };
        let presses = PressEvents {
            jump: detectors.jump.sample(platform.is_key_down(Key::Space)),
            left_click: detectors
                .left_click
                .sample(platform.is_mouse_button_down(MouseButton::Left)),
            right_click: detectors
                .right_click
                .sample(platform.is_mouse_button_down(MouseButton::Right)),
        };
        let mouse_delta = platform.mouse_delta();
        let wheel_delta = platform.mouse_wheel_delta();

        FrameInputSnapshot::new(movement, presses, mouse_delta, wheel_delta)
    }

    /// The clock ticks every simulated frame in both modes so a mode switch
    /// never sees a stale timestamp.
    fn next_time_step(&mut self) -> f32 {
        let measured_ms = self.clock.tick();
        self.metrics.record_tick(measured_ms);
        select_time_step(self.pacing.time_step_mode, self.pacing.fixed_step_ms, measured_ms)
    }
}

impl<P: Platform, S, R, T: TimeSource> Drop for ControlLoop<P, S, R, T> {
    fn drop(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.platform.destroy_input_devices();
            self.platform.destroy_display();
        }
    }
}

fn select_time_step(mode: TimeStepMode, fixed_step_ms: f32, measured_ms: f32) -> f32 {
    match mode {
        TimeStepMode::Fixed => fixed_step_ms,
        TimeStepMode::Measured => measured_ms,
    }
}

fn normalize_positive_ms(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use super::super::frame_clock::test_support::ScriptedTime;
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateInputDevices,
        Simulate {
            input: FrameInputSnapshot,
            time_step_ms: f32,
        },
        Render {
            steps_seen: u32,
        },
        SurfacePresented,
        Idle(Duration),
        DestroyInputDevices,
        DestroyDisplay,
    }

    type CallLog = Rc<RefCell<Vec<Call>>>;

    #[derive(Debug, Clone, Default)]
    struct Frame {
        visible: bool,
        dirty: bool,
        close: bool,
        keys: Vec<Key>,
        buttons: Vec<MouseButton>,
        mouse_delta: (i32, i32),
        wheel_delta: i32,
    }

    impl Frame {
        fn visible() -> Self {
            Self {
                visible: true,
                ..Self::default()
            }
        }

        fn hidden(dirty: bool) -> Self {
            Self {
                dirty,
                ..Self::default()
            }
        }

        fn with_keys(mut self, keys: &[Key]) -> Self {
            self.keys = keys.to_vec();
            self
        }

        fn with_buttons(mut self, buttons: &[MouseButton]) -> Self {
            self.buttons = buttons.to_vec();
            self
        }
    }

    /// Replays one scripted `Frame` per pump; closes once the script runs out.
    struct ScriptedPlatform {
        frames: VecDeque<Frame>,
        current: Frame,
        log: CallLog,
        fail_create: bool,
    }

    impl ScriptedPlatform {
        fn new(frames: Vec<Frame>, log: &CallLog) -> Self {
            Self {
                frames: frames.into(),
                current: Frame::default(),
                log: Rc::clone(log),
                fail_create: false,
            }
        }
    }

    impl Platform for ScriptedPlatform {
        fn pump(&mut self) {
            self.current = self.frames.pop_front().unwrap_or(Frame {
                close: true,
                ..Frame::default()
            });
        }

        fn is_key_down(&self, key: Key) -> bool {
            self.current.keys.contains(&key)
        }

        fn is_mouse_button_down(&self, button: MouseButton) -> bool {
            self.current.buttons.contains(&button)
        }

        fn mouse_delta(&mut self) -> (i32, i32) {
            std::mem::take(&mut self.current.mouse_delta)
        }

        fn mouse_wheel_delta(&mut self) -> i32 {
            std::mem::take(&mut self.current.wheel_delta)
        }

        fn is_close_requested(&self) -> bool {
            self.current.close
        }

        fn is_window_visible(&self) -> bool {
            self.current.visible
        }

        fn is_surface_dirty(&self) -> bool {
            self.current.dirty
        }

        fn surface_presented(&mut self) {
            self.current.dirty = false;
            self.log.borrow_mut().push(Call::SurfacePresented);
        }

        fn idle(&mut self, timeout: Duration) {
            self.log.borrow_mut().push(Call::Idle(timeout));
        }

        fn create_input_devices(&mut self) -> Result<(), PlatformError> {
            self.log.borrow_mut().push(Call::CreateInputDevices);
            if self.fail_create {
                Err(PlatformError::DisplayUnavailable)
            } else {
                Ok(())
            }
        }

        fn destroy_input_devices(&mut self) {
            self.log.borrow_mut().push(Call::DestroyInputDevices);
        }

        fn destroy_display(&mut self) {
            self.log.borrow_mut().push(Call::DestroyDisplay);
        }
    }

    struct CountingSimulation {
        steps: u32,
        log: CallLog,
    }

    impl Simulation for CountingSimulation {
        fn simulate(&mut self, input: &FrameInputSnapshot, time_step_ms: f32) {
            self.steps += 1;
            self.log.borrow_mut().push(Call::Simulate {
                input: *input,
                time_step_ms,
            });
        }
    }

    struct LoggingRenderer {
        log: CallLog,
    }

    impl Renderer<CountingSimulation> for LoggingRenderer {
        fn render(&mut self, state: &CountingSimulation) {
            self.log.borrow_mut().push(Call::Render {
                steps_seen: state.steps,
            });
        }
    }

    type TestLoop =
        ControlLoop<ScriptedPlatform, CountingSimulation, LoggingRenderer, ScriptedTime>;

    fn build_loop(
        frames: Vec<Frame>,
        config: &LoopConfig,
        timestamps_ms: &[f64],
    ) -> (TestLoop, CallLog) {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let control_loop = ControlLoop::with_time_source(
            ScriptedPlatform::new(frames, &log),
            CountingSimulation {
                steps: 0,
                log: Rc::clone(&log),
            },
            LoggingRenderer {
                log: Rc::clone(&log),
            },
            config,
            ScriptedTime::new(timestamps_ms),
        )
        .expect("loop should start");
        log.borrow_mut().clear();
        (control_loop, log)
    }

    fn simulate_calls(log: &CallLog) -> Vec<(FrameInputSnapshot, f32)> {
        log.borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Simulate {
                    input,
                    time_step_ms,
                } => Some((*input, *time_step_ms)),
                _ => None,
            })
            .collect()
    }

    fn render_count(log: &CallLog) -> usize {
        log.borrow()
            .iter()
            .filter(|call| matches!(call, Call::Render { .. }))
            .count()
    }

    #[test]
    fn hidden_clean_window_never_simulates_or_renders() {
        let frames = vec![Frame::hidden(false); 5];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        control_loop.run();

        assert!(simulate_calls(&log).is_empty());
        assert_eq!(render_count(&log), 0);
        let idles = log
            .borrow()
            .iter()
            .filter(|call| **call == Call::Idle(Duration::from_millis(100)))
            .count();
        assert_eq!(idles, 5);
    }

    #[test]
    fn hidden_dirty_window_renders_exactly_once() {
        let frames = vec![Frame::hidden(false), Frame::hidden(true), Frame::hidden(false)];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        assert_eq!(control_loop.run_iteration(), Iteration::Idle);
        assert_eq!(control_loop.run_iteration(), Iteration::IdleRendered);
        assert_eq!(control_loop.run_iteration(), Iteration::Idle);
        assert_eq!(control_loop.run_iteration(), Iteration::Terminated);

        assert_eq!(render_count(&log), 1);
        assert!(simulate_calls(&log).is_empty());
    }

    #[test]
    fn hidden_redraw_happens_before_idle_wait() {
        let (mut control_loop, log) =
            build_loop(vec![Frame::hidden(true)], &LoopConfig::default(), &[0.0]);

        control_loop.run_iteration();

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Render { steps_seen: 0 },
                Call::SurfacePresented,
                Call::Idle(Duration::from_millis(100)),
            ]
        );
    }

    #[test]
    fn visible_iteration_simulates_before_rendering() {
        let (mut control_loop, log) =
            build_loop(vec![Frame::visible()], &LoopConfig::default(), &[0.0]);

        assert_eq!(control_loop.run_iteration(), Iteration::Simulated);

        let calls = log.borrow();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], Call::Simulate { .. }));
        assert_eq!(calls[1], Call::Render { steps_seen: 1 });
        assert_eq!(calls[2], Call::SurfacePresented);
    }

    #[test]
    fn visible_iteration_renders_even_when_surface_clean() {
        let frames = vec![Frame::visible(), Frame::visible(), Frame::visible()];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        control_loop.run();

        assert_eq!(simulate_calls(&log).len(), 3);
        assert_eq!(render_count(&log), 3);
    }

    #[test]
    fn close_request_exits_before_any_work() {
        let frames = vec![Frame {
            close: true,
            ..Frame::visible()
        }];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        assert_eq!(control_loop.run_iteration(), Iteration::Terminated);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn escape_key_exits_before_any_work() {
        let frames = vec![
            Frame::visible(),
            Frame::visible().with_keys(&[Key::Escape, Key::Space]),
            Frame::visible(),
        ];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        control_loop.run();

        assert_eq!(simulate_calls(&log).len(), 1);
        assert_eq!(render_count(&log), 1);
    }

    #[test]
    fn space_press_fires_jump_once_per_press() {
        let levels = [false, true, true, false, true];
        let frames = levels
            .iter()
            .map(|down| {
                if *down {
                    Frame::visible().with_keys(&[Key::Space])
                } else {
                    Frame::visible()
                }
            })
            .collect();
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        control_loop.run();

        let jumps: Vec<bool> = simulate_calls(&log)
            .iter()
            .map(|(input, _)| input.jump_pressed())
            .collect();
        assert_eq!(jumps, vec![false, true, false, false, true]);
    }

    #[test]
    fn mouse_clicks_are_edge_triggered_per_button() {
        let frames = vec![
            Frame::visible().with_buttons(&[MouseButton::Left]),
            Frame::visible().with_buttons(&[MouseButton::Left, MouseButton::Right]),
            Frame::visible().with_buttons(&[MouseButton::Right]),
            Frame::visible().with_buttons(&[MouseButton::Left]),
        ];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        control_loop.run();

        let clicks: Vec<(bool, bool)> = simulate_calls(&log)
            .iter()
            .map(|(input, _)| (input.left_click_pressed(), input.right_click_pressed()))
            .collect();
        assert_eq!(
            clicks,
            vec![(true, false), (false, true), (false, false), (true, false)]
        );
    }

    #[test]
    fn hidden_frames_do_not_sample_edge_detectors() {
        let frames = vec![
            Frame::visible().with_keys(&[Key::Space]),
            Frame::hidden(false),
            Frame::visible().with_keys(&[Key::Space]),
        ];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        control_loop.run();

        let jumps: Vec<bool> = simulate_calls(&log)
            .iter()
            .map(|(input, _)| input.jump_pressed())
            .collect();
        assert_eq!(jumps, vec![true, false]);
    }

    #[test]
    fn snapshot_carries_movement_and_raw_deltas() {
        let frames = vec![Frame {
            mouse_delta: (4, -7),
            wheel_delta: -120,
            ..Frame::visible().with_keys(&[Key::W, Key::D])
        }];
        let (mut control_loop, log) = build_loop(frames, &LoopConfig::default(), &[0.0]);

        control_loop.run_iteration();

        let (input, _) = simulate_calls(&log)[0];
        assert_eq!(
            input.movement(),
            MovementKeys {
                forward: true,
                backward: false,
                left: false,
                right: true,
            }
        );
        assert_eq!(input.mouse_delta(), (4, -7));
        assert_eq!(input.wheel_delta(), -120);
        assert_eq!(input.scroll_steps(), 1);
    }

    #[test]
    fn fixed_mode_ignores_measured_delta() {
        let frames = vec![Frame::visible(); 3];
        let (mut control_loop, log) =
            build_loop(frames, &LoopConfig::default(), &[0.0, 10.0, 210.0, 240.0]);

        control_loop.run();

        for (_, time_step_ms) in simulate_calls(&log) {
            assert!((time_step_ms - 1000.0 / 60.0).abs() < 0.0001);
        }
    }

    #[test]
    fn measured_mode_passes_clamped_clock_deltas() {
        let config = LoopConfig {
            time_step_mode: TimeStepMode::Measured,
            ..LoopConfig::default()
        };
        let frames = vec![Frame::visible(); 3];
        let (mut control_loop, log) = build_loop(frames, &config, &[0.0, 10.0, 210.0, 240.0]);

        control_loop.run();

        let steps: Vec<f32> = simulate_calls(&log).iter().map(|(_, step)| *step).collect();
        assert_eq!(steps, vec![10.0, 50.0, 30.0]);
    }

    #[test]
    fn invalid_pacing_values_fall_back_to_defaults() {
        let config = LoopConfig {
            fixed_step_ms: -1.0,
            idle_sleep_ms: 0,
            ..LoopConfig::default()
        };
        let frames = vec![Frame::visible(), Frame::hidden(false)];
        let (mut control_loop, log) = build_loop(frames, &config, &[0.0]);

        control_loop.run();

        let (_, time_step_ms) = simulate_calls(&log)[0];
        assert!((time_step_ms - DEFAULT_FIXED_STEP_MS).abs() < 0.0001);
        assert!(log
            .borrow()
            .contains(&Call::Idle(Duration::from_millis(DEFAULT_IDLE_SLEEP_MS))));
    }

    #[test]
    fn input_device_failure_aborts_construction_and_releases_bindings() {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let mut platform = ScriptedPlatform::new(vec![Frame::visible()], &log);
        platform.fail_create = true;

        let result = ControlLoop::new(
            platform,
            CountingSimulation {
                steps: 0,
                log: Rc::clone(&log),
            },
            LoggingRenderer {
                log: Rc::clone(&log),
            },
            &LoopConfig::default(),
        );

        assert!(matches!(result, Err(AppError::CreateInputDevices(_))));
        assert_eq!(
            *log.borrow(),
            vec![
                Call::CreateInputDevices,
                Call::DestroyInputDevices,
                Call::DestroyDisplay,
            ]
        );
    }

    #[test]
    fn destroy_releases_input_before_display_exactly_once() {
        let (mut control_loop, log) = build_loop(Vec::new(), &LoopConfig::default(), &[0.0]);

        control_loop.run();
        control_loop.destroy();
        control_loop.destroy();
        drop(control_loop);

        assert_eq!(
            *log.borrow(),
            vec![Call::DestroyInputDevices, Call::DestroyDisplay]
        );
    }

    #[test]
    fn dropping_without_destroy_still_releases_bindings() {
        let (control_loop, log) = build_loop(Vec::new(), &LoopConfig::default(), &[0.0]);

        drop(control_loop);

        assert_eq!(
            *log.borrow(),
            vec![Call::DestroyInputDevices, Call::DestroyDisplay]
        );
    }

    #[test]
    fn destroyed_loop_reports_termination() {
        let (mut control_loop, log) =
            build_loop(vec![Frame::visible()], &LoopConfig::default(), &[0.0]);

        control_loop.destroy();
        log.borrow_mut().clear();

        assert_eq!(control_loop.run_iteration(), Iteration::Terminated);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn select_time_step_honors_mode() {
        assert_eq!(select_time_step(TimeStepMode::Fixed, 16.0, 42.0), 16.0);
        assert_eq!(select_time_step(TimeStepMode::Measured, 16.0, 42.0), 42.0);
    }

    #[test]
    fn normalize_positive_ms_rejects_nan_and_non_positive() {
        assert_eq!(normalize_positive_ms(f32::NAN, 5.0), 5.0);
        assert_eq!(normalize_positive_ms(0.0, 5.0), 5.0);
        assert_eq!(normalize_positive_ms(12.5, 5.0), 12.5);
    }
}
