use std::time::Instant;

pub const DEFAULT_MAX_DELTA_MS: f32 = 50.0;

/// Monotonic time in milliseconds from an arbitrary origin.
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for MonotonicClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Elapsed time between successive `tick` calls, clamped from above so a
/// single stalled frame cannot inject a huge simulation step.
#[derive(Debug)]
pub struct FrameClock<T: TimeSource = MonotonicClock> {
    source: T,
    previous_ms: f64,
    max_delta_ms: f32,
}

impl FrameClock<MonotonicClock> {
    pub fn new(max_delta_ms: f32) -> Self {
        Self::with_source(MonotonicClock::default(), max_delta_ms)
    }
}

impl<T: TimeSource> FrameClock<T> {
    pub fn with_source(source: T, max_delta_ms: f32) -> Self {
        let previous_ms = source.now_ms();
        Self {
            source,
            previous_ms,
            max_delta_ms,
        }
    }

    /// Milliseconds since the previous tick (or construction), at most
    /// `max_delta_ms`. A source that steps backwards yields a negative value,
    /// which is passed through.
    pub fn tick(&mut self) -> f32 {
        let now_ms = self.source.now_ms();
        let delta_ms = (now_ms - self.previous_ms) as f32;
        self.previous_ms = now_ms;
        clamp_frame_delta(delta_ms, self.max_delta_ms)
    }

    pub fn max_delta_ms(&self) -> f32 {
        self.max_delta_ms
    }
}

fn clamp_frame_delta(delta_ms: f32, max_delta_ms: f32) -> f32 {
    if delta_ms < max_delta_ms {
        delta_ms
    } else {
        max_delta_ms
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::TimeSource;

    /// Replays a fixed list of timestamps, then keeps returning the last one.
    #[derive(Debug)]
    pub(crate) struct ScriptedTime {
        remaining: RefCell<VecDeque<f64>>,
        last_ms: RefCell<f64>,
    }

    impl ScriptedTime {
        pub(crate) fn new(timestamps_ms: &[f64]) -> Self {
            Self {
                remaining: RefCell::new(timestamps_ms.iter().copied().collect()),
                last_ms: RefCell::new(0.0),
            }
        }
    }

    impl TimeSource for ScriptedTime {
        fn now_ms(&self) -> f64 {
            if let Some(next) = self.remaining.borrow_mut().pop_front() {
                *self.last_ms.borrow_mut() = next;
            }
            *self.last_ms.borrow()
        }
    }
}
