use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

static POISON_REPORTED: AtomicBool = AtomicBool::new(false);

fn report_poison(operation: &'static str) {
    if !POISON_REPORTED.swap(true, Ordering::Relaxed) {
        warn!(operation, "loop metrics lock poisoned; using last published value");
    }
}

/// Rates and timings over the most recent reporting interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopMetricsSnapshot {
    /// Render calls per second, hidden redraws included.
    pub fps: f32,
    /// Simulation steps per second.
    pub tps: f32,
    /// Mean clamped frame time across simulation steps.
    pub frame_time_ms: f32,
    /// Longest clamped frame time seen in the interval.
    pub worst_frame_time_ms: f32,
    /// Iterations spent waiting while the window was hidden.
    pub idle_iterations: u32,
}

/// Cloneable read side of the loop metrics, safe to hand to other threads.
#[derive(Clone, Debug, Default)]
pub struct MetricsHandle {
    latest: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        let guard = self.latest.read().unwrap_or_else(|poisoned| {
            report_poison("read");
            PoisonError::into_inner(poisoned)
        });
        *guard
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        let mut guard = self.latest.write().unwrap_or_else(|poisoned| {
            report_poison("write");
            PoisonError::into_inner(poisoned)
        });
        *guard = snapshot;
    }
}

#[derive(Debug, Default)]
struct IntervalCounts {
    frames: u32,
    ticks: u32,
    idle_iterations: u32,
    step_time_sum_ms: f32,
    worst_step_ms: f32,
}

impl IntervalCounts {
    fn into_snapshot(self, elapsed: Duration) -> LoopMetricsSnapshot {
        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let frame_time_ms = match self.ticks {
            0 => 0.0,
            ticks => self.step_time_sum_ms / ticks as f32,
        };
        LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms,
            worst_frame_time_ms: self.worst_step_ms,
            idle_iterations: self.idle_iterations,
        }
    }
}

/// Counts loop activity and turns it into a snapshot once per interval.
#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval: Duration,
    interval_start: Instant,
    counts: IntervalCounts,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            interval_start: Instant::now(),
            counts: IntervalCounts::default(),
        }
    }

    pub(crate) fn record_frame(&mut self) {
        self.counts.frames = self.counts.frames.saturating_add(1);
    }

    pub(crate) fn record_tick(&mut self, measured_step_ms: f32) {
        let counts = &mut self.counts;
        counts.ticks = counts.ticks.saturating_add(1);
        counts.step_time_sum_ms += measured_step_ms;
        counts.worst_step_ms = counts.worst_step_ms.max(measured_step_ms);
    }

    pub(crate) fn record_idle(&mut self) {
        self.counts.idle_iterations = self.counts.idle_iterations.saturating_add(1);
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }
        self.interval_start = now;
        Some(mem::take(&mut self.counts).into_snapshot(elapsed))
    }
}
