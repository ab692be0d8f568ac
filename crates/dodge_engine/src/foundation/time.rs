//! Time management utilities
//!
//! Frame clock, per-frame timing snapshot and the tick sources that drive
//! the main loop.

use std::collections::VecDeque;
use std::time::{Duration, Instant, SystemTime};

use super::math::clamp;

/// Largest frame delta handed to systems, in seconds
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Immutable per-frame timing snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Clamped time since the previous frame, in seconds
    pub delta_time: f32,
    /// Wall-clock time at which the frame started
    pub now: SystemTime,
    /// Frame counter, starting at 0 for the first frame
    pub frame: u64,
}

impl Timing {
    /// Create a timing snapshot stamped with the current wall-clock time
    pub fn new(delta_time: f32, frame: u64) -> Self {
        Self::with_now(delta_time, frame, SystemTime::now())
    }

    /// Create a timing snapshot with an explicit wall-clock time
    pub fn with_now(delta_time: f32, frame: u64, now: SystemTime) -> Self {
        Self { delta_time, now, frame }
    }
}

/// Frame clock driven by an external tick source
///
/// Tick timestamps are milliseconds on an arbitrary monotonic origin, as
/// handed out by a display-refresh callback.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time_ms: f64,
    frame_count: u64,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock with the default delta clamp
    pub fn new() -> Self {
        Self::with_max_delta(DEFAULT_MAX_DELTA)
    }

    /// Create a clock clamping deltas to `[0, max_delta]`
    pub fn with_max_delta(max_delta: f32) -> Self {
        Self {
            last_time_ms: 0.0,
            frame_count: 0,
            max_delta,
        }
    }

    /// Advance the clock to `now_ms` and produce the frame's timing
    ///
    /// The frame counter increases on every call, zero deltas included.
    pub fn advance(&mut self, now_ms: f64) -> Timing {
        #[allow(clippy::cast_possible_truncation)]
        let raw = ((now_ms - self.last_time_ms) / 1000.0) as f32;
        let delta_time = clamp(raw, 0.0, self.max_delta);
        self.last_time_ms = now_ms;

        let timing = Timing::new(delta_time, self.frame_count);
        self.frame_count += 1;
        timing
    }

    /// Number of frames produced so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Timestamp of the last frame, in milliseconds
    pub fn last_time_ms(&self) -> f64 {
        self.last_time_ms
    }

    /// Upper bound applied to deltas
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }
}

/// Source of frame timestamps, in milliseconds
pub trait TickSource {
    /// Block until the next frame and return its timestamp; `None` stops the loop
    fn next_tick(&mut self) -> Option<f64>;
}

/// Wall-clock tick source paced to a target frame rate
#[derive(Debug, Clone)]
pub struct FixedRateTicker {
    start: Instant,
    interval: Duration,
    next_deadline: Instant,
    frame_limit: Option<u64>,
    emitted: u64,
}

impl FixedRateTicker {
    /// Create a ticker for `target_fps` frames per second
    pub fn new(target_fps: u32) -> Self {
        let start = Instant::now();
        Self {
            start,
            interval: Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1))),
            next_deadline: start,
            frame_limit: None,
            emitted: 0,
        }
    }

    /// Stop after `frames` ticks
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Time between ticks
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl TickSource for FixedRateTicker {
    fn next_tick(&mut self) -> Option<f64> {
        if self.frame_limit.is_some_and(|limit| self.emitted >= limit) {
            return None;
        }

        let now = Instant::now();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
        }
        self.next_deadline += self.interval;
        self.emitted += 1;

        Some(self.start.elapsed().as_secs_f64() * 1000.0)
    }
}

/// Tick source replaying preset timestamps
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    ticks: VecDeque<f64>,
}

impl ManualTicker {
    /// Create a ticker yielding `ticks` in order
    pub fn new(ticks: impl IntoIterator<Item = f64>) -> Self {
        Self { ticks: ticks.into_iter().collect() }
    }

    /// Queue another timestamp
    pub fn push(&mut self, now_ms: f64) {
        self.ticks.push_back(now_ms);
    }

    /// Timestamps not yet handed out
    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl TickSource for ManualTicker {
    fn next_tick(&mut self) -> Option<f64> {
        self.ticks.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_delta_is_converted_to_seconds() {
        let mut clock = FrameClock::new();
        clock.advance(1000.0);
        let timing = clock.advance(1016.0);
        assert_relative_eq!(timing.delta_time, 0.016, epsilon = 1e-6);
    }

    #[test]
    fn test_delta_is_clamped_after_stall() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        let timing = clock.advance(5000.0);
        assert_relative_eq!(timing.delta_time, 0.1);
    }

    #[test]
    fn test_backwards_time_clamps_to_zero() {
        let mut clock = FrameClock::new();
        clock.advance(500.0);
        let timing = clock.advance(400.0);
        assert_eq!(timing.delta_time, 0.0);
        assert_eq!(clock.last_time_ms(), 400.0);
    }

    #[test]
    fn test_frame_counter_counts_zero_deltas() {
        let mut clock = FrameClock::new();
        let first = clock.advance(0.0);
        let second = clock.advance(0.0);
        assert_eq!(first.frame, 0);
        assert_eq!(second.frame, 1);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_custom_max_delta() {
        let mut clock = FrameClock::with_max_delta(0.05);
        let timing = clock.advance(80.0);
        assert_relative_eq!(timing.delta_time, 0.05);
        assert_relative_eq!(clock.max_delta(), 0.05);
    }

    #[test]
    fn test_manual_ticker_replays_in_order() {
        let mut ticker = ManualTicker::new([0.0, 16.0]);
        ticker.push(32.0);
        assert_eq!(ticker.remaining(), 3);
        assert_eq!(ticker.next_tick(), Some(0.0));
        assert_eq!(ticker.next_tick(), Some(16.0));
        assert_eq!(ticker.next_tick(), Some(32.0));
        assert_eq!(ticker.next_tick(), None);
    }

    #[test]
    fn test_fixed_rate_ticker_respects_limit() {
        let mut ticker = FixedRateTicker::new(1000).with_frame_limit(3);
        let ticks: Vec<f64> = std::iter::from_fn(|| ticker.next_tick()).collect();

        assert_eq!(ticks.len(), 3);
        assert!(ticks.windows(2).all(|pair| pair[1] >= pair[0]));
        assert!(ticks[2] >= 2.0 - 1e-3);
    }

    #[test]
    fn test_fixed_rate_ticker_zero_fps_is_clamped() {
        let ticker = FixedRateTicker::new(0);
        assert_eq!(ticker.interval(), Duration::from_secs(1));
    }
}
