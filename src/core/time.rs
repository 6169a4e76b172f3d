//! Frame clock
//!
//! [`Clock`] is the single source of elapsed and delta time for every
//! time-driven system. The scheduler advances it exactly once per frame,
//! either with an explicit delta ([`Clock::advance`]) or from the wall clock
//! ([`Clock::tick`]).

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Clock tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Largest delta (seconds) accepted for a single frame. Longer gaps,
    /// e.g. a backgrounded window, are clamped to this.
    pub max_delta: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self { max_delta: 0.1 }
    }
}

/// Elapsed/delta snapshot taken after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClockState {
    pub elapsed: f32,
    pub delta: f32,
}

/// Tracks elapsed time, last-frame delta and FPS
pub struct Clock {
    elapsed: Duration,
    delta: f32,
    max_delta: f32,
    frame_count: u64,
    last_instant: Option<Instant>,
    fps_timer: Duration,
    fps_frame_count: u32,
    fps: f32,
}

impl Clock {
    /// Create a clock at t=0
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            elapsed: Duration::ZERO,
            delta: 0.0,
            max_delta: config.max_delta.max(0.0),
            frame_count: 0,
            last_instant: None,
            fps_timer: Duration::ZERO,
            fps_frame_count: 0,
            fps: 0.0,
        }
    }

    /// Advance by an explicit delta in seconds.
    ///
    /// Negative, non-finite and unrepresentable deltas count as zero; the
    /// delta is clamped to `max_delta`.
    pub fn advance(&mut self, dt: f32) -> ClockState {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let dt = if self.max_delta > 0.0 { dt.min(self.max_delta) } else { dt };
        let step = match Duration::try_from_secs_f32(dt) {
            Ok(step) => step,
            Err(e) => {
                log::warn!("Ignoring frame delta {dt}: {e}");
                Duration::ZERO
            }
        };

        self.delta = step.as_secs_f32();
        self.elapsed = self.elapsed.saturating_add(step);
        self.frame_count += 1;

        self.fps_frame_count += 1;
        self.fps_timer = self.fps_timer.saturating_add(step);
        if self.fps_timer >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / self.fps_timer.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_timer = Duration::ZERO;
        }

        self.state()
    }

    /// Advance from the wall clock. The first call produces a zero delta.
    pub fn tick(&mut self) -> ClockState {
        let now = Instant::now();
        let dt = match self.last_instant {
            Some(last) => (now - last).as_secs_f32(),
            None => 0.0,
        };
        self.last_instant = Some(now);
        self.advance(dt)
    }

    /// Current elapsed/delta pair
    #[inline]
    pub fn state(&self) -> ClockState {
        ClockState {
            elapsed: self.elapsed.as_secs_f32(),
            delta: self.delta,
        }
    }

    /// Total elapsed seconds
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Total elapsed time at full precision
    #[inline]
    pub fn elapsed_duration(&self) -> Duration {
        self.elapsed
    }

    /// Delta of the last frame in seconds
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Number of ticks so far
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// FPS over the last full second of clock time
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(&ClockConfig::default())
    }
}
