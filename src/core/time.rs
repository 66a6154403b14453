//! Session clock feeding the engine's per-frame update

use std::time::{Duration, Instant};

/// Where the clock takes its time from
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockSource {
    /// Wall time since the clock was created
    Realtime,
    /// Advance by a fixed step on every tick (headless runs, tests)
    Fixed(Duration),
}

/// Tracks session time and frame statistics.
///
/// `tick` returns the session time in seconds, which never decreases.
pub struct FrameClock {
    source: ClockSource,
    start: Instant,
    elapsed: Duration,
    delta: Duration,
    frame_count: u64,
    fps_window_start: Duration,
    fps_frame_count: u32,
    fps: f32,
}

impl FrameClock {
    /// Create a clock reading wall time
    pub fn realtime() -> Self {
        Self::with_source(ClockSource::Realtime)
    }

    /// Create a clock that advances `step` per tick
    pub fn fixed(step: Duration) -> Self {
        Self::with_source(ClockSource::Fixed(step))
    }

    fn with_source(source: ClockSource) -> Self {
        Self {
            source,
            start: Instant::now(),
            elapsed: Duration::ZERO,
            delta: Duration::ZERO,
            frame_count: 0,
            fps_window_start: Duration::ZERO,
            fps_frame_count: 0,
            fps: 0.0,
        }
    }

    /// Call once per frame; returns session time in seconds
    pub fn tick(&mut self) -> f32 {
        let now = match self.source {
            ClockSource::Realtime => self.start.elapsed().max(self.elapsed),
            ClockSource::Fixed(step) => self.elapsed + step,
        };
        self.delta = now - self.elapsed;
        self.elapsed = now;
        self.frame_count += 1;
        self.fps_frame_count += 1;

        // Update FPS every second of session time
        let window = now - self.fps_window_start;
        if window >= Duration::from_secs(1) {
            self.fps = self.fps_frame_count as f32 / window.as_secs_f32();
            self.fps_frame_count = 0;
            self.fps_window_start = now;
        }

        now.as_secs_f32()
    }

    /// Session time in seconds at the last tick
    pub fn now_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get delta time in seconds
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get current FPS (updated every second)
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Get total frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn source(&self) -> ClockSource {
        self.source
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::realtime()
    }
}
