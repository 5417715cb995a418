//! Frame clock for the animation loop.
//!
//! The simulation constants are expressed per reference frame (60 Hz), so
//! besides elapsed and delta seconds the clock reports *ticks*: how many
//! reference frames the last real frame spanned.
//!
//! # Example
//!
//! ```ignore
//! use backdrop::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per frame callback:
//! time.update();
//! engine.frame(&mut host, &time);
//! ```

use std::time::Instant;

/// Reference frame rate the per-frame constants were tuned for.
pub const REFERENCE_FPS: f32 = 60.0;

/// Default upper bound on ticks per frame, applied after stalls
/// (window hidden, debugger break) so elements never jump across the field.
pub const DEFAULT_MAX_TICKS: f32 = 3.0;

/// Frame clock.
///
/// Wall-clock by default; [`Time::fixed`] makes every update advance by the
/// same step, which keeps headless renders and tests reproducible.
#[derive(Debug)]
pub struct Time {
    origin: Instant,
    previous: Instant,
    elapsed_secs: f32,
    delta_secs: f32,
    frames: u64,
    step: Option<f32>,
    max_ticks: f32,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            origin: now,
            previous: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frames: 0,
            step: None,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }

    /// Clock that advances by exactly `step` seconds per update.
    ///
    /// Nothing has elapsed until the first [`Time::update`], so a frame run
    /// before it covers zero ticks.
    pub fn fixed(step: f32) -> Self {
        Self {
            step: Some(step.max(0.0)),
            ..Self::new()
        }
    }

    pub fn with_max_ticks(mut self, max_ticks: f32) -> Self {
        self.max_ticks = max_ticks.max(0.0);
        self
    }

    /// Advance the clock. Call once per frame callback.
    ///
    /// Returns `(elapsed, delta)` in seconds.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        if let Some(step) = self.step {
            self.delta_secs = step;
            self.elapsed_secs += step;
        } else {
            self.delta_secs = (now - self.previous).as_secs_f32();
            self.elapsed_secs = (now - self.origin).as_secs_f32();
        }
        self.previous = now;
        self.frames += 1;
        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since the clock started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Reference frames covered by the last update, clamped to the max.
    #[inline]
    pub fn ticks(&self) -> f32 {
        (self.delta_secs * REFERENCE_FPS).clamp(0.0, self.max_ticks)
    }

    /// Updates since the clock started.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frames
    }

    /// Restart from zero, e.g. when a window is mounted.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.origin = now;
        self.previous = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frames = 0;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
