//! Simulation clock driven by an external scheduler.

use std::time::Duration;

/// Tracks simulated time. Nothing here reads the wall clock: the owner calls
/// [`SimClock::advance`] once per frame with the frame's delta.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl SimClock {
    /// Create a new clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta_seconds`. Negative or non-finite deltas are rejected
    /// and leave the clock unchanged.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        match Duration::try_from_secs_f32(delta_seconds) {
            Ok(delta) => {
                self.delta = delta;
                self.elapsed += delta;
                self.frame_count += 1;
                true
            }
            Err(e) => {
                log::warn!("Ignoring invalid frame delta {}: {}", delta_seconds, e);
                false
            }
        }
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get total elapsed time as Duration.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
