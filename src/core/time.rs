//! Frame timing

use std::time::{Duration, Instant};

/// Wall-clock timing for the frame loop
#[derive(Debug, Clone)]
pub struct Time {
    /// When the clock was created
    startup: Instant,
    /// When `update` last ran
    last_update: Instant,
    /// Time between the last two updates
    delta: Duration,
    /// Number of updates so far
    frame_count: u64,
}

impl Time {
    /// Start a new clock
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            last_update: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Mark the start of a new frame
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_update);
        self.last_update = now;
        self.frame_count += 1;
    }

    /// Time since the previous frame
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Time since the previous frame in seconds
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Time since startup in seconds
    pub fn elapsed_seconds(&self) -> f32 {
        self.last_update.duration_since(self.startup).as_secs_f32()
    }

    /// Number of frames so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_counts_frames() {
        let mut time = Time::new();
        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.delta(), Duration::ZERO);

        time.update();
        time.update();
        assert_eq!(time.frame_count(), 2);
        assert!(time.elapsed_seconds() >= time.delta_seconds());
    }
}
