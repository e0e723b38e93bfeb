//! Frame timing utilities

use std::time::{Duration, Instant};

/// Accumulates per-frame render durations
pub struct FrameTimer {
    frame_start: Option<Instant>,
    last: Duration,
    total: Duration,
    min: Duration,
    max: Duration,
    frame_count: u64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer with no recorded frames
    pub fn new() -> Self {
        Self {
            frame_start: None,
            last: Duration::ZERO,
            total: Duration::ZERO,
            min: Duration::MAX,
            max: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Mark the start of a frame
    pub fn begin_frame(&mut self) {
        self.frame_start = Some(Instant::now());
    }

    /// Mark the end of a frame; ignored without a matching `begin_frame`
    pub fn end_frame(&mut self) {
        if let Some(start) = self.frame_start.take() {
            self.record(start.elapsed());
        }
    }

    /// Record an externally measured frame duration
    pub fn record(&mut self, frame: Duration) {
        self.last = frame;
        self.total += frame;
        self.min = self.min.min(frame);
        self.max = self.max.max(frame);
        self.frame_count += 1;
    }

    /// Duration of the most recent frame
    pub fn last_frame(&self) -> Duration {
        self.last
    }

    /// Number of recorded frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Shortest recorded frame, or zero when nothing was recorded
    pub fn min_frame(&self) -> Duration {
        if self.frame_count == 0 {
            Duration::ZERO
        } else {
            self.min
        }
    }

    /// Longest recorded frame
    pub fn max_frame(&self) -> Duration {
        self.max
    }

    /// Mean frame duration in milliseconds
    pub fn average_millis(&self) -> f32 {
        if self.frame_count == 0 {
            0.0
        } else {
            self.total.as_secs_f32() * 1000.0 / self.frame_count as f32
        }
    }

    /// Frames per second implied by the mean frame duration
    pub fn average_fps(&self) -> f32 {
        let avg = self.average_millis();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }
}
