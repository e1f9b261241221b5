//! Frame-index animation
//!
//! The simulation only tracks which frame is current; the scene maps the
//! index onto the resolved images.

use crate::consts::ANIMATION_FRAME_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frame_count: usize,
    index: usize,
    accumulated_ms: u64,
}

impl Animation {
    pub fn new(frame_count: usize) -> Self {
        assert!(frame_count > 0, "animation without frames");
        Self {
            frame_count,
            index: 0,
            accumulated_ms: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Accumulate `delta_ms`; once past the frame period, step one frame
    /// (cyclically) and restart the accumulator
    pub fn advance(&mut self, delta_ms: u64) {
        self.accumulated_ms += delta_ms;
        if self.accumulated_ms > ANIMATION_FRAME_MS {
            self.index = (self.index + 1) % self.frame_count;
            self.accumulated_ms = 0;
        }
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.accumulated_ms = 0;
    }

    /// Pick this animation's frame out of a frame list
    pub fn frame<'a, T>(&self, frames: &'a [T]) -> &'a T {
        &frames[self.index % frames.len()]
    }
}
