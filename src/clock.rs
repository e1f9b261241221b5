//! Frame clock
//!
//! Turns successive monotonic timestamps into the per-frame delta that drives
//! every scene. The previous timestamp starts at zero, so the first delta is
//! simply "time since the source's epoch" and may be large.

/// A monotonic millisecond source
pub trait TimeSource {
    fn now_millis(&self) -> u64;
}

/// Native time source measuring from its own creation
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct InstantSource {
    epoch: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl InstantSource {
    pub fn new() -> Self {
        Self {
            epoch: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for InstantSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TimeSource for InstantSource {
    fn now_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

#[derive(Debug, Clone, Default)]
pub struct Clock {
    last_now: u64,
    delta_millis: u64,
    delta_secs: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the source and recompute the delta
    pub fn update(&mut self, source: &impl TimeSource) {
        self.update_at(source.now_millis());
    }

    /// Recompute the delta from an externally supplied timestamp (ms)
    pub fn update_at(&mut self, now: u64) {
        // A source that steps backwards yields a zero delta rather than wrapping
        self.delta_millis = now.saturating_sub(self.last_now);
        self.last_now = now;
        self.delta_secs = self.delta_millis as f32 / 1000.0;
    }

    pub fn delta_millis(&self) -> u64 {
        self.delta_millis
    }

    pub fn delta_secs(&self) -> f32 {
        self.delta_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct ManualSource(Cell<u64>);

    impl TimeSource for ManualSource {
        fn now_millis(&self) -> u64 {
            self.0.get()
        }
    }

    #[test]
    fn test_first_delta_measures_from_zero() {
        let mut clock = Clock::new();
        clock.update_at(250);
        assert_eq!(clock.delta_millis(), 250);
        assert!((clock.delta_secs() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_successive_deltas() {
        let source = ManualSource(Cell::new(1000));
        let mut clock = Clock::new();
        clock.update(&source);
        source.0.set(1016);
        clock.update(&source);
        assert_eq!(clock.delta_millis(), 16);
        source.0.set(1016);
        clock.update(&source);
        assert_eq!(clock.delta_millis(), 0);
    }

    #[test]
    fn test_backwards_source_yields_zero() {
        let mut clock = Clock::new();
        clock.update_at(500);
        clock.update_at(400);
        assert_eq!(clock.delta_millis(), 0);
        clock.update_at(450);
        assert_eq!(clock.delta_millis(), 50);
    }
}
