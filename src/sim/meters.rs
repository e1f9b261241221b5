//! Meters with a pending delta
//!
//! Changes are queued as `pending` and drained into `committed` a few units per
//! tick, which animates the HUD instead of jumping. Bounds are enforced when a
//! change is queued, so draining can never leave the range.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    committed: i64,
    pending: i64,
    /// Upper bound; unbounded meters (score) only have the 0 floor
    max: Option<i64>,
    /// Units moved per tick
    drain: i64,
}

impl Meter {
    pub fn bounded(initial: i64, max: i64, drain: i64) -> Self {
        debug_assert!((0..=max).contains(&initial));
        Self {
            committed: initial,
            pending: 0,
            max: Some(max),
            drain,
        }
    }

    pub fn unbounded(drain: i64) -> Self {
        Self {
            committed: 0,
            pending: 0,
            max: None,
            drain,
        }
    }

    pub fn committed(&self) -> i64 {
        self.committed
    }

    pub fn pending(&self) -> i64 {
        self.pending
    }

    pub fn max(&self) -> Option<i64> {
        self.max
    }

    /// Value once everything pending has drained
    pub fn total(&self) -> i64 {
        self.committed + self.pending
    }

    /// Queue a change, clamping the eventual total into range
    pub fn add(&mut self, amount: i64) {
        let mut target = (self.total() + amount).max(0);
        if let Some(max) = self.max {
            target = target.min(max);
        }
        self.pending = target - self.committed;
    }

    /// Move up to one drain step from pending into committed.
    /// Returns the amount moved (0 when idle).
    pub fn drain(&mut self) -> i64 {
        if self.pending == 0 {
            return 0;
        }
        let step = self.pending.signum() * self.pending.abs().min(self.drain);
        self.pending -= step;
        self.committed += step;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_add_caps_at_max() {
        let mut life = Meter::bounded(100, 100, 1);
        life.add(30);
        assert_eq!(life.total(), 100);
        assert_eq!(life.pending(), 0);
        for _ in 0..50 {
            life.drain();
        }
        assert_eq!(life.committed(), 100);
    }

    #[test]
    fn test_drain_ramps_one_unit_per_tick() {
        let mut life = Meter::bounded(50, 100, 1);
        life.add(-3);
        assert_eq!(life.drain(), -1);
        assert_eq!(life.committed(), 49);
        assert_eq!(life.pending(), -2);
        life.drain();
        life.drain();
        assert_eq!(life.drain(), 0);
        assert_eq!(life.committed(), 47);
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut life = Meter::bounded(5, 100, 1);
        life.add(-50);
        assert_eq!(life.total(), 0);
        assert_eq!(life.pending(), -5);
    }

    #[test]
    fn test_score_drains_in_batches() {
        let mut score = Meter::unbounded(5);
        score.add(12);
        assert_eq!(score.drain(), 5);
        assert_eq!(score.drain(), 5);
        assert_eq!(score.drain(), 2);
        assert_eq!(score.committed(), 12);
    }

    proptest! {
        #[test]
        fn prop_bounded_meter_stays_in_range(
            initial in 0i64..=100,
            changes in proptest::collection::vec((-60i64..60, 0usize..5), 1..40),
        ) {
            let mut meter = Meter::bounded(initial, 100, 1);
            for (amount, drains) in changes {
                meter.add(amount);
                prop_assert!((0..=100).contains(&meter.total()));
                for _ in 0..drains {
                    meter.drain();
                    prop_assert!((0..=100).contains(&meter.committed()));
                }
            }
        }
    }
}
