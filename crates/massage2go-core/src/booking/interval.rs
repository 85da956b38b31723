use serde::{Deserialize, Serialize};

/// A repeating timer evaluated against caller-supplied wall-clock time.
///
/// Firing is catch-up: if the caller polls late, every missed period is
/// still reported, each with the time it was due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    period_ms: u64,
    next_due_ms: u64,
}

impl Interval {
    /// First fire is one full period after `now_ms`. A zero period is
    /// treated as 1 ms.
    pub fn starting_at(now_ms: u64, period_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Consume one due fire, returning the time it was scheduled for.
    pub fn next_fire(&mut self, now_ms: u64) -> Option<u64> {
        if now_ms < self.next_due_ms {
            return None;
        }
        let due = self.next_due_ms;
        self.next_due_ms = due.saturating_add(self.period_ms);
        Some(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_period() {
        let mut i = Interval::starting_at(1_000, 100);
        assert_eq!(i.next_fire(1_099), None);
        assert_eq!(i.next_fire(1_100), Some(1_100));
        assert_eq!(i.next_fire(1_100), None);
        assert_eq!(i.next_due_ms(), 1_200);
    }

    #[test]
    fn catches_up_missed_periods() {
        let mut i = Interval::starting_at(0, 120);
        let fires: Vec<u64> = std::iter::from_fn(|| i.next_fire(500)).collect();
        assert_eq!(fires, vec![120, 240, 360, 480]);
    }

    #[test]
    fn zero_period_is_clamped() {
        let i = Interval::starting_at(5, 0);
        assert_eq!(i.period_ms(), 1);
    }
}
