//! "Therapist en route" tracker.
//!
//! Moves a mock therapist position from its start point to the client in
//! a fixed number of equal steps, one per tick. Progress and ETA are both
//! derived from the integer step count so they finish together:
//! `eta = initial - floor(progress * initial)`.

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::geo::Coordinates;
use crate::storage::EnRouteConfig;

/// Roughly 2 km in both latitude and longitude.
const DISPATCH_OFFSET_DEG: f64 = 0.018;

/// Where a dispatched therapist sets off from, relative to the client.
pub fn dispatch_point(destination: Coordinates) -> Coordinates {
    Coordinates::new(
        destination.lat + DISPATCH_OFFSET_DEG,
        destination.lng + DISPATCH_OFFSET_DEG,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerUpdate {
    Moved {
        position: Coordinates,
        progress: f64,
        eta_min: u32,
    },
    Arrived,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnRouteTracker {
    start: Coordinates,
    destination: Coordinates,
    step: u32,
    steps: u32,
    initial_eta_min: u32,
    timer: Option<Interval>,
    arrived: bool,
}

impl EnRouteTracker {
    pub fn start(
        start: Coordinates,
        destination: Coordinates,
        config: &EnRouteConfig,
        now_ms: u64,
    ) -> Self {
        Self {
            start,
            destination,
            step: 0,
            steps: config.steps.max(1),
            initial_eta_min: config.initial_eta_min,
            timer: Some(Interval::starting_at(now_ms, config.tick_ms)),
            arrived: false,
        }
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// 0.0 ..= 1.0
    pub fn progress(&self) -> f64 {
        f64::from(self.step) / f64::from(self.steps)
    }

    pub fn eta_min(&self) -> u32 {
        let elapsed =
            u64::from(self.step) * u64::from(self.initial_eta_min) / u64::from(self.steps);
        self.initial_eta_min.saturating_sub(elapsed as u32)
    }

    pub fn position(&self) -> Coordinates {
        self.start.lerp(&self.destination, self.progress())
    }

    pub fn destination(&self) -> Coordinates {
        self.destination
    }

    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Stop moving without arriving (the tracking sheet was closed).
    pub fn stop(&mut self) {
        self.timer = None;
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Vec<TrackerUpdate> {
        let mut updates = Vec::new();
        while let Some(timer) = self.timer.as_mut() {
            if timer.next_fire(now_ms).is_none() {
                break;
            }
            self.step = (self.step + 1).min(self.steps);
            updates.push(TrackerUpdate::Moved {
                position: self.position(),
                progress: self.progress(),
                eta_min: self.eta_min(),
            });
            if self.step == self.steps {
                self.arrived = true;
                self.timer = None;
                updates.push(TrackerUpdate::Arrived);
            }
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Coordinates = Coordinates::new(-26.1076, 28.0567);
    const HOME: Coordinates = Coordinates::new(-26.1025, 28.0534);

    fn tracker() -> EnRouteTracker {
        EnRouteTracker::start(START, HOME, &EnRouteConfig::default(), 0)
    }

    #[test]
    fn starts_at_origin_with_full_eta() {
        let t = tracker();
        assert_eq!(t.position(), START);
        assert_eq!(t.eta_min(), 5);
        assert_eq!(t.progress(), 0.0);
        assert!(t.is_running());
    }

    #[test]
    fn arrives_after_fifty_seconds() {
        let mut t = tracker();
        let updates = t.tick_at(49_000);
        assert_eq!(updates.len(), 49);
        assert!(!t.has_arrived());
        assert_eq!(t.eta_min(), 1);

        let updates = t.tick_at(50_000);
        assert_eq!(
            updates.last(),
            Some(&TrackerUpdate::Arrived),
        );
        assert!(t.has_arrived());
        assert_eq!(t.progress(), 1.0);
        assert_eq!(t.eta_min(), 0);
        assert_eq!(t.position(), HOME);
        assert!(!t.is_running());
    }

    #[test]
    fn eta_hits_zero_exactly_with_full_progress() {
        let mut t = tracker();
        let updates = t.tick_at(1_000_000);
        let moves: Vec<(f64, u32)> = updates
            .iter()
            .filter_map(|u| match u {
                TrackerUpdate::Moved { progress, eta_min, .. } => Some((*progress, *eta_min)),
                TrackerUpdate::Arrived => None,
            })
            .collect();
        assert_eq!(moves.len(), 50);
        for (progress, eta) in &moves {
            assert_eq!(*eta == 0, *progress == 1.0, "progress {progress} eta {eta}");
        }
        assert!(moves.windows(2).all(|w| w[1].1 <= w[0].1));
    }

    #[test]
    fn moved_updates_match_the_tracker_state() {
        let mut t = tracker();
        for now in (1_000..=50_000).step_by(1_000) {
            let updates = t.tick_at(now);
            let Some(TrackerUpdate::Moved {
                position,
                progress,
                eta_min,
            }) = updates.first().copied()
            else {
                panic!("no move at {now}");
            };
            assert_eq!(position, t.position());
            assert_eq!(progress, t.progress());
            assert_eq!(eta_min, t.eta_min());
        }
    }

    #[test]
    fn dispatch_point_is_about_two_km_out() {
        let d = dispatch_point(HOME).distance_km(&HOME);
        assert!((2.0..3.0).contains(&d), "got {d}");
    }

    #[test]
    fn stopped_tracker_never_moves() {
        let mut t = tracker();
        t.tick_at(3_000);
        t.stop();
        assert!(t.tick_at(100_000).is_empty());
        assert_eq!(t.step(), 3);
        assert!(!t.has_arrived());
    }
}
