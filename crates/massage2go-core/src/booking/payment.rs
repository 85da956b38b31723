//! Simulated payment processing.
//!
//! Two indicators are shown while a payment "processes": a step list and a
//! percentage bar. In [`ProgressMode::Independent`] each has its own timer
//! with its own cadence and nothing ties them together except that both
//! eventually stop. In [`ProgressMode::Unified`] only the percentage timer
//! runs and the step list is derived from it.
//!
//! Reaching 100 % schedules the confirmation after `confirm_delay_ms`.

use serde::{Deserialize, Serialize};

use super::interval::Interval;
use crate::storage::{PaymentConfig, ProgressMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentStep {
    pub name: &'static str,
    pub description: &'static str,
}

/// Labels for the step list. `payment.step_count` selects a prefix.
pub const PAYMENT_STEPS: [PaymentStep; 5] = [
    PaymentStep {
        name: "Payment Initiated",
        description: "Starting secure transaction",
    },
    PaymentStep {
        name: "Processing Payment",
        description: "Verifying card details",
    },
    PaymentStep {
        name: "Security Verification",
        description: "Ensuring transaction safety",
    },
    PaymentStep {
        name: "Confirming Booking",
        description: "Securing your time slot",
    },
    PaymentStep {
        name: "Notifying Therapist",
        description: "Alerting your massage therapist",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Processing,
    Completed,
}

/// What a tick changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentUpdate {
    StepAdvanced(u8),
    Progress(u8),
    /// Percentage hit 100 at this time.
    Completed { at_ms: u64 },
    /// Confirmation delay elapsed.
    ReadyToConfirm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentProcessing {
    mode: ProgressMode,
    step_count: u8,
    step: u8,
    /// Set by the step timer's fire after the last step was reached.
    steps_finished: bool,
    percent: u8,
    step_timer: Option<Interval>,
    percent_timer: Option<Interval>,
    confirm_delay_ms: u64,
    confirm_at_ms: Option<u64>,
    ready: bool,
    step_timers_started: u32,
}

impl PaymentProcessing {
    /// Start processing at `now_ms`. Starts exactly one step timer in
    /// independent mode, plus the percentage timer in every mode.
    pub fn start(config: &PaymentConfig, now_ms: u64) -> Self {
        let step_count = config.step_count.clamp(1, PAYMENT_STEPS.len() as u8);
        let (step_timer, step_timers_started) = match config.progress_mode {
            ProgressMode::Independent => {
                (Some(Interval::starting_at(now_ms, config.step_interval_ms)), 1)
            }
            ProgressMode::Unified => (None, 0),
        };
        tracing::debug!(mode = ?config.progress_mode, step_count, "payment processing started");
        Self {
            mode: config.progress_mode,
            step_count,
            step: 0,
            steps_finished: false,
            percent: 0,
            step_timer,
            percent_timer: Some(Interval::starting_at(now_ms, config.percent_interval_ms)),
            confirm_delay_ms: config.confirm_delay_ms,
            confirm_at_ms: None,
            ready: false,
            step_timers_started,
        }
    }

    pub fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Current step index, `0..step_count`.
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn last_step(&self) -> u8 {
        self.step_count - 1
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn steps(&self) -> &'static [PaymentStep] {
        &PAYMENT_STEPS[..self.step_count as usize]
    }

    pub fn step_statuses(&self) -> Vec<StepStatus> {
        (0..self.step_count)
            .map(|i| {
                if i < self.step || (i == self.step && self.steps_finished) {
                    StepStatus::Completed
                } else if i == self.step {
                    StepStatus::Processing
                } else {
                    StepStatus::Pending
                }
            })
            .collect()
    }

    /// Timers currently armed (step, percentage, confirmation delay).
    pub fn active_timers(&self) -> usize {
        usize::from(self.step_timer.is_some())
            + usize::from(self.percent_timer.is_some())
            + usize::from(self.confirm_at_ms.is_some())
    }

    pub fn step_timers_started(&self) -> u32 {
        self.step_timers_started
    }

    /// Disarm every timer. Nothing fires afterwards.
    pub fn clear(&mut self) {
        self.step_timer = None;
        self.percent_timer = None;
        self.confirm_at_ms = None;
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Vec<PaymentUpdate> {
        let mut updates = Vec::new();

        if let Some(timer) = self.step_timer.as_mut() {
            while timer.next_fire(now_ms).is_some() {
                if self.step < self.step_count - 1 {
                    self.step += 1;
                    updates.push(PaymentUpdate::StepAdvanced(self.step));
                } else {
                    self.steps_finished = true;
                    break;
                }
            }
            if self.steps_finished {
                self.step_timer = None;
            }
        }

        if let Some(timer) = self.percent_timer.as_mut() {
            let mut hit_at = None;
            while let Some(fired_at) = timer.next_fire(now_ms) {
                self.percent += 1;
                updates.push(PaymentUpdate::Progress(self.percent));
                if self.mode == ProgressMode::Unified {
                    let derived = derive_step(self.percent, self.step_count);
                    if derived > self.step {
                        self.step = derived;
                        updates.push(PaymentUpdate::StepAdvanced(derived));
                    }
                }
                if self.percent >= 100 {
                    hit_at = Some(fired_at);
                    break;
                }
            }
            if let Some(at_ms) = hit_at {
                self.percent_timer = None;
                if self.mode == ProgressMode::Unified {
                    self.steps_finished = true;
                }
                self.confirm_at_ms = Some(at_ms.saturating_add(self.confirm_delay_ms));
                updates.push(PaymentUpdate::Completed { at_ms });
            }
        }

        if let Some(deadline) = self.confirm_at_ms {
            if now_ms >= deadline {
                self.confirm_at_ms = None;
                self.ready = true;
                updates.push(PaymentUpdate::ReadyToConfirm);
            }
        }

        updates
    }
}

fn derive_step(percent: u8, step_count: u8) -> u8 {
    let step = u32::from(percent) * u32::from(step_count) / 100;
    (step as u8).min(step_count - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: ProgressMode) -> PaymentConfig {
        PaymentConfig {
            progress_mode: mode,
            ..PaymentConfig::default()
        }
    }

    #[test]
    fn independent_mode_starts_both_timers() {
        let p = PaymentProcessing::start(&config(ProgressMode::Independent), 0);
        assert_eq!(p.active_timers(), 2);
        assert_eq!(p.step_timers_started(), 1);
        assert_eq!(
            p.step_statuses(),
            vec![StepStatus::Processing, StepStatus::Pending, StepStatus::Pending]
        );
    }

    #[test]
    fn step_counter_stops_at_last_step() {
        let mut p = PaymentProcessing::start(&config(ProgressMode::Independent), 0);
        let updates = p.tick_at(2_000);
        assert!(updates.contains(&PaymentUpdate::StepAdvanced(1)));
        p.tick_at(4_000);
        assert_eq!(p.step(), 2);
        assert_eq!(p.step_statuses()[2], StepStatus::Processing);
        p.tick_at(6_000);
        assert_eq!(p.step(), 2);
        assert_eq!(p.step_statuses(), vec![StepStatus::Completed; 3]);
        p.tick_at(60_000);
        assert_eq!(p.step(), 2);
    }

    #[test]
    fn timers_run_at_their_own_cadence() {
        let mut p = PaymentProcessing::start(&config(ProgressMode::Independent), 0);
        p.tick_at(2_000);
        // 2000 / 120 = 16 percentage fires, one step fire.
        assert_eq!(p.percent(), 16);
        assert_eq!(p.step(), 1);
    }

    #[test]
    fn percent_caps_at_100_then_confirms_after_delay() {
        let mut p = PaymentProcessing::start(&config(ProgressMode::Independent), 0);
        let updates = p.tick_at(12_000);
        assert_eq!(p.percent(), 100);
        assert!(updates.contains(&PaymentUpdate::Completed { at_ms: 12_000 }));
        assert!(!p.is_ready());

        assert!(p.tick_at(13_499).is_empty());
        assert_eq!(p.tick_at(13_500), vec![PaymentUpdate::ReadyToConfirm]);
        assert!(p.is_ready());
        assert_eq!(p.percent(), 100);
        assert_eq!(p.active_timers(), 0);
    }

    #[test]
    fn late_poll_reports_everything_in_one_tick() {
        let mut p = PaymentProcessing::start(&config(ProgressMode::Independent), 0);
        let updates = p.tick_at(100_000);
        assert_eq!(p.percent(), 100);
        assert_eq!(p.step(), 2);
        assert_eq!(updates.last(), Some(&PaymentUpdate::ReadyToConfirm));
        let progress = updates
            .iter()
            .filter(|u| matches!(u, PaymentUpdate::Progress(_)))
            .count();
        assert_eq!(progress, 100);
    }

    #[test]
    fn clear_disarms_everything() {
        let mut p = PaymentProcessing::start(&config(ProgressMode::Independent), 0);
        p.tick_at(1_000);
        p.clear();
        assert_eq!(p.active_timers(), 0);
        let before = (p.step(), p.percent());
        assert!(p.tick_at(100_000).is_empty());
        assert_eq!((p.step(), p.percent()), before);
    }

    #[test]
    fn unified_mode_derives_steps_from_percent() {
        let mut p = PaymentProcessing::start(&config(ProgressMode::Unified), 0);
        assert_eq!(p.active_timers(), 1);
        assert_eq!(p.step_timers_started(), 0);

        p.tick_at(120 * 33);
        assert_eq!(p.step(), 0);
        p.tick_at(120 * 34);
        assert_eq!(p.step(), 1);
        p.tick_at(120 * 67);
        assert_eq!(p.step(), 2);
        p.tick_at(120 * 100);
        assert_eq!(p.step(), 2);
        assert_eq!(p.step_statuses(), vec![StepStatus::Completed; 3]);
    }

    #[test]
    fn step_count_is_clamped() {
        let cfg = PaymentConfig {
            step_count: 9,
            ..PaymentConfig::default()
        };
        let p = PaymentProcessing::start(&cfg, 0);
        assert_eq!(p.steps().len(), 5);
        let cfg = PaymentConfig {
            step_count: 0,
            ..PaymentConfig::default()
        };
        assert_eq!(PaymentProcessing::start(&cfg, 0).last_step(), 0);
    }
}
