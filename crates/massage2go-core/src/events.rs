use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::{BookingStage, BookingStatus, StepStatus};
use crate::catalog::GateCommand;
use crate::geo::Coordinates;
use crate::session::VerificationMethod;

/// Every state change in the system produces an Event.
/// The CLI prints them as JSON; the ticker forwards them over a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    StageChanged {
        booking_id: String,
        from: BookingStage,
        to: BookingStage,
        at: DateTime<Utc>,
    },
    /// The payment step counter moved forward by elapsed time.
    PaymentStepAdvanced {
        booking_id: String,
        step: u8,
        at: DateTime<Utc>,
    },
    /// The page-level percentage counter moved forward.
    PaymentProgress {
        booking_id: String,
        percent: u8,
        at: DateTime<Utc>,
    },
    /// Percentage reached 100; confirmation follows after a fixed delay.
    PaymentCompleted {
        booking_id: String,
        at: DateTime<Utc>,
    },
    BookingConfirmed {
        booking_id: String,
        /// Query string handed to the confirmation screen.
        confirmation_query: String,
        at: DateTime<Utc>,
    },
    TherapistMoved {
        booking_id: String,
        position: Coordinates,
        progress: f64,
        eta_min: u32,
        at: DateTime<Utc>,
    },
    TherapistArrived {
        booking_id: String,
        at: DateTime<Utc>,
    },
    ReviewSubmitted {
        booking_id: String,
        rating: u8,
        at: DateTime<Utc>,
    },
    VerificationStarted {
        method: VerificationMethod,
        at: DateTime<Utc>,
    },
    VerificationProgress {
        percent: u8,
        at: DateTime<Utc>,
    },
    VerificationSucceeded {
        method: VerificationMethod,
        at: DateTime<Utc>,
    },
    SignedIn {
        user_id: String,
        email: String,
        at: DateTime<Utc>,
    },
    SignedOut {
        at: DateTime<Utc>,
    },
    DevicesDiscovered {
        count: usize,
        at: DateTime<Utc>,
    },
    DeviceConnected {
        device_id: String,
        at: DateTime<Utc>,
    },
    DeviceDisconnected {
        device_id: String,
        at: DateTime<Utc>,
    },
    GateCommandSent {
        device_id: String,
        command: GateCommand,
        success: bool,
        at: DateTime<Utc>,
    },
    BookingSnapshot {
        booking_id: String,
        stage: BookingStage,
        status: Option<BookingStatus>,
        therapist: Option<String>,
        service: Option<String>,
        payment_step: Option<u8>,
        payment_steps: Vec<StepStatus>,
        payment_percent: Option<u8>,
        eta_min: Option<u32>,
        position: Option<Coordinates>,
        active_timers: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Stage changes, confirmations and arrivals; everything except the
    /// per-tick progress noise.
    pub fn is_milestone(&self) -> bool {
        !matches!(
            self,
            Event::PaymentProgress { .. }
                | Event::TherapistMoved { .. }
                | Event::VerificationProgress { .. }
                | Event::BookingSnapshot { .. }
        )
    }
}
