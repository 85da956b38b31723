//! Booking Stage Controller.
//!
//! The controller is a wall-clock-based state machine. It owns no threads:
//! callers advance it with `tick_at(now_ms)` (or `tick()`), either from a
//! CLI invocation or from [`crate::sim::Ticker`].
//!
//! ## Stage Transitions
//!
//! ```text
//! Browsing -> Reviewing -> SelectingPayment -> Processing -> Confirmed
//!          -> EnRoute -> Completed
//! (any non-terminal stage) -> Cancelled
//! ```

mod controller;
mod en_route;
mod interval;
mod payment;
mod record;
mod review;
mod stage;

pub use controller::BookingController;
pub use en_route::{dispatch_point, EnRouteTracker, TrackerUpdate};
pub use interval::Interval;
pub use payment::{PaymentProcessing, PaymentStep, PaymentUpdate, StepStatus, PAYMENT_STEPS};
pub use record::{Booking, BookingStatus, ServiceSummary, TherapistSummary};
pub use review::Review;
pub use stage::BookingStage;

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
