//! Booking stage controller.
//!
//! One controller per booking attempt. Commands validate the current stage
//! and return the events they caused; `tick_at` advances every timer the
//! controller owns and returns what happened since the last call.
//!
//! ## Usage
//!
//! ```ignore
//! let mut c = BookingController::new(&config, None);
//! c.select_by_id("1", "swedish")?;
//! c.confirm()?;
//! c.choose_payment(PaymentMethod::Card)?;
//! // In a loop:
//! let events = c.tick();
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::en_route::{dispatch_point, EnRouteTracker, TrackerUpdate};
use super::payment::{PaymentProcessing, PaymentUpdate};
use super::record::{Booking, BookingStatus};
use super::review::Review;
use super::stage::BookingStage;
use super::now_ms;
use crate::catalog::{service_by_id, therapist_by_id, MassageService, Therapist};
use crate::error::BookingError;
use crate::events::Event;
use crate::geo::{resolve_location, Coordinates};
use crate::handoff::ConfirmationParams;
use crate::storage::{Config, EnRouteConfig, PaymentConfig};
use crate::wallet::PaymentMethod;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingController {
    id: String,
    stage: BookingStage,
    #[serde(default)]
    status: Option<BookingStatus>,
    #[serde(default)]
    therapist: Option<Therapist>,
    #[serde(default)]
    service: Option<MassageService>,
    #[serde(default)]
    payment_method: Option<PaymentMethod>,
    #[serde(default)]
    payment: Option<PaymentProcessing>,
    #[serde(default)]
    tracker: Option<EnRouteTracker>,
    #[serde(default)]
    confirmation: Option<ConfirmationParams>,
    #[serde(default)]
    review: Option<Review>,
    user_location: Coordinates,
    payment_config: PaymentConfig,
    en_route_config: EnRouteConfig,
    created_at: DateTime<Utc>,
}

impl BookingController {
    /// Start a booking in `Browsing`. A missing user location falls back to
    /// `location.fallback_*` from the config.
    pub fn new(config: &Config, user_location: Option<Coordinates>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            stage: BookingStage::Browsing,
            status: None,
            therapist: None,
            service: None,
            payment_method: None,
            payment: None,
            tracker: None,
            confirmation: None,
            review: None,
            user_location: resolve_location(user_location, config.location.fallback()),
            payment_config: config.payment.clone(),
            en_route_config: config.en_route.clone(),
            created_at: Utc::now(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stage(&self) -> BookingStage {
        self.stage
    }

    pub fn status(&self) -> Option<BookingStatus> {
        self.status
    }

    pub fn therapist(&self) -> Option<&Therapist> {
        self.therapist.as_ref()
    }

    pub fn service(&self) -> Option<&MassageService> {
        self.service.as_ref()
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn payment(&self) -> Option<&PaymentProcessing> {
        self.payment.as_ref()
    }

    pub fn tracker(&self) -> Option<&EnRouteTracker> {
        self.tracker.as_ref()
    }

    pub fn confirmation(&self) -> Option<&ConfirmationParams> {
        self.confirmation.as_ref()
    }

    pub fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }

    pub fn user_location(&self) -> Coordinates {
        self.user_location
    }

    /// Timers armed across payment processing and tracking.
    pub fn active_timers(&self) -> usize {
        self.payment.as_ref().map_or(0, PaymentProcessing::active_timers)
            + self.tracker.as_ref().map_or(0, |t| usize::from(t.is_running()))
    }

    /// The booking card for the current selection, once one exists.
    pub fn booking(&self) -> Option<Booking> {
        let therapist = self.therapist.as_ref()?;
        let service = self.service.as_ref()?;
        Some(Booking::scheduled(
            self.id.clone(),
            therapist,
            service,
            self.created_at,
            self.status.unwrap_or(BookingStatus::Upcoming),
            "Current location",
            Some(self.user_location),
        ))
    }

    pub fn snapshot(&self) -> Event {
        Event::BookingSnapshot {
            booking_id: self.id.clone(),
            stage: self.stage,
            status: self.status,
            therapist: self.therapist.as_ref().map(|t| t.name.clone()),
            service: self.service.as_ref().map(|s| s.name.clone()),
            payment_step: self.payment.as_ref().map(PaymentProcessing::step),
            payment_steps: self
                .payment
                .as_ref()
                .map(PaymentProcessing::step_statuses)
                .unwrap_or_default(),
            payment_percent: self.payment.as_ref().map(PaymentProcessing::percent),
            eta_min: self.tracker.as_ref().map(EnRouteTracker::eta_min),
            position: self.tracker.as_ref().map(EnRouteTracker::position),
            active_timers: self.active_timers(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Pick a therapist and one service. Therapists without services
    /// cannot be booked.
    pub fn select(
        &mut self,
        therapist: Therapist,
        service: MassageService,
    ) -> Result<Event, BookingError> {
        self.expect_stage(BookingStage::Browsing, "select a therapist")?;
        if !therapist.is_bookable() {
            return Err(BookingError::NotBookable(therapist.name));
        }
        tracing::debug!(therapist = %therapist.id, service = %service.id, "therapist selected");
        self.therapist = Some(therapist);
        self.service = Some(service);
        Ok(self.transition(BookingStage::Reviewing))
    }

    /// Like [`select`](Self::select), looking both up in the catalog. The
    /// service is taken from the therapist's own list first.
    pub fn select_by_id(
        &mut self,
        therapist_id: &str,
        service_id: &str,
    ) -> Result<Event, BookingError> {
        let therapist = therapist_by_id(therapist_id)
            .ok_or_else(|| BookingError::UnknownTherapist(therapist_id.to_string()))?;
        let service = therapist
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .or_else(|| service_by_id(service_id))
            .ok_or_else(|| BookingError::UnknownService(service_id.to_string()))?;
        self.select(therapist, service)
    }

    pub fn confirm(&mut self) -> Result<Event, BookingError> {
        self.expect_stage(BookingStage::Reviewing, "confirm")?;
        Ok(self.transition(BookingStage::SelectingPayment))
    }

    pub fn choose_payment(&mut self, method: PaymentMethod) -> Result<Event, BookingError> {
        self.choose_payment_at(method, now_ms())
    }

    /// Choose a payment method and start processing at `now_ms`.
    pub fn choose_payment_at(
        &mut self,
        method: PaymentMethod,
        now_ms: u64,
    ) -> Result<Event, BookingError> {
        self.expect_stage(BookingStage::SelectingPayment, "choose a payment method")?;
        self.payment_method = Some(method);
        self.payment = Some(PaymentProcessing::start(&self.payment_config, now_ms));
        Ok(self.transition(BookingStage::Processing))
    }

    pub fn start_tracking(&mut self) -> Result<Event, BookingError> {
        self.start_tracking_at(now_ms())
    }

    /// Dispatch the therapist towards the user location.
    pub fn start_tracking_at(&mut self, now_ms: u64) -> Result<Event, BookingError> {
        self.expect_stage(BookingStage::Confirmed, "start tracking")?;
        self.tracker = Some(EnRouteTracker::start(
            dispatch_point(self.user_location),
            self.user_location,
            &self.en_route_config,
            now_ms,
        ));
        self.status = Some(BookingStatus::TherapistEnRoute);
        Ok(self.transition(BookingStage::EnRoute))
    }

    /// Finish the session. Only possible once the therapist has arrived.
    pub fn complete(&mut self) -> Result<Event, BookingError> {
        self.expect_stage(BookingStage::EnRoute, "complete the session")?;
        if !self.tracker.as_ref().is_some_and(EnRouteTracker::has_arrived) {
            return Err(BookingError::InvalidTransition {
                stage: self.stage,
                action: "complete the session before the therapist arrives",
            });
        }
        self.status = Some(BookingStatus::Completed);
        Ok(self.transition(BookingStage::Completed))
    }

    /// Rate a completed session. Accepted once; the review only goes to the
    /// log.
    pub fn submit_review(&mut self, rating: u8, text: &str) -> Result<Event, BookingError> {
        self.expect_stage(BookingStage::Completed, "submit a review")?;
        if self.review.is_some() {
            return Err(BookingError::InvalidTransition {
                stage: self.stage,
                action: "submit a second review",
            });
        }
        let review = Review::new(rating, text)?;
        tracing::info!(
            booking_id = %self.id,
            rating = review.rating,
            text = %review.text,
            "review submitted"
        );
        let event = Event::ReviewSubmitted {
            booking_id: self.id.clone(),
            rating: review.rating,
            at: review.submitted_at,
        };
        self.review = Some(review);
        Ok(event)
    }

    /// Close the booking from any non-terminal stage. Every timer the
    /// controller owns is disarmed.
    pub fn cancel(&mut self) -> Result<Event, BookingError> {
        if self.stage.is_terminal() {
            return Err(BookingError::InvalidTransition {
                stage: self.stage,
                action: "cancel",
            });
        }
        if let Some(payment) = self.payment.as_mut() {
            payment.clear();
        }
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.stop();
        }
        Ok(self.transition(BookingStage::Cancelled))
    }

    pub fn tick(&mut self) -> Vec<Event> {
        self.tick_at(now_ms())
    }

    /// Advance all timers to `now_ms`.
    pub fn tick_at(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.stage.is_terminal() {
            return events;
        }

        let payment_updates = self
            .payment
            .as_mut()
            .map(|p| p.tick_at(now_ms))
            .unwrap_or_default();
        for update in payment_updates {
            match update {
                PaymentUpdate::StepAdvanced(step) => {
                    tracing::debug!(booking_id = %self.id, step, "payment step advanced");
                    events.push(Event::PaymentStepAdvanced {
                        booking_id: self.id.clone(),
                        step,
                        at: Utc::now(),
                    });
                }
                PaymentUpdate::Progress(percent) => events.push(Event::PaymentProgress {
                    booking_id: self.id.clone(),
                    percent,
                    at: Utc::now(),
                }),
                PaymentUpdate::Completed { .. } => events.push(Event::PaymentCompleted {
                    booking_id: self.id.clone(),
                    at: Utc::now(),
                }),
                PaymentUpdate::ReadyToConfirm => {
                    if self.stage == BookingStage::Processing {
                        events.extend(self.confirm_booking());
                    }
                }
            }
        }

        let tracker_updates = self
            .tracker
            .as_mut()
            .map(|t| t.tick_at(now_ms))
            .unwrap_or_default();
        for update in tracker_updates {
            match update {
                TrackerUpdate::Moved {
                    position,
                    progress,
                    eta_min,
                } => events.push(Event::TherapistMoved {
                    booking_id: self.id.clone(),
                    position,
                    progress,
                    eta_min,
                    at: Utc::now(),
                }),
                TrackerUpdate::Arrived => {
                    tracing::info!(booking_id = %self.id, "therapist arrived");
                    self.status = Some(BookingStatus::InProgress);
                    events.push(Event::TherapistArrived {
                        booking_id: self.id.clone(),
                        at: Utc::now(),
                    });
                }
            }
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn confirm_booking(&mut self) -> Vec<Event> {
        let params = ConfirmationParams {
            therapist: self
                .therapist
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_default(),
            service: self
                .service
                .as_ref()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            price: self
                .service
                .as_ref()
                .map(|s| s.price.to_string())
                .unwrap_or_default(),
            duration: self
                .service
                .as_ref()
                .map(|s| format!("{} minutes", s.duration))
                .unwrap_or_default(),
            image: self.therapist.as_ref().map(|t| t.image.clone()),
        };
        let query = params.to_query();
        self.confirmation = Some(params);
        self.status = Some(BookingStatus::Upcoming);
        let changed = self.transition(BookingStage::Confirmed);
        vec![
            Event::BookingConfirmed {
                booking_id: self.id.clone(),
                confirmation_query: query,
                at: Utc::now(),
            },
            changed,
        ]
    }

    fn expect_stage(
        &self,
        expected: BookingStage,
        action: &'static str,
    ) -> Result<(), BookingError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                stage: self.stage,
                action,
            })
        }
    }

    fn transition(&mut self, to: BookingStage) -> Event {
        let from = self.stage;
        self.stage = to;
        tracing::info!(booking_id = %self.id, %from, %to, "booking stage changed");
        Event::StageChanged {
            booking_id: self.id.clone(),
            from,
            to,
            at: Utc::now(),
        }
    }
}
