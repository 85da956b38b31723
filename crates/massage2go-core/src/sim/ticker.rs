//! Drives a shared [`BookingController`] on a tokio interval.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::booking::BookingController;
use crate::events::Event;

/// Epoch milliseconds whose passage is measured by tokio time.
///
/// Commands and the ticker must read the same clock: under a paused test
/// runtime the system clock stands still while tokio time advances.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    base_ms: u64,
    origin: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            base_ms: crate::booking::now_ms(),
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.base_ms + self.origin.elapsed().as_millis() as u64
    }
}

/// Called once with the booking id when the therapist arrives.
pub type ArrivalCallback = Box<dyn FnOnce(&str) + Send + 'static>;

/// Owns the interval task. Stopping or dropping the ticker aborts it, so
/// no timer outlives the screen that started it.
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Tick `controller` every `period`, forwarding each event to `events`.
    /// A zero period ticks every millisecond.
    ///
    /// The task ends by itself once the booking reaches a terminal stage or
    /// the receiver is dropped.
    pub fn spawn(
        controller: Arc<Mutex<BookingController>>,
        clock: Clock,
        period: Duration,
        events: mpsc::UnboundedSender<Event>,
        on_arrival: Option<ArrivalCallback>,
    ) -> Self {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(run(controller, clock, period, events, on_arrival));
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        // Drop aborts.
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run(
    controller: Arc<Mutex<BookingController>>,
    clock: Clock,
    period: Duration,
    events: mpsc::UnboundedSender<Event>,
    mut on_arrival: Option<ArrivalCallback>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let now_ms = clock.now_ms();
        let (batch, id, finished) = {
            let mut c = controller.lock().await;
            let batch = c.tick_at(now_ms);
            (batch, c.id().to_string(), c.stage().is_terminal())
        };
        for event in batch {
            if matches!(event, Event::TherapistArrived { .. }) {
                if let Some(callback) = on_arrival.take() {
                    callback(&id);
                }
            }
            if events.send(event).is_err() {
                tracing::debug!(booking_id = %id, "event receiver dropped, ticker exiting");
                return;
            }
        }
        if finished {
            tracing::debug!(booking_id = %id, "booking finished, ticker exiting");
            return;
        }
    }
}
