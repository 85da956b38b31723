use std::time::Duration;

use chrono::Utc;
use clap::Args;
use massage2go_core::booking::{BookingStatus, EnRouteTracker, TrackerUpdate};
use massage2go_core::catalog::sample_bookings;
use massage2go_core::geo::{fallback_route, resolve_location};
use massage2go_core::{Config, Event};
use tokio::time::Instant;

use super::{block_on, print_json_line, CliResult};

#[derive(Args)]
pub struct TrackArgs {
    /// Sample booking id (its status must be therapist-en-route)
    pub booking: String,
    /// Override the tracker cadence in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,
}

pub fn run(args: TrackArgs) -> CliResult {
    let config = Config::load_or_default();
    let booking = sample_bookings()
        .into_iter()
        .find(|b| b.id == args.booking)
        .ok_or_else(|| format!("unknown booking: {}", args.booking))?;
    if booking.status != BookingStatus::TherapistEnRoute {
        let message = format!("booking {} is {:?}, not en route", booking.id, booking.status);
        return Err(message.into());
    }

    let destination = resolve_location(booking.user_location, config.location.fallback());
    let start = booking.therapist.location;
    let route = fallback_route(
        &start,
        &destination,
        config.routing.road_factor,
        config.routing.avg_speed_kmh,
    );
    print_json_line(&serde_json::json!({ "booking": booking.id, "route": route }))?;

    let mut en_route = config.en_route.clone();
    if let Some(tick_ms) = args.tick_ms {
        en_route.tick_ms = tick_ms.max(1);
    }
    let tracker = EnRouteTracker::start(start, destination, &en_route, 0);
    block_on(follow(booking.id, tracker, en_route.tick_ms))?
}

async fn follow(booking_id: String, mut tracker: EnRouteTracker, tick_ms: u64) -> CliResult {
    let origin = Instant::now();
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    while !tracker.has_arrived() {
        interval.tick().await;
        let now_ms = origin.elapsed().as_millis() as u64;
        for update in tracker.tick_at(now_ms) {
            let event = match update {
                TrackerUpdate::Moved {
                    position,
                    progress,
                    eta_min,
                } => Event::TherapistMoved {
                    booking_id: booking_id.clone(),
                    position,
                    progress,
                    eta_min,
                    at: Utc::now(),
                },
                TrackerUpdate::Arrived => Event::TherapistArrived {
                    booking_id: booking_id.clone(),
                    at: Utc::now(),
                },
            };
            print_json_line(&event)?;
        }
    }
    Ok(())
}
