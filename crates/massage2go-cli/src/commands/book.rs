use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use massage2go_core::booking::{BookingController, BookingStage};
use massage2go_core::error::BookingError;
use massage2go_core::geo::Coordinates;
use massage2go_core::handoff::{GroupBookingDetails, Handoffs};
use massage2go_core::sim::{Clock, Simulator, Ticker};
use massage2go_core::storage::Database;
use massage2go_core::{Config, Event, PaymentMethod};
use tokio::sync::{mpsc, Mutex};

use super::{block_on, print_json, print_json_line, CliResult};

const CONTROLLER_KEY: &str = "booking_controller";

#[derive(Subcommand)]
pub enum BookAction {
    /// Start a new booking with a therapist and one of their services
    Start {
        #[arg(long)]
        therapist: String,
        #[arg(long)]
        service: String,
        /// User latitude (falls back to the configured location)
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// User longitude
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Confirm the selection and move on to payment
    Confirm,
    /// Choose a payment method and start processing
    Pay {
        /// card, eft or cash
        method: PaymentMethod,
    },
    /// Advance timers and print the booking state as JSON
    Status,
    /// Dispatch the therapist once the booking is confirmed
    Track,
    /// Finish the session after the therapist has arrived
    Complete,
    /// Rate the completed session
    Review {
        /// 1 to 5 stars
        rating: u8,
        #[arg(default_value = "")]
        text: String,
    },
    /// Close the booking and stop every timer
    Cancel,
    /// Run a whole booking in real time, printing milestones as JSON lines
    Simulate {
        #[arg(long, default_value = "1")]
        therapist: String,
        #[arg(long, default_value = "swedish")]
        service: String,
        #[arg(long, default_value = "card")]
        method: PaymentMethod,
        /// Ticker period in milliseconds
        #[arg(long, default_value_t = 100)]
        tick_ms: u64,
        /// Print every progress tick, not just milestones
        #[arg(long)]
        verbose: bool,
    },
    /// Build a group booking handoff and its WhatsApp invite
    Group {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "friends")]
        kind: String,
        #[arg(long)]
        participants: u32,
        #[arg(long, default_value_t = 1)]
        therapists: u32,
        /// Session length in hours
        #[arg(long, default_value_t = 1)]
        duration: u32,
        /// Group total in rand
        #[arg(long)]
        total: f64,
        /// "split" divides the total between participants
        #[arg(long, default_value = "split")]
        sharing: String,
    },
}

fn load_controller(db: &Database) -> Result<BookingController, Box<dyn std::error::Error>> {
    let json = db
        .kv_get(CONTROLLER_KEY)?
        .ok_or("no booking in progress; run `book start` first")?;
    let controller = serde_json::from_str(&json)
        .map_err(|e| format!("stored booking is unreadable ({e}); run `book start` again"))?;
    Ok(controller)
}

fn save_controller(db: &Database, controller: &BookingController) -> CliResult {
    let json = serde_json::to_string(controller)?;
    db.kv_set(CONTROLLER_KEY, &json)?;
    Ok(())
}

pub fn run(action: BookAction) -> CliResult {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        BookAction::Start {
            therapist,
            service,
            lat,
            lng,
        } => {
            let location = lat.zip(lng).map(|(lat, lng)| Coordinates::new(lat, lng));
            let mut controller = BookingController::new(&config, location);
            let event = controller.select_by_id(&therapist, &service)?;
            save_controller(&db, &controller)?;
            print_json(&event)?;
        }
        BookAction::Confirm => step(&db, |c| Ok(c.confirm()?))?,
        BookAction::Pay { method } => {
            let controller = load_controller(&db)?;
            if controller.stage() != BookingStage::SelectingPayment {
                return Err(BookingError::InvalidTransition {
                    stage: controller.stage(),
                    action: "choose a payment method",
                }
                .into());
            }
            let sim = Simulator::new(&config.simulation);
            let amount = controller.service().map_or(0.0, |s| s.price);
            if method == PaymentMethod::Card && !block_on(sim.authorize_payment(amount))? {
                return Err("payment was not authorized".into());
            }
            step(&db, |c| Ok(c.choose_payment(method)?))?;
        }
        BookAction::Status => {
            let mut controller = load_controller(&db)?;
            let events = controller.tick();
            print_json(&controller.snapshot())?;
            for event in events.iter().filter(|e| e.is_milestone()) {
                print_json(event)?;
            }
            save_controller(&db, &controller)?;
        }
        BookAction::Track => step(&db, |c| Ok(c.start_tracking()?))?,
        BookAction::Complete => step(&db, |c| {
            c.tick();
            Ok(c.complete()?)
        })?,
        BookAction::Review { rating, text } => step(&db, |c| Ok(c.submit_review(rating, &text)?))?,
        BookAction::Cancel => step(&db, |c| Ok(c.cancel()?))?,
        BookAction::Simulate {
            therapist,
            service,
            method,
            tick_ms,
            verbose,
        } => {
            let mut controller = BookingController::new(&config, None);
            controller.select_by_id(&therapist, &service)?;
            controller.confirm()?;
            let period = Duration::from_millis(tick_ms.max(1));
            block_on(simulate(controller, method, period, verbose))??;
        }
        BookAction::Group {
            name,
            kind,
            participants,
            therapists,
            duration,
            total,
            sharing,
        } => {
            if participants == 0 {
                return Err("a group needs at least one participant".into());
            }
            let per_person = if sharing == "split" {
                (total / f64::from(participants)).round()
            } else {
                total
            };
            let details = GroupBookingDetails {
                kind,
                participants,
                therapists,
                duration,
                sharing,
                total,
                per_person,
                group_name: name,
            };
            let handoffs = Handoffs::open()?;
            handoffs.put_group_booking(&details)?;
            let stored = handoffs
                .group_booking()?
                .ok_or("group booking handoff was not stored")?;
            print_json(&serde_json::json!({
                "details": stored,
                "whatsapp": stored.whatsapp_url(),
            }))?;
        }
    }
    Ok(())
}

/// Load, apply one command, print its event, save.
fn step<F>(db: &Database, f: F) -> CliResult
where
    F: FnOnce(&mut BookingController) -> Result<Event, Box<dyn std::error::Error>>,
{
    let mut controller = load_controller(db)?;
    let event = f(&mut controller)?;
    save_controller(db, &controller)?;
    print_json(&event)
}

async fn simulate(
    mut controller: BookingController,
    method: PaymentMethod,
    period: Duration,
    verbose: bool,
) -> CliResult {
    let clock = Clock::start();
    print_json_line(&controller.choose_payment_at(method, clock.now_ms())?)?;

    let controller = Arc::new(Mutex::new(controller));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let _ticker = Ticker::spawn(controller.clone(), clock, period, tx, None);

    // Events arrive in the order the controller produced them, so the
    // arrival itself is what ends the session.
    while let Some(event) = rx.recv().await {
        if verbose || event.is_milestone() {
            print_json_line(&event)?;
        }
        match event {
            Event::StageChanged {
                to: BookingStage::Confirmed,
                ..
            } => {
                let started = controller.lock().await.start_tracking_at(clock.now_ms())?;
                print_json_line(&started)?;
            }
            Event::TherapistArrived { .. } => {
                let mut c = controller.lock().await;
                print_json_line(&c.complete()?)?;
                print_json_line(&c.snapshot())?;
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_controller_without_booking_asks_for_start() {
        let db = Database::open_memory().unwrap();
        let err = load_controller(&db).unwrap_err();
        assert!(err.to_string().contains("book start"));
    }

    #[test]
    fn load_controller_reports_unreadable_state() {
        let db = Database::open_memory().unwrap();
        db.kv_set(CONTROLLER_KEY, "{\"stage\":").unwrap();
        let err = load_controller(&db).unwrap_err().to_string();
        assert!(err.contains("unreadable"), "{err}");
        assert!(!err.contains("no booking in progress"));
    }

    #[test]
    fn saved_controller_loads_back() {
        let db = Database::open_memory().unwrap();
        let mut c = BookingController::new(&Config::default(), None);
        c.select_by_id("1", "swedish").unwrap();
        save_controller(&db, &c).unwrap();
        let back = load_controller(&db).unwrap();
        assert_eq!(back.id(), c.id());
        assert_eq!(back.stage(), BookingStage::Reviewing);
    }
}
