use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use massage2go_core::catalog::{service_by_id, unit_by_id};
use massage2go_core::pricing::{
    calculate_service_price, format_duration, format_zar, price_with_surge, rental_days,
    rental_total,
};
use massage2go_core::Config;
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum PriceAction {
    /// Price breakdown for a service
    Service {
        /// Service id (e.g. "swedish")
        id: String,
        /// Fix the surge multiplier instead of drawing one
        #[arg(long)]
        surge: Option<f64>,
    },
    /// Rental total for a storage unit
    Rental {
        /// Unit id
        unit: String,
        /// Start date, YYYY-MM-DD
        start: NaiveDate,
        /// End date, YYYY-MM-DD
        end: NaiveDate,
    },
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub fn run(action: PriceAction) -> CliResult {
    let config = Config::load_or_default();
    match action {
        PriceAction::Service { id, surge } => {
            let service = service_by_id(&id).ok_or_else(|| format!("unknown service: {id}"))?;
            let breakdown = match surge {
                Some(multiplier) => price_with_surge(service.price, multiplier, &config.pricing),
                None => {
                    calculate_service_price(service.price, &config.pricing, &mut rand::thread_rng())
                }
            };
            print_json(&json!({
                "service": service.name,
                "duration": format_duration(service.duration),
                "breakdown": breakdown,
                "total": format_zar(breakdown.total),
            }))?;
        }
        PriceAction::Rental { unit, start, end } => {
            let unit = unit_by_id(&unit).ok_or_else(|| format!("unknown unit: {unit}"))?;
            let (start, end) = (midnight(start), midnight(end));
            let total = rental_total(unit.price, start, end);
            print_json(&json!({
                "unit": unit.name,
                "days": rental_days(start, end),
                "monthly": format_zar(unit.price),
                "total": total,
                "formatted": format_zar(total),
            }))?;
        }
    }
    Ok(())
}
