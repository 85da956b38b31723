//! Price breakdowns and currency formatting.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::storage::PricingConfig;

/// Whole-rand amounts shown on a service card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base: f64,
    pub surged: f64,
    pub service_fee: f64,
    pub booking_fee: f64,
    pub vat: f64,
    pub total: f64,
    /// One decimal place.
    pub surge_multiplier: f64,
}

impl PriceBreakdown {
    /// Cards flag the surge once it passes 1.2x.
    pub fn shows_surge(&self) -> bool {
        self.surge_multiplier > 1.2
    }
}

/// Breakdown for `base` with a random surge in `surge_min..surge_max`.
pub fn calculate_service_price<R: Rng + ?Sized>(
    base: f64,
    config: &PricingConfig,
    rng: &mut R,
) -> PriceBreakdown {
    let multiplier = if config.surge_max > config.surge_min {
        rng.gen_range(config.surge_min..config.surge_max)
    } else {
        config.surge_min
    };
    price_with_surge(base, multiplier, config)
}

/// Breakdown for a known surge multiplier. The service fee is charged on
/// the base price, VAT on the surged subtotal.
pub fn price_with_surge(base: f64, multiplier: f64, config: &PricingConfig) -> PriceBreakdown {
    let service_fee = base * config.service_fee_rate;
    let surged = base * multiplier;
    let subtotal = surged + service_fee + config.booking_fee;
    let vat = subtotal * config.vat_rate;
    PriceBreakdown {
        base: base.round(),
        surged: surged.round(),
        service_fee: service_fee.round(),
        booking_fee: config.booking_fee.round(),
        vat: vat.round(),
        total: (subtotal + vat).round(),
        surge_multiplier: (multiplier * 10.0).round() / 10.0,
    }
}

/// Whole days between two instants, rounded up. Order does not matter.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds().abs();
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    (ms + DAY_MS - 1) / DAY_MS
}

/// Monthly price times started 30-day months.
pub fn rental_total(price_per_month: f64, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let days = rental_days(start, end);
    let months = (days + 29) / 30;
    price_per_month * months as f64
}

/// `R4 200`: whole rand, space-grouped thousands.
pub fn format_zar(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-R{grouped}")
    } else {
        format!("R{grouped}")
    }
}

/// `90` -> `1h 30m`, `45` -> `45m`
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
