use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{MassageService, Therapist};
use crate::geo::Coordinates;

/// Status shown on a booking card. Not the same thing as
/// [`super::BookingStage`]: a stage belongs to one in-flight booking
/// attempt, a status to a booking in the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Upcoming,
    InProgress,
    Completed,
    TherapistEnRoute,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TherapistSummary {
    pub id: String,
    pub name: String,
    pub image: String,
    pub location: Coordinates,
    pub rating: f64,
    pub rate: f64,
}

impl From<&Therapist> for TherapistSummary {
    fn from(t: &Therapist) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            image: t.image.clone(),
            location: t.location,
            rating: t.rating.unwrap_or_default(),
            rate: t.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub name: String,
    /// Minutes.
    pub duration: u32,
    pub price: f64,
}

impl From<&MassageService> for ServiceSummary {
    fn from(s: &MassageService) -> Self {
        Self {
            name: s.name.clone(),
            duration: s.duration,
            price: s.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub therapist: TherapistSummary,
    pub service: ServiceSummary,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, empty when not yet scheduled.
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    pub address: String,
    pub user_location: Option<Coordinates>,
}

impl Booking {
    /// Booking card for a session starting at `start`.
    pub fn scheduled(
        id: impl Into<String>,
        therapist: &Therapist,
        service: &MassageService,
        start: DateTime<Utc>,
        status: BookingStatus,
        address: impl Into<String>,
        user_location: Option<Coordinates>,
    ) -> Self {
        let end = start + Duration::minutes(i64::from(service.duration));
        Self {
            id: id.into(),
            therapist: therapist.into(),
            service: service.into(),
            date: start.format("%Y-%m-%d").to_string(),
            start_time: start.format("%H:%M").to_string(),
            end_time: end.format("%H:%M").to_string(),
            status,
            address: address.into(),
            user_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{service_by_id, therapist_by_id};
    use chrono::TimeZone;

    #[test]
    fn scheduled_booking_spans_service_duration() {
        let t = therapist_by_id("3").unwrap();
        let s = service_by_id("couples").unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 18, 11, 0, 0).unwrap();
        let b = Booking::scheduled("b1", &t, &s, start, BookingStatus::Upcoming, "Home", None);
        assert_eq!(b.date, "2024-01-18");
        assert_eq!(b.start_time, "11:00");
        assert_eq!(b.end_time, "12:30");
        assert_eq!(b.therapist.name, "Priya Singh");
        assert_eq!(b.service.price, 700.0);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&BookingStatus::TherapistEnRoute).unwrap();
        assert_eq!(json, "\"therapist-en-route\"");
        let back: BookingStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, BookingStatus::InProgress);
    }

    #[test]
    fn sample_list_has_one_booking_per_status() {
        let list = crate::catalog::sample_bookings();
        for status in [
            BookingStatus::Upcoming,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::TherapistEnRoute,
        ] {
            assert_eq!(list.iter().filter(|b| b.status == status).count(), 1);
        }
    }
}
