use crate::booking::{Booking, BookingStatus, ServiceSummary, TherapistSummary};
use crate::geo::Coordinates;

const CLIENT_LOCATION: Coordinates = Coordinates::new(-26.1025, 28.0534);

fn james() -> TherapistSummary {
    TherapistSummary {
        id: "1".into(),
        name: "James Mbeki".into(),
        image: "/therapists/james-mbeki.jpg".into(),
        location: Coordinates::new(-26.1076, 28.0567),
        rating: 4.9,
        rate: 350.0,
    }
}

fn priya() -> TherapistSummary {
    TherapistSummary {
        id: "2".into(),
        name: "Priya Singh".into(),
        image: "/therapists/priya-singh.jpg".into(),
        location: Coordinates::new(-26.1076, 28.0567),
        rating: 4.9,
        rate: 350.0,
    }
}

fn swedish() -> ServiceSummary {
    ServiceSummary {
        name: "Swedish Massage".into(),
        duration: 90,
        price: 650.0,
    }
}

fn aromatherapy() -> ServiceSummary {
    ServiceSummary {
        name: "Aromatherapy Massage".into(),
        duration: 60,
        price: 500.0,
    }
}

#[allow(clippy::too_many_arguments)]
fn booking(
    id: &str,
    therapist: TherapistSummary,
    service: ServiceSummary,
    date: &str,
    start: &str,
    end: &str,
    status: BookingStatus,
    address: &str,
    user_location: Option<Coordinates>,
) -> Booking {
    Booking {
        id: id.into(),
        therapist,
        service,
        date: date.into(),
        start_time: start.into(),
        end_time: end.into(),
        status,
        address: address.into(),
        user_location,
    }
}

/// The bookings list shown on the client's "My Bookings" screen, one per status.
pub fn sample_bookings() -> Vec<Booking> {
    vec![
        booking("1", james(), swedish(), "2024-01-16", "16:30", "18:00",
            BookingStatus::InProgress, "Your Office - Sandton", Some(CLIENT_LOCATION)),
        booking("2", priya(), aromatherapy(), "2024-01-18", "11:00", "12:00",
            BookingStatus::Upcoming, "Your Location - Home", Some(CLIENT_LOCATION)),
        booking("3", priya(), aromatherapy(), "2024-01-18", "", "",
            BookingStatus::TherapistEnRoute, "Your Location - Home", Some(CLIENT_LOCATION)),
        booking("4", james(), swedish(), "2024-01-16", "16:30", "18:00",
            BookingStatus::Completed, "Your Office - Sandton", None),
    ]
}
