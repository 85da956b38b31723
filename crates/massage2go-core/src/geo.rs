//! Coordinates and the simple distance math used by the tracker.
//!
//! None of this is real routing. The en-route tracker moves along a
//! straight line, and the fallback estimate scales the great-circle
//! distance by a fixed road factor.

use serde::{Deserialize, Serialize};

/// Earth's mean radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Fixed coordinate used when geolocation is denied or unavailable
/// (Sandton, Johannesburg).
pub const FALLBACK_LOCATION: Coordinates = Coordinates {
    lat: -26.1076,
    lng: 28.0567,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance in kilometres (haversine).
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lng = (other.lng - self.lng).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Point at `t` (clamped to 0.0..=1.0) along the straight line to `to`.
    /// The endpoints are returned exactly.
    pub fn lerp(&self, to: &Coordinates, t: f64) -> Coordinates {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *to;
        }
        Coordinates {
            lat: self.lat + (to.lat - self.lat) * t,
            lng: self.lng + (to.lng - self.lng) * t,
        }
    }
}

/// Resolve a user location, substituting the fallback when none is known.
///
/// Mirrors geolocation denial: the caller is not told a fallback happened,
/// only the log is.
pub fn resolve_location(located: Option<Coordinates>, fallback: Coordinates) -> Coordinates {
    match located {
        Some(c) => c,
        None => {
            tracing::warn!(
                lat = fallback.lat,
                lng = fallback.lng,
                "geolocation unavailable, using fallback"
            );
            fallback
        }
    }
}

/// Road estimate used when the mapping provider cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// Straight-line distance times `road_factor`, driven at `avg_speed_kmh`.
pub fn fallback_route(
    from: &Coordinates,
    to: &Coordinates,
    road_factor: f64,
    avg_speed_kmh: f64,
) -> RouteEstimate {
    let distance_km = from.distance_km(to) * road_factor;
    let duration_min = if avg_speed_kmh > 0.0 {
        distance_km / avg_speed_kmh * 60.0
    } else {
        0.0
    };
    RouteEstimate {
        distance_km,
        duration_min,
    }
}
