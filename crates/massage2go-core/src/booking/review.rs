use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BookingError;

/// Post-session rating. There is nowhere to send it; submission is logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

impl Review {
    pub fn new(rating: u8, text: impl Into<String>) -> Result<Self, BookingError> {
        if !(1..=5).contains(&rating) {
            return Err(BookingError::InvalidRating(rating));
        }
        Ok(Self {
            rating,
            text: text.into().trim().to_string(),
            submitted_at: Utc::now(),
        })
    }
}
