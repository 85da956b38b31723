use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStage {
    Browsing,
    /// Booking-request sheet shown for the chosen therapist and service.
    Reviewing,
    SelectingPayment,
    /// Payment timers running.
    Processing,
    Confirmed,
    EnRoute,
    Completed,
    Cancelled,
}

impl BookingStage {
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStage::Completed | BookingStage::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStage::Browsing => "browsing",
            BookingStage::Reviewing => "reviewing",
            BookingStage::SelectingPayment => "selecting-payment",
            BookingStage::Processing => "processing",
            BookingStage::Confirmed => "confirmed",
            BookingStage::EnRoute => "en-route",
            BookingStage::Completed => "completed",
            BookingStage::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_display() {
        for stage in [
            BookingStage::Browsing,
            BookingStage::SelectingPayment,
            BookingStage::EnRoute,
            BookingStage::Cancelled,
        ] {
            let json = serde_json::to_string(&stage).unwrap();
            assert_eq!(json, format!("\"{stage}\""));
        }
    }

    #[test]
    fn terminal_stages() {
        assert!(BookingStage::Completed.is_terminal());
        assert!(BookingStage::Cancelled.is_terminal());
        assert!(!BookingStage::EnRoute.is_terminal());
    }
}
