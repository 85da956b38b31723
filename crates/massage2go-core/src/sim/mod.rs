//! Real-time drivers: simulated async operations and the booking ticker.

mod ops;
mod ticker;

pub use ops::{GatePanel, GateStatus, Simulator};
pub use ticker::{ArrivalCallback, Clock, Ticker};
