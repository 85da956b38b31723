//! # Massage2GO Core Library
//!
//! This library provides the business logic behind the Massage2GO on-demand
//! massage booking app. Every operation is available through the standalone
//! CLI; a front-end would be a thin layer over the same types.
//!
//! ## Architecture
//!
//! - **Booking**: A wall-clock-based stage controller that requires the caller
//!   to periodically invoke `tick()` while payment processes and the therapist
//!   travels
//! - **Catalog**: Static mock tables (services, therapists, devices, cameras,
//!   storage units) rebuilt on every call
//! - **Session**: Mock sign-in/sign-up backed by the local key-value store
//! - **Storage**: SQLite key-value stores and TOML configuration
//! - **Sim**: Simulated hardware and payment operations plus a tokio ticker
//!
//! ## Key Components
//!
//! - [`BookingController`]: Booking stage state machine
//! - [`Session`]: Current user, persisted under `dam-safe-user`
//! - [`Database`]: Local and session key-value stores
//! - [`Config`]: Application configuration management
//! - [`Ticker`]: Drives a controller in real time

pub mod booking;
pub mod catalog;
pub mod error;
pub mod events;
pub mod geo;
pub mod handoff;
pub mod pricing;
pub mod session;
pub mod sim;
pub mod storage;
pub mod wallet;

pub use booking::{BookingController, BookingStage, BookingStatus};
pub use error::{BookingError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use geo::Coordinates;
pub use handoff::{ConfirmationParams, Handoffs};
pub use session::{Session, SignUpFlow, SignUpForm, User, UserType};
pub use sim::{Clock, GatePanel, Simulator, Ticker};
pub use storage::{Config, Database};
pub use wallet::{PaymentMethod, Wallet};
