//! Mock data providers.
//!
//! Every table is rebuilt from literals on each call; nothing is cached
//! and nothing is ever mutated in place.

mod bookings;
mod cameras;
mod devices;
mod services;
mod therapists;
mod units;

pub use bookings::sample_bookings;
pub use cameras::{camera_status_text, mock_cameras, Camera, CameraStatus, PLACEHOLDER_STREAM};
pub use devices::{
    device_by_id, mock_access_logs, mock_devices, AccessLog, BluetoothDevice, DeviceType,
    GateCommand, SignalStrength,
};
pub use services::{massage_services, service_by_id, MassageService, ServiceCategory, ServiceType};
pub use therapists::{
    available_therapists, filter_therapists, therapist_by_id, therapists,
    therapists_by_service_type, FilterOptions, Gender, GenderPreference, Therapist, Verification,
};
pub use units::{storage_units, unit_by_id, units_by_type, PriceUnit, StorageUnit, UnitType};
