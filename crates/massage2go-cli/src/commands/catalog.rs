use chrono::Utc;
use clap::Subcommand;
use massage2go_core::catalog::{
    camera_status_text, filter_therapists, massage_services, mock_cameras, sample_bookings,
    service_by_id, therapist_by_id, units_by_type, FilterOptions, GenderPreference,
    ServiceCategory, ServiceType, UnitType,
};
use serde_json::json;

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List the service menu
    Services,
    /// Show one service
    Service { id: String },
    /// Search and filter therapists
    Therapists {
        /// Matches name, specialty or any service name
        #[arg(long, default_value = "")]
        search: String,
        /// Service type (e.g. "deep-tissue")
        #[arg(long = "type")]
        service_type: Option<ServiceType>,
        /// Service category
        #[arg(long)]
        category: Option<ServiceCategory>,
        /// Keep therapists with at least one service at or below this price
        #[arg(long, default_value_t = 1000.0)]
        max_price: f64,
        /// Minimum rating
        #[arg(long, default_value_t = 0.0)]
        rating: f64,
        /// any, female or male
        #[arg(long, default_value = "any")]
        gender: GenderPreference,
        /// Only therapists with an availability note
        #[arg(long)]
        available_now: bool,
    },
    /// Show one therapist
    Therapist { id: String },
    /// Storage units, optionally of one type
    Units {
        #[arg(long = "type")]
        unit_type: Option<UnitType>,
    },
    /// Security cameras with their status text
    Cameras,
    /// The sample bookings list
    Bookings,
}

pub fn run(action: CatalogAction) -> CliResult {
    match action {
        CatalogAction::Services => print_json(&massage_services())?,
        CatalogAction::Service { id } => {
            let service = service_by_id(&id).ok_or_else(|| format!("unknown service: {id}"))?;
            print_json(&service)?;
        }
        CatalogAction::Therapists {
            search,
            service_type,
            category,
            max_price,
            rating,
            gender,
            available_now,
        } => {
            let filters = FilterOptions {
                service_type,
                max_price,
                rating,
                gender_preference: gender,
                available_now,
                category,
            };
            print_json(&filter_therapists(&filters, &search))?;
        }
        CatalogAction::Therapist { id } => {
            let therapist = therapist_by_id(&id).ok_or_else(|| format!("unknown therapist: {id}"))?;
            print_json(&therapist)?;
        }
        CatalogAction::Units { unit_type } => print_json(&units_by_type(unit_type))?,
        CatalogAction::Cameras => {
            let cameras: Vec<_> = mock_cameras(Utc::now())
                .into_iter()
                .map(|c| {
                    json!({
                        "id": c.id,
                        "name": c.name,
                        "location": c.location,
                        "status": camera_status_text(c.status),
                        "stream": c.display_stream(),
                    })
                })
                .collect();
            print_json(&cameras)?;
        }
        CatalogAction::Bookings => print_json(&sample_bookings())?,
    }
    Ok(())
}
