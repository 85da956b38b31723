//! Self-storage rental demo inventory.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    Container,
    Vehicle,
    Boat,
    Lockbox,
}

impl UnitType {
    pub const ALL: [UnitType; 4] = [
        UnitType::Container,
        UnitType::Vehicle,
        UnitType::Boat,
        UnitType::Lockbox,
    ];

    /// Plural label used by the type picker.
    pub fn label(self) -> &'static str {
        match self {
            UnitType::Container => "Containers",
            UnitType::Vehicle => "Vehicles",
            UnitType::Boat => "Boats",
            UnitType::Lockbox => "Lockboxes",
        }
    }
}

impl FromStr for UnitType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "container" => Ok(UnitType::Container),
            "vehicle" => Ok(UnitType::Vehicle),
            "boat" => Ok(UnitType::Boat),
            "lockbox" => Ok(UnitType::Lockbox),
            other => Err(ValidationError::InvalidValue {
                field: "unit type",
                message: format!("unknown unit type '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceUnit {
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUnit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub size: String,
    pub price: f64,
    pub price_unit: PriceUnit,
    pub available: bool,
    pub features: Vec<String>,
    pub image: String,
    pub description: String,
}

#[allow(clippy::too_many_arguments)]
fn unit(
    id: &str,
    name: &str,
    unit_type: UnitType,
    size: &str,
    price: f64,
    available: bool,
    features: &[&str],
    image: &str,
    description: &str,
) -> StorageUnit {
    StorageUnit {
        id: id.into(),
        name: name.into(),
        unit_type,
        size: size.into(),
        price,
        price_unit: PriceUnit::Month,
        available,
        features: features.iter().map(|f| f.to_string()).collect(),
        image: image.into(),
        description: description.into(),
    }
}

pub fn storage_units() -> Vec<StorageUnit> {
    use UnitType::*;
    vec![
        unit("1", "Small Container Unit", Container, "2m x 2m", 850.0, true,
            &["24/7 Access", "Climate Controlled", "Security Cameras"],
            "/small-storage-container-unit.jpg", "Perfect for personal items and small furniture"),
        unit("2", "Medium Container Unit", Container, "3m x 3m", 1250.0, true,
            &["24/7 Access", "Climate Controlled", "Security Cameras", "Drive-up Access"],
            "/medium-storage-container-unit.jpg", "Ideal for household items and business inventory"),
        unit("3", "Large Container Unit", Container, "6m x 3m", 2100.0, true,
            &["24/7 Access", "Climate Controlled", "Security Cameras", "Drive-up Access", "Loading Bay"],
            "/large-storage-container-unit.jpg", "Great for moving, renovations, or business storage"),
        unit("4", "Vehicle Storage Bay", Vehicle, "5m x 3m", 1800.0, true,
            &["Covered Parking", "Security Cameras", "Easy Access", "Wash Bay"],
            "/covered-vehicle-storage-bay.jpg", "Secure covered storage for cars, motorcycles, and more"),
        unit("5", "Boat Storage", Boat, "8m x 4m", 2500.0, true,
            &["Covered Storage", "Security Cameras", "Trailer Parking", "Wash Bay"],
            "/boat-storage-facility.jpg", "Protected storage for boats and watercraft"),
        unit("6", "Premium Lockbox", Lockbox, "0.5m x 0.5m", 350.0, true,
            &["Climate Controlled", "24/7 Access", "High Security", "Insurance Available"],
            "/secure-lockbox-storage.jpg", "Secure storage for valuables and important documents"),
        unit("7", "Vehicle Storage Open", Vehicle, "5m x 3m", 1200.0, false,
            &["Open Parking", "Security Cameras", "Fenced Perimeter"],
            "/open-vehicle-parking-storage.jpg", "Affordable open-air vehicle storage"),
        unit("8", "Extra Large Container", Container, "12m x 3m", 3500.0, true,
            &["24/7 Access", "Climate Controlled", "Security Cameras", "Drive-up Access", "Loading Bay", "Forklift Access"],
            "/extra-large-storage-container.jpg", "Maximum space for commercial or large-scale storage needs"),
    ]
}

pub fn unit_by_id(id: &str) -> Option<StorageUnit> {
    storage_units().into_iter().find(|u| u.id == id)
}

/// `None` lists every type ("All Types").
pub fn units_by_type(unit_type: Option<UnitType>) -> Vec<StorageUnit> {
    storage_units()
        .into_iter()
        .filter(|u| unit_type.map_or(true, |t| u.unit_type == t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_by_type() {
        assert_eq!(units_by_type(None).len(), 8);
        assert_eq!(units_by_type(Some(UnitType::Container)).len(), 4);
        assert_eq!(units_by_type(Some(UnitType::Vehicle)).len(), 2);
        assert_eq!(units_by_type(Some(UnitType::Boat)).len(), 1);
    }

    #[test]
    fn open_vehicle_bay_is_unavailable() {
        assert!(!unit_by_id("7").unwrap().available);
        assert_eq!(UnitType::Lockbox.label(), "Lockboxes");
    }
}
