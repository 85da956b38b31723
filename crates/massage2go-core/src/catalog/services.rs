use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Swedish,
    DeepTissue,
    Sports,
    Prenatal,
    Couples,
    Aromatherapy,
    Reflexology,
}

impl ServiceType {
    pub const ALL: [ServiceType; 7] = [
        ServiceType::Swedish,
        ServiceType::DeepTissue,
        ServiceType::Sports,
        ServiceType::Prenatal,
        ServiceType::Couples,
        ServiceType::Aromatherapy,
        ServiceType::Reflexology,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Swedish => "swedish",
            ServiceType::DeepTissue => "deep-tissue",
            ServiceType::Sports => "sports",
            ServiceType::Prenatal => "prenatal",
            ServiceType::Couples => "couples",
            ServiceType::Aromatherapy => "aromatherapy",
            ServiceType::Reflexology => "reflexology",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "service type",
                message: format!("unknown service type '{s}'"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Relaxation,
    Therapeutic,
    Specialized,
}

impl FromStr for ServiceCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relaxation" => Ok(ServiceCategory::Relaxation),
            "therapeutic" => Ok(ServiceCategory::Therapeutic),
            "specialized" => Ok(ServiceCategory::Specialized),
            other => Err(ValidationError::InvalidValue {
                field: "category",
                message: format!("unknown category '{other}'"),
            }),
        }
    }
}

/// A bookable massage treatment. Prices are in rand (ZAR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassageService {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    /// Minutes.
    pub duration: u32,
    pub price: f64,
    pub description: String,
    pub category: ServiceCategory,
}

impl MassageService {
    /// Build a service, rejecting empty ids, zero durations and negative prices.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        service_type: ServiceType,
        duration: u32,
        price: f64,
        description: impl Into<String>,
        category: ServiceCategory,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "id" });
        }
        if duration == 0 {
            return Err(ValidationError::InvalidValue {
                field: "duration",
                message: "duration must be greater than zero".into(),
            });
        }
        if !price.is_finite() || price < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "price",
                message: format!("price must be a non-negative amount, got {price}"),
            });
        }
        Ok(Self {
            id,
            name: name.into(),
            service_type,
            duration,
            price,
            description: description.into(),
            category,
        })
    }
}

fn entry(
    id: &str,
    name: &str,
    service_type: ServiceType,
    duration: u32,
    price: f64,
    description: &str,
    category: ServiceCategory,
) -> MassageService {
    MassageService {
        id: id.into(),
        name: name.into(),
        service_type,
        duration,
        price,
        description: description.into(),
        category,
    }
}

/// The fixed service menu.
pub fn massage_services() -> Vec<MassageService> {
    use ServiceCategory::*;
    vec![
        entry("swedish", "Swedish Massage", ServiceType::Swedish, 60, 350.0,
            "Relaxing full-body massage with long, flowing strokes", Relaxation),
        entry("deep-tissue", "Deep Tissue", ServiceType::DeepTissue, 60, 450.0,
            "Targeted pressure for chronic pain and muscle tension", Therapeutic),
        entry("sports-massage", "Sports Massage", ServiceType::Sports, 60, 500.0,
            "Enhances athletic performance and aids recovery", Therapeutic),
        entry("prenatal", "Prenatal Massage", ServiceType::Prenatal, 50, 400.0,
            "Specialized massage for expecting mothers", Specialized),
        entry("couples", "Couples Massage", ServiceType::Couples, 90, 700.0,
            "Side-by-side massage experience for two people", Relaxation),
        entry("aromatherapy", "Aromatherapy", ServiceType::Aromatherapy, 60, 420.0,
            "Combines massage with essential oils for enhanced relaxation", Relaxation),
        entry("reflexology", "Reflexology", ServiceType::Reflexology, 45, 300.0,
            "Foot massage targeting pressure points for whole-body benefits", Therapeutic),
    ]
}

pub fn service_by_id(id: &str) -> Option<MassageService> {
    massage_services().into_iter().find(|s| s.id == id)
}
