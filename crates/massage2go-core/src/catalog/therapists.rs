use serde::{Deserialize, Serialize};

use super::services::{massage_services, MassageService, ServiceCategory, ServiceType};
use crate::error::ValidationError;
use crate::geo::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verification {
    Verified,
    Pending,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Therapist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub address: String,
    pub location: Coordinates,
    pub price: f64,
    pub specialty: String,
    pub gender: Gender,
    pub rating: Option<f64>,
    pub reviews: u32,
    /// Years of practice.
    pub experience: u32,
    pub verification: Verification,
    /// Typical response time in minutes.
    pub response_time: u32,
    /// Kilometres, as listed (not computed).
    pub distance: f64,
    pub availability: Option<String>,
    pub languages: Vec<String>,
    pub image: String,
    pub services: Vec<MassageService>,
}

impl Therapist {
    /// "Book Now" is only enabled for therapists offering at least one service.
    pub fn is_bookable(&self) -> bool {
        !self.services.is_empty()
    }

    pub fn offers(&self, service_type: ServiceType) -> bool {
        self.services.iter().any(|s| s.service_type == service_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderPreference {
    #[default]
    Any,
    Male,
    Female,
}

impl GenderPreference {
    fn accepts(self, gender: Gender) -> bool {
        match self {
            GenderPreference::Any => true,
            GenderPreference::Male => gender == Gender::Male,
            GenderPreference::Female => gender == Gender::Female,
        }
    }
}

impl std::str::FromStr for GenderPreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "any" => Ok(GenderPreference::Any),
            "male" => Ok(GenderPreference::Male),
            "female" => Ok(GenderPreference::Female),
            other => Err(ValidationError::InvalidValue {
                field: "gender",
                message: format!("unknown gender preference '{other}' (expected any, male or female)"),
            }),
        }
    }
}

/// Browse-screen filters. `None` on a field means "all".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub service_type: Option<ServiceType>,
    pub max_price: f64,
    pub rating: f64,
    pub gender_preference: GenderPreference,
    pub available_now: bool,
    pub category: Option<ServiceCategory>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            service_type: None,
            max_price: 1000.0,
            rating: 0.0,
            gender_preference: GenderPreference::Any,
            available_now: false,
            category: None,
        }
    }
}

impl FilterOptions {
    /// Whether `therapist` passes every filter and the free-text search.
    ///
    /// The price filter passes when any offered service costs at most
    /// `max_price`, so a therapist without services never passes it.
    /// Any availability string counts as "available now".
    pub fn matches(&self, therapist: &Therapist, search: &str) -> bool {
        let needle = search.to_lowercase();
        let matches_search = needle.is_empty()
            || therapist.name.to_lowercase().contains(&needle)
            || therapist.specialty.to_lowercase().contains(&needle)
            || therapist
                .services
                .iter()
                .any(|s| s.name.to_lowercase().contains(&needle));

        let matches_service = self.service_type.map_or(true, |t| therapist.offers(t));
        let matches_category = self
            .category
            .map_or(true, |c| therapist.services.iter().any(|s| s.category == c));
        let matches_price = therapist.services.iter().any(|s| s.price <= self.max_price);
        let matches_rating = therapist.rating.is_some_and(|r| r >= self.rating);
        let matches_gender = self.gender_preference.accepts(therapist.gender);
        let matches_availability = !self.available_now || therapist.availability.is_some();

        matches_search
            && matches_service
            && matches_category
            && matches_price
            && matches_rating
            && matches_gender
            && matches_availability
    }
}

#[allow(clippy::too_many_arguments)]
fn therapist(
    id: &str,
    name: &str,
    address: &str,
    rating: f64,
    reviews: u32,
    specialty: &str,
    experience: u32,
    gender: Gender,
    location: Coordinates,
    service_idx: &[usize],
    verification: Verification,
    languages: &[&str],
    description: &str,
    response_time: u32,
    price: f64,
    distance: f64,
    availability: &str,
) -> Therapist {
    let menu = massage_services();
    Therapist {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        address: address.into(),
        location,
        price,
        specialty: specialty.into(),
        gender,
        rating: Some(rating),
        reviews,
        experience,
        verification,
        response_time,
        distance,
        availability: Some(availability.into()),
        languages: languages.iter().map(|l| l.to_string()).collect(),
        image: format!("/therapists/{}.jpg", name.to_lowercase().replace(' ', "-")),
        services: service_idx.iter().filter_map(|&i| menu.get(i).cloned()).collect(),
    }
}

/// The fixed therapist roster.
pub fn therapists() -> Vec<Therapist> {
    use Gender::*;
    vec![
        therapist("1", "Sarah Johnson", "Sandton, Johannesburg", 4.9, 127,
            "Deep Tissue & Sports Therapy", 8, Female, Coordinates::new(-26.1076, 28.0567),
            &[0, 1, 2, 5], Verification::Verified, &["English", "Zulu"],
            "Certified therapeutic massage specialist with 8 years of experience helping clients recover from injuries and manage chronic pain.",
            15, 550.0, 15.0, "Available Today"),
        therapist("2", "James Mbeki", "Rivonia, Johannesburg", 4.7, 89,
            "Swedish & Relaxation Therapy", 5, Male, Coordinates::new(-26.1076, 28.0567),
            &[0, 4, 5, 6], Verification::Verified, &["English", "Xhosa", "Zulu"],
            "Focused on creating peaceful, relaxing experiences to help clients unwind from daily stress.",
            10, 650.0, 37.0, "Available Today"),
        therapist("3", "Priya Singh", "Rosebank, Johannesburg", 4.8, 203,
            "Prenatal & Wellness Massage", 10, Female, Coordinates::new(-26.1352, 28.0330),
            &[0, 3, 5, 6], Verification::Verified, &["English", "Hindi"],
            "Specialized in prenatal and women's wellness with a gentle, nurturing approach.",
            25, 980.0, 0.5, "Available Today"),
        therapist("4", "David van Niekerk", "Parktown, Johannesburg", 4.6, 67,
            "Sports & Deep Tissue", 6, Male, Coordinates::new(-26.1634, 28.0262),
            &[1, 2, 6], Verification::Pending, &["English", "Afrikaans"],
            "Former athlete turned massage therapist, specializing in sports recovery and performance enhancement.",
            20, 850.0, 1.2, "Available Tomorrow"),
        therapist("5", "Lerato Ndlovu", "Soweto, Johannesburg", 4.9, 156,
            "Traditional & Modern Techniques", 7, Female, Coordinates::new(-26.1864, 28.0126),
            &[0, 1, 5, 6], Verification::Verified, &["English", "Zulu", "Sotho"],
            "Blending traditional African massage techniques with modern therapeutic approaches.",
            5, 650.0, 3.0, "Available Tomorrow"),
    ]
}

pub fn therapist_by_id(id: &str) -> Option<Therapist> {
    therapists().into_iter().find(|t| t.id == id)
}

pub fn therapists_by_service_type(service_type: ServiceType) -> Vec<Therapist> {
    therapists()
        .into_iter()
        .filter(|t| t.offers(service_type))
        .collect()
}

pub fn available_therapists() -> Vec<Therapist> {
    therapists()
        .into_iter()
        .filter(|t| t.availability.is_some())
        .collect()
}

pub fn filter_therapists(filters: &FilterOptions, search: &str) -> Vec<Therapist> {
    therapists()
        .into_iter()
        .filter(|t| filters.matches(t, search))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_is_bookable() {
        let all = therapists();
        assert_eq!(all.len(), 5);
        assert!(all.iter().all(Therapist::is_bookable));
        assert_eq!(all[3].services.len(), 3);
        assert_eq!(all[0].image, "/therapists/sarah-johnson.jpg");
    }

    #[test]
    fn therapist_without_services_is_not_bookable() {
        let mut t = therapist_by_id("2").unwrap();
        t.services.clear();
        assert!(!t.is_bookable());
    }

    #[test]
    fn prenatal_is_only_offered_by_priya() {
        let found = therapists_by_service_type(ServiceType::Prenatal);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Priya Singh");
    }

    #[test]
    fn default_filters_match_everyone() {
        assert_eq!(filter_therapists(&FilterOptions::default(), "").len(), 5);
        assert_eq!(available_therapists().len(), 5);
    }

    #[test]
    fn search_is_case_insensitive_over_services() {
        let hits = filter_therapists(&FilterOptions::default(), "COUPLES");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
    }

    #[test]
    fn gender_rating_and_price_filters() {
        let filters = FilterOptions {
            gender_preference: GenderPreference::Male,
            rating: 4.65,
            ..FilterOptions::default()
        };
        let ids: Vec<_> = filter_therapists(&filters, "").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["2"]);

        let cheap = FilterOptions {
            max_price: 299.0,
            ..FilterOptions::default()
        };
        assert!(filter_therapists(&cheap, "").is_empty());
    }

    #[test]
    fn category_filter() {
        let filters = FilterOptions {
            category: Some(ServiceCategory::Specialized),
            ..FilterOptions::default()
        };
        let ids: Vec<_> = filter_therapists(&filters, "").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["3"]);
    }

    #[test]
    fn unrated_therapist_fails_rating_filter() {
        let mut t = therapist_by_id("1").unwrap();
        t.rating = None;
        assert!(!FilterOptions::default().matches(&t, ""));
    }
}
