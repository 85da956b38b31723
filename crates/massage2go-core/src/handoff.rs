//! Page-to-page handoffs.
//!
//! State travels between independently rendered screens in two ways: JSON
//! blobs in the per-tab session store, and plain URL query parameters. Neither
//! is a versioned contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::Database;

pub const GROUP_BOOKING_KEY: &str = "groupBookingDetails";
pub const CURRENT_SESSION_KEY: &str = "currentSession";

/// Query parameters carried to the processing and confirmation screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationParams {
    pub therapist: String,
    pub service: String,
    pub price: String,
    pub duration: String,
    pub image: Option<String>,
}

impl Default for ConfirmationParams {
    /// What the processing screen shows when a parameter is missing.
    fn default() -> Self {
        Self {
            therapist: "Massage Therapist".into(),
            service: "Relaxation Massage".into(),
            price: "350".into(),
            duration: "60 minutes".into(),
            image: None,
        }
    }
}

impl ConfirmationParams {
    pub fn to_query(&self) -> String {
        let mut q = url::form_urlencoded::Serializer::new(String::new());
        q.append_pair("therapist", &self.therapist)
            .append_pair("service", &self.service)
            .append_pair("price", &self.price)
            .append_pair("duration", &self.duration);
        if let Some(image) = &self.image {
            q.append_pair("image", image);
        }
        q.finish()
    }

    /// Parse a query string (with or without leading `?`). Unknown keys are
    /// ignored and missing ones take the screen defaults.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "therapist" => params.therapist = value.into_owned(),
                "service" => params.service = value.into_owned(),
                "price" => params.price = value.into_owned(),
                "duration" => params.duration = value.into_owned(),
                "image" => params.image = Some(value.into_owned()),
                _ => {}
            }
        }
        params
    }

    /// `path?query`
    pub fn href(&self, path: &str) -> String {
        format!("{path}?{}", self.to_query())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBookingDetails {
    #[serde(rename = "type")]
    pub kind: String,
    pub participants: u32,
    pub therapists: u32,
    /// Hours.
    pub duration: u32,
    pub sharing: String,
    pub total: f64,
    pub per_person: f64,
    pub group_name: String,
}

impl GroupBookingDetails {
    /// Invitation text for sharing with the group.
    pub fn share_message(&self) -> String {
        format!(
            "Join me for a group massage session!\n\n{}\n{} people\n{} hour session\n{} therapists\nR{} per person\n\nLet me know if you can make it!",
            self.group_name, self.participants, self.duration, self.therapists, self.per_person
        )
    }

    pub fn whatsapp_url(&self) -> String {
        format!("https://wa.me/?text={}", urlencoding::encode(&self.share_message()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    InProgress,
    Arrived,
}

/// Therapist-side view of the session they are travelling to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSession {
    pub id: String,
    pub client_name: String,
    pub client_image: String,
    pub service: String,
    pub duration: u32,
    pub price: f64,
    pub date: DateTime<Utc>,
    pub location: String,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub estimated_arrival: DateTime<Utc>,
}

/// Session-scope store for handoff blobs.
pub struct Handoffs {
    db: Database,
}

impl Handoffs {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Fresh in-memory store, like opening a new tab.
    pub fn open() -> Result<Self> {
        Ok(Self::new(Database::open_memory()?))
    }

    pub fn put_group_booking(&self, details: &GroupBookingDetails) -> Result<()> {
        self.db.put_json(GROUP_BOOKING_KEY, details)
    }

    /// `None` means the confirmation screen should redirect home.
    pub fn group_booking(&self) -> Result<Option<GroupBookingDetails>> {
        self.db.get_json(GROUP_BOOKING_KEY)
    }

    pub fn put_current_session(&self, session: &CurrentSession) -> Result<()> {
        self.db.put_json(CURRENT_SESSION_KEY, session)
    }

    pub fn current_session(&self) -> Result<Option<CurrentSession>> {
        self.db.get_json(CURRENT_SESSION_KEY)
    }

    /// Mark the stored session as arrived. Returns the updated session, or
    /// `None` when there is nothing stored.
    pub fn mark_arrived(&self) -> Result<Option<CurrentSession>> {
        let Some(mut session) = self.current_session()? else {
            return Ok(None);
        };
        session.status = SessionStatus::Arrived;
        self.put_current_session(&session)?;
        tracing::info!(session_id = %session.id, "therapist marked arrived");
        Ok(Some(session))
    }
}
