//! Signed-in user session.
//!
//! Authentication is mocked: any credentials are accepted after the
//! configured delay. The user lives in the local store under
//! [`USER_KEY`] so it survives restarts.

mod signup;

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub use signup::{SignUpFlow, SignUpForm, SignUpStage, VerificationMethod, MIN_PASSWORD_LEN};

use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::storage::{Database, SimulationConfig};

pub const USER_KEY: &str = "dam-safe-user";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Client,
    Therapist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub user_type: UserType,
}

/// The display name derived from an email address.
fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

pub struct Session {
    db: Database,
    user: Option<User>,
    auth_delay: Duration,
}

impl Session {
    /// Load whatever user the store holds. An unreadable entry is logged
    /// and treated as signed out.
    pub fn init(db: Database, config: &SimulationConfig) -> Result<Self> {
        let user = match db.get_json::<User>(USER_KEY) {
            Ok(user) => user,
            Err(crate::error::CoreError::Json(e)) => {
                tracing::warn!(error = %e, "stored user is unreadable, starting signed out");
                None
            }
            Err(e) => return Err(e),
        };
        Ok(Self {
            db,
            user,
            auth_delay: Duration::from_millis(config.auth_ms),
        })
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Accepts any credentials after the auth delay.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Event> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField { field: "Email" }.into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField { field: "Password" }.into());
        }
        tokio::time::sleep(self.auth_delay).await;
        let user = User {
            id: "1".into(),
            email: email.to_string(),
            name: local_part(email).to_string(),
            phone: None,
            user_type: UserType::Client,
        };
        self.store(user)
    }

    /// Validate the form, wait the auth delay and store the new user.
    pub async fn sign_up(&mut self, form: &SignUpForm) -> Result<Event> {
        form.validate()?;
        tokio::time::sleep(self.auth_delay).await;
        let user = User {
            id: "1".into(),
            email: form.email.trim().to_string(),
            name: form.name.trim().to_string(),
            phone: form.phone.clone().filter(|p| !p.trim().is_empty()),
            user_type: UserType::Client,
        };
        self.store(user)
    }

    pub fn sign_out(&mut self) -> Result<Event> {
        self.db.kv_remove(USER_KEY)?;
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "signed out");
        }
        Ok(Event::SignedOut { at: Utc::now() })
    }

    fn store(&mut self, user: User) -> Result<Event> {
        self.db.put_json(USER_KEY, &user)?;
        tracing::info!(user_id = %user.id, email = %user.email, "signed in");
        let event = Event::SignedIn {
            user_id: user.id.clone(),
            email: user.email.clone(),
            at: Utc::now(),
        };
        self.user = Some(user);
        Ok(event)
    }
}
