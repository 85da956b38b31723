//! Sign-up form and the identity verification flow that follows it.
//!
//! ```text
//! Form -> Verification -> Success
//! ```
//!
//! Each arrow is taken at most once per flow.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::booking::Interval;
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::VerificationConfig;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

impl SignUpForm {
    /// First problem found, in the order the form reports them.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "Name" });
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "Email" });
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if !self.accept_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMethod {
    Selfie,
    Fingerprint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignUpStage {
    Form,
    Verification,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpFlow {
    stage: SignUpStage,
    method: Option<VerificationMethod>,
    progress: u8,
    increment_pct: u8,
    tick_ms: u64,
    timer: Option<Interval>,
}

impl SignUpFlow {
    pub fn new(config: &VerificationConfig) -> Self {
        Self {
            stage: SignUpStage::Form,
            method: None,
            progress: 0,
            increment_pct: config.increment_pct.max(1),
            tick_ms: config.tick_ms,
            timer: None,
        }
    }

    pub fn stage(&self) -> SignUpStage {
        self.stage
    }

    pub fn method(&self) -> Option<VerificationMethod> {
        self.method
    }

    /// 0 ..= 100
    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_verifying(&self) -> bool {
        self.timer.is_some()
    }

    /// Submit the form. A valid form moves the flow to `Verification`;
    /// submitting again later leaves the stage alone.
    pub fn submit(&mut self, form: &SignUpForm) -> Result<SignUpStage, ValidationError> {
        if self.stage != SignUpStage::Form {
            return Ok(self.stage);
        }
        form.validate()?;
        self.stage = SignUpStage::Verification;
        tracing::debug!(email = %form.email, "sign-up form accepted");
        Ok(self.stage)
    }

    /// Begin the chosen verification. Ignored outside `Verification` or
    /// while one is already running.
    pub fn start_verification(&mut self, method: VerificationMethod, now_ms: u64) -> Option<Event> {
        if self.stage != SignUpStage::Verification || self.timer.is_some() {
            return None;
        }
        self.method = Some(method);
        self.progress = 0;
        self.timer = Some(Interval::starting_at(now_ms, self.tick_ms));
        Some(Event::VerificationStarted {
            method,
            at: Utc::now(),
        })
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        let Some(timer) = self.timer.as_mut() else {
            return events;
        };
        while timer.next_fire(now_ms).is_some() {
            self.progress = self.progress.saturating_add(self.increment_pct).min(100);
            events.push(Event::VerificationProgress {
                percent: self.progress,
                at: Utc::now(),
            });
            if self.progress == 100 {
                break;
            }
        }
        if self.progress == 100 {
            self.timer = None;
            self.stage = SignUpStage::Success;
            if let Some(method) = self.method {
                tracing::info!(?method, "identity verified");
                events.push(Event::VerificationSucceeded {
                    method,
                    at: Utc::now(),
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            name: "Thandi".into(),
            email: "thandi@example.com".into(),
            phone: Some("+27 82 000 0000".into()),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
            accept_terms: true,
        }
    }

    #[test]
    fn validation_messages() {
        let mismatch = SignUpForm {
            confirm_password: "secret2".into(),
            ..form()
        };
        assert_eq!(mismatch.validate().unwrap_err().to_string(), "Passwords do not match");

        let short = SignUpForm {
            password: "abc".into(),
            confirm_password: "abc".into(),
            ..form()
        };
        assert_eq!(
            short.validate().unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );

        let no_terms = SignUpForm {
            accept_terms: false,
            ..form()
        };
        assert_eq!(no_terms.validate(), Err(ValidationError::TermsNotAccepted));

        let no_name = SignUpForm {
            name: " ".into(),
            ..form()
        };
        assert_eq!(no_name.validate().unwrap_err().to_string(), "Name is required");
    }

    #[test]
    fn invalid_form_stays_on_form() {
        let mut flow = SignUpFlow::new(&VerificationConfig::default());
        let bad = SignUpForm {
            password: "x".into(),
            ..form()
        };
        assert!(flow.submit(&bad).is_err());
        assert_eq!(flow.stage(), SignUpStage::Form);
    }

    #[test]
    fn verification_is_entered_once() {
        let mut flow = SignUpFlow::new(&VerificationConfig::default());
        assert_eq!(flow.submit(&form()), Ok(SignUpStage::Verification));
        assert_eq!(flow.submit(&form()), Ok(SignUpStage::Verification));
        assert!(flow.start_verification(VerificationMethod::Selfie, 0).is_some());
        assert!(flow.start_verification(VerificationMethod::Fingerprint, 0).is_none());
    }

    #[test]
    fn verification_runs_in_two_percent_steps_to_success() {
        let mut flow = SignUpFlow::new(&VerificationConfig::default());
        flow.submit(&form()).unwrap();
        flow.start_verification(VerificationMethod::Fingerprint, 0);

        let events = flow.tick_at(100);
        assert_eq!(flow.progress(), 2);
        assert_eq!(events.len(), 1);

        let events = flow.tick_at(5_000);
        let percents: Vec<u8> = events
            .iter()
            .filter_map(|e| match e {
                Event::VerificationProgress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect();
        assert_eq!(percents.first(), Some(&4));
        assert_eq!(percents.last(), Some(&100));
        assert!(percents.windows(2).all(|w| w[1] == w[0] + 2));
        let successes = events
            .iter()
            .filter(|e| matches!(e, Event::VerificationSucceeded { .. }))
            .count();
        assert_eq!(successes, 1);
        assert_eq!(flow.stage(), SignUpStage::Success);

        assert!(flow.tick_at(60_000).is_empty());
        assert!(flow
            .start_verification(VerificationMethod::Selfie, 60_000)
            .is_none());
    }

    #[test]
    fn verification_before_submit_is_ignored() {
        let mut flow = SignUpFlow::new(&VerificationConfig::default());
        assert!(flow.start_verification(VerificationMethod::Selfie, 0).is_none());
        assert!(flow.tick_at(10_000).is_empty());
    }
}
