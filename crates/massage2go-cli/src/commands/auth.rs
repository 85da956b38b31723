use std::time::Duration;

use clap::{Subcommand, ValueEnum};
use massage2go_core::session::{Session, SignUpFlow, SignUpForm, SignUpStage, VerificationMethod};
use massage2go_core::storage::{Database, VerificationConfig};
use massage2go_core::Config;
use tokio::time::Instant;

use super::{block_on, print_json, print_json_line, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Method {
    Selfie,
    Fingerprint,
}

impl From<Method> for VerificationMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::Selfie => VerificationMethod::Selfie,
            Method::Fingerprint => VerificationMethod::Fingerprint,
        }
    }
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in (any credentials are accepted)
    Signin { email: String, password: String },
    /// Create an account, optionally running identity verification first
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: String,
        /// Defaults to the password
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long)]
        accept_terms: bool,
        /// Verify identity before the account is created
        #[arg(long)]
        verify: Option<Method>,
    },
    /// Sign out and forget the stored user
    Signout,
    /// Print the stored user
    Whoami,
}

pub fn run(action: AuthAction) -> CliResult {
    let config = Config::load_or_default();
    let mut session = Session::init(Database::open()?, &config.simulation)?;

    match action {
        AuthAction::Signin { email, password } => {
            let event = block_on(session.sign_in(&email, &password))??;
            print_json(&event)?;
        }
        AuthAction::Signup {
            name,
            email,
            phone,
            password,
            confirm_password,
            accept_terms,
            verify,
        } => {
            let form = SignUpForm {
                name,
                email,
                phone,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                accept_terms,
            };
            if let Some(method) = verify {
                block_on(verify_identity(&form, method.into(), &config.verification))??;
            }
            let event = block_on(session.sign_up(&form))??;
            print_json(&event)?;
        }
        AuthAction::Signout => {
            let event = session.sign_out()?;
            print_json(&event)?;
        }
        AuthAction::Whoami => match session.user() {
            Some(user) => print_json(user)?,
            None => return Err("not signed in".into()),
        },
    }
    Ok(())
}

/// Run the verification flow in real time, streaming progress events.
async fn verify_identity(
    form: &SignUpForm,
    method: VerificationMethod,
    config: &VerificationConfig,
) -> CliResult {
    let mut flow = SignUpFlow::new(config);
    flow.submit(form)?;
    let origin = Instant::now();
    let elapsed_ms = || origin.elapsed().as_millis() as u64;

    if let Some(event) = flow.start_verification(method, elapsed_ms()) {
        print_json_line(&event)?;
    }
    let mut interval = tokio::time::interval(Duration::from_millis(config.tick_ms.max(1)));
    while flow.stage() != SignUpStage::Success {
        interval.tick().await;
        for event in flow.tick_at(elapsed_ms()) {
            if event.is_milestone() {
                print_json_line(&event)?;
            }
        }
    }
    Ok(())
}
