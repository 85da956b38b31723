//! Integration tests for the persisted user session and sign-up flow.

use massage2go_core::session::{
    Session, SignUpFlow, SignUpForm, SignUpStage, UserType, VerificationMethod, USER_KEY,
};
use massage2go_core::storage::{Database, SimulationConfig, VerificationConfig};
use massage2go_core::Event;

fn form() -> SignUpForm {
    SignUpForm {
        name: "Test User".into(),
        email: "test@example.com".into(),
        phone: None,
        password: "secret1".into(),
        confirm_password: "secret1".into(),
        accept_terms: true,
    }
}

#[tokio::test(start_paused = true)]
async fn test_user_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("massage2go.db");
    let sim = SimulationConfig::default();

    let mut session = Session::init(Database::open_at(&path).unwrap(), &sim).unwrap();
    session.sign_up(&form()).await.unwrap();
    let before = session.user().cloned().unwrap();
    drop(session);

    let reloaded = Session::init(Database::open_at(&path).unwrap(), &sim).unwrap();
    let after = reloaded.user().cloned().unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.email, "test@example.com");
    assert_eq!(after.name, "Test User");
    assert_eq!(after.user_type, UserType::Client);

    let raw = Database::open_at(&path).unwrap().kv_get(USER_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["userType"], "client");
}

#[tokio::test(start_paused = true)]
async fn test_sign_out_clears_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("massage2go.db");
    let sim = SimulationConfig::default();

    let mut session = Session::init(Database::open_at(&path).unwrap(), &sim).unwrap();
    session.sign_in("sarah@example.com", "whatever").await.unwrap();
    assert!(matches!(session.sign_out().unwrap(), Event::SignedOut { .. }));
    assert!(!session.is_authenticated());

    let reloaded = Session::init(Database::open_at(&path).unwrap(), &sim).unwrap();
    assert!(reloaded.user().is_none());
}

#[test]
fn test_sign_up_scenario_reaches_success_once() {
    let mut flow = SignUpFlow::new(&VerificationConfig::default());
    assert_eq!(flow.submit(&form()).unwrap(), SignUpStage::Verification);
    flow.start_verification(VerificationMethod::Selfie, 0).unwrap();

    let mut percents = Vec::new();
    let mut successes = 0;
    for now in (100..=6_000).step_by(100) {
        for event in flow.tick_at(now) {
            match event {
                Event::VerificationProgress { percent, .. } => percents.push(percent),
                Event::VerificationSucceeded { .. } => successes += 1,
                _ => {}
            }
        }
    }
    let expected: Vec<u8> = (1..=50).map(|i| i * 2).collect();
    assert_eq!(percents, expected);
    assert_eq!(successes, 1);
    assert_eq!(flow.stage(), SignUpStage::Success);
}
