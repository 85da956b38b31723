//! Basic CLI E2E tests.
//!
//! Each test gets its own data directory so config and stored state never
//! leak between tests.

use std::path::Path;
use std::process::Command;
use std::thread::sleep;
use std::time::Duration;

use tempfile::TempDir;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(data_dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_massage2go-cli"))
        .env("MASSAGE2GO_DATA_DIR", data_dir)
        .env_remove("MASSAGE2GO_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Data dir with every simulated delay set to zero.
fn fast_env() -> TempDir {
    let dir = TempDir::new().unwrap();
    for key in [
        "simulation.auth_ms",
        "simulation.device_scan_ms",
        "simulation.device_connect_ms",
        "simulation.device_disconnect_ms",
        "simulation.gate_command_ms",
        "simulation.payment_authorize_ms",
    ] {
        let (code, _, err) = run_cli(dir.path(), &["config", "set", key, "0"]);
        assert_eq!(code, 0, "config set {key} failed: {err}");
    }
    dir
}

/// `fast_env` plus millisecond payment and tracker timers.
fn fast_timers_env() -> TempDir {
    let dir = fast_env();
    for (key, value) in [
        ("payment.step_interval_ms", "20"),
        ("payment.percent_interval_ms", "2"),
        ("payment.confirm_delay_ms", "5"),
        ("en_route.tick_ms", "2"),
    ] {
        let (code, _, err) = run_cli(dir.path(), &["config", "set", key, value]);
        assert_eq!(code, 0, "config set {key} failed: {err}");
    }
    dir
}

/// Every JSON value on stdout, pretty-printed or one per line.
fn json_stream(stdout: &str) -> Vec<serde_json::Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| panic!("not a JSON stream ({e}): {stdout}"))
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).unwrap_or_else(|e| panic!("not JSON ({e}): {stdout}"))
}

#[test]
fn test_catalog_services_json() {
    let dir = TempDir::new().unwrap();
    let (code, out, _) = run_cli(dir.path(), &["catalog", "services"]);
    assert_eq!(code, 0);
    let services = json(&out);
    let services = services.as_array().unwrap();
    assert!(!services.is_empty());
    assert!(services.iter().any(|s| s["id"] == "swedish"));
}

#[test]
fn test_catalog_unknown_service_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, err) = run_cli(dir.path(), &["catalog", "service", "hot-stone"]);
    assert_eq!(code, 1);
    assert!(err.contains("unknown service"));
}

#[test]
fn test_config_get_set() {
    let dir = TempDir::new().unwrap();
    let (code, out, _) = run_cli(dir.path(), &["config", "get", "pricing.booking_fee"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim().parse::<f64>().unwrap(), 15.0);

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "en_route.steps", "5"]);
    assert_eq!(code, 0);
    let (_, out, _) = run_cli(dir.path(), &["config", "get", "en_route.steps"]);
    assert_eq!(out.trim(), "5");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "en_route.steps", "many"]);
    assert_eq!(code, 1);
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "nope.nothing"]);
    assert_eq!(code, 1);
}

#[test]
fn test_auth_flow() {
    let dir = fast_env();
    let (code, _, _) = run_cli(dir.path(), &["auth", "whoami"]);
    assert_eq!(code, 1);

    let (code, out, _) = run_cli(dir.path(), &["auth", "signin", "thandi@example.com", "secret"]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["type"], "SignedIn");

    let (code, out, _) = run_cli(dir.path(), &["auth", "whoami"]);
    assert_eq!(code, 0);
    let user = json(&out);
    assert_eq!(user["email"], "thandi@example.com");
    assert_eq!(user["name"], "thandi");

    let (code, _, _) = run_cli(dir.path(), &["auth", "signout"]);
    assert_eq!(code, 0);
    let (code, _, _) = run_cli(dir.path(), &["auth", "whoami"]);
    assert_eq!(code, 1);
}

#[test]
fn test_signup_requires_terms() {
    let dir = fast_env();
    let (code, _, err) = run_cli(
        dir.path(),
        &["auth", "signup", "--name", "Thandi", "--email", "t@example.com", "--password", "secret1"],
    );
    assert_eq!(code, 1);
    assert!(err.starts_with("error:"));
}

#[test]
fn test_book_start_confirm_cancel() {
    let dir = fast_env();
    let start = ["book", "start", "--therapist", "1", "--service", "swedish"];
    let (code, out, err) = run_cli(dir.path(), &start);
    assert_eq!(code, 0, "{err}");
    assert_eq!(json(&out)["type"], "StageChanged");

    let (code, out, _) = run_cli(dir.path(), &["book", "confirm"]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["to"], "selecting-payment");

    let (code, _, _) = run_cli(dir.path(), &["book", "complete"]);
    assert_eq!(code, 1);

    let (code, out, _) = run_cli(dir.path(), &["book", "cancel"]);
    assert_eq!(code, 0);
    assert_eq!(json(&out)["to"], "cancelled");

    let (code, out, _) = run_cli(dir.path(), &["book", "status"]);
    assert_eq!(code, 0);
    // A cancelled booking has nothing left to tick, so only the snapshot prints.
    let snapshot = json(&out);
    assert_eq!(snapshot["stage"], "cancelled");
    assert_eq!(snapshot["active_timers"], 0);
}

#[test]
fn test_book_flow_across_invocations() {
    let dir = fast_timers_env();
    let book = |args: &[&str]| {
        let mut full = vec!["book"];
        full.extend_from_slice(args);
        let (code, out, err) = run_cli(dir.path(), &full);
        assert_eq!(code, 0, "book {args:?} failed: {err}");
        json_stream(&out)
    };

    book(&["start", "--therapist", "1", "--service", "swedish"]);
    book(&["confirm"]);
    let paid = book(&["pay", "card"]);
    assert_eq!(paid[0]["to"], "processing");

    sleep(Duration::from_millis(400));
    let status = book(&["status"]);
    assert_eq!(status[0]["type"], "BookingSnapshot");
    assert_eq!(status[0]["stage"], "confirmed");
    assert_eq!(status[0]["payment_percent"], 100);
    assert!(status.iter().any(|e| e["type"] == "BookingConfirmed"));

    let tracking = book(&["track"]);
    assert_eq!(tracking[0]["to"], "en-route");

    sleep(Duration::from_millis(300));
    let completed = book(&["complete"]);
    assert_eq!(completed[0]["from"], "en-route");
    assert_eq!(completed[0]["to"], "completed");

    let review = book(&["review", "5", "Lovely session"]);
    assert_eq!(review[0]["type"], "ReviewSubmitted");
    assert_eq!(review[0]["rating"], 5);

    let (code, _, _) = run_cli(dir.path(), &["book", "review", "4"]);
    assert_eq!(code, 1);
}

#[test]
fn test_pay_in_wrong_stage_fails_without_waiting() {
    let dir = fast_env();
    let slow_auth = ["config", "set", "simulation.payment_authorize_ms", "5000"];
    let (code, _, _) = run_cli(dir.path(), &slow_auth);
    assert_eq!(code, 0);
    run_cli(dir.path(), &["book", "start", "--therapist", "1", "--service", "swedish"]);

    let started = std::time::Instant::now();
    let (code, _, err) = run_cli(dir.path(), &["book", "pay", "card"]);
    assert_eq!(code, 1);
    assert!(err.contains("cannot choose a payment method"), "{err}");
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn test_simulate_prints_arrival_before_completion() {
    let dir = fast_timers_env();
    for _ in 0..5 {
        let (code, out, err) = run_cli(dir.path(), &["book", "simulate", "--tick-ms", "1"]);
        assert_eq!(code, 0, "{err}");
        let events = json_stream(&out);
        let arrived = events
            .iter()
            .position(|e| e["type"] == "TherapistArrived")
            .unwrap_or_else(|| panic!("no arrival in: {out}"));
        let completed = events
            .iter()
            .position(|e| e["type"] == "StageChanged" && e["to"] == "completed")
            .unwrap();
        assert!(arrived < completed);
        assert_eq!(events.last().unwrap()["stage"], "completed");
    }
}

#[test]
fn test_track_en_route_sample_booking() {
    let dir = TempDir::new().unwrap();
    let (code, out, err) = run_cli(dir.path(), &["track", "3", "--tick-ms", "1"]);
    assert_eq!(code, 0, "{err}");
    let events = json_stream(&out);
    assert_eq!(events[0]["booking"], "3");
    assert!(events[0]["route"]["distance_km"].as_f64().unwrap() > 0.0);
    let moves: Vec<_> = events.iter().filter(|e| e["type"] == "TherapistMoved").collect();
    assert_eq!(moves.len(), 50);
    assert_eq!(moves.last().unwrap()["eta_min"], 0);
    assert_eq!(events.last().unwrap()["type"], "TherapistArrived");
}

#[test]
fn test_book_without_start_fails() {
    let dir = TempDir::new().unwrap();
    let (code, _, err) = run_cli(dir.path(), &["book", "confirm"]);
    assert_eq!(code, 1);
    assert!(err.contains("book start"));
}

#[test]
fn test_price_service_with_fixed_surge() {
    let dir = TempDir::new().unwrap();
    let (code, out, _) = run_cli(dir.path(), &["price", "service", "swedish", "--surge", "1"]);
    assert_eq!(code, 0);
    let price = json(&out);
    assert_eq!(price["total"], "R500");
    assert_eq!(price["breakdown"]["serviceFee"], 70.0);
}

#[test]
fn test_device_gate_open() {
    let dir = fast_env();
    let (code, out, err) = run_cli(dir.path(), &["device", "gate", "sonoff-gate-001", "open"]);
    assert_eq!(code, 0, "{err}");
    assert!(out.contains("\"GateCommandSent\""));
    assert!(out.contains("\"gate\": \"open\""));
}

#[test]
fn test_track_requires_en_route_booking() {
    let dir = TempDir::new().unwrap();
    let (code, _, err) = run_cli(dir.path(), &["track", "2"]);
    assert_eq!(code, 1);
    assert!(err.contains("not en route"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    let (code, out, _) = run_cli(dir.path(), &["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(out.contains("massage2go-cli"));
}
