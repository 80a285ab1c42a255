use std::process::{Command, Output};

/// Run the headless binary with short cycles
fn run_headless(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_traffic_light"))
        .args(["--min-ms", "40", "--max-ms", "80"])
        .args(args)
        .env("RUST_LOG", "warn,traffic_light=info")
        .output()
        .expect("Failed to execute traffic light")
}

/// Test that the headless run completes once every vehicle has crossed
#[test]
fn test_headless_run_completes() {
    let output = run_headless(&["--vehicles", "3"]);

    assert!(
        output.status.success(),
        "Traffic light failed to run in headless mode. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Initial phase: red"), "stdout: {}", stdout);
    assert!(
        stdout.contains("SIMULATION COMPLETE"),
        "Run did not complete properly. stdout: {}",
        stdout
    );
    assert!(stdout.contains("Vehicles crossed: 3"), "stdout: {}", stdout);
    assert_eq!(stdout.matches(" crossed on ").count(), 3);
}

/// Test that lifecycle events are logged
#[test]
fn test_lifecycle_logged() {
    let output = run_headless(&["--vehicles", "1", "--seed", "7"]);
    assert!(output.status.success(), "Traffic light failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Traffic light started"),
        "Missing start message. stderr: {}",
        stderr
    );
    assert!(
        stderr.contains("Stopping traffic light"),
        "Missing stop message. stderr: {}",
        stderr
    );
}

/// Test that stepped mode accepts a step that fits the range
#[test]
fn test_stepped_mode_runs() {
    let output = run_headless(&["--vehicles", "2", "--stepped", "--step-ms", "20"]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Vehicles crossed: 2"));
}

/// Test that an empty cycle range is refused
#[test]
fn test_invalid_range_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_traffic_light"))
        .args(["--min-ms", "500", "--max-ms", "100"])
        .output()
        .expect("Failed to execute traffic light");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid cycle configuration"),
        "stderr: {}",
        stderr
    );
}
