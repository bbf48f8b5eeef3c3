use std::process::{Command, Output};

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_intersection_sim"))
        .args(args)
        .env("RUST_LOG", "warn,intersection_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the default preset runs every intersection to completion
#[test]
fn test_independent_preset_completes() {
    let output = run_sim(&["--preset", "independent", "--capacity", "12", "--seed", "7"]);

    assert!(
        output.status.success(),
        "Simulation failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    for id in 0..4 {
        assert!(
            stdout.contains(&format!("[Intersection {id}] All vehicles have crossed")),
            "Missing completion line for intersection {id}. stdout: {stdout}"
        );
    }
    assert!(stdout.contains("Total simulation time:"), "Missing timing line");
}

/// Test that per-cycle blocks carry lights, crossings and queues
#[test]
fn test_cycle_blocks_are_printed() {
    let output = run_sim(&[
        "--preset",
        "sequential",
        "--streets",
        "4",
        "--capacity",
        "5",
        "--per-cycle",
        "3",
        "--signal",
        "binary",
        "--seed",
        "1",
    ]);

    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Intersection 0 - Cycle 1 ==="));
    assert!(stdout.contains("  North: GREEN"));
    assert!(stdout.contains("  East: RED"));
    assert!(stdout.contains("[Intersection 0] vehicle 0:0 crossed from North"));
    assert!(stdout.contains("  North (2): 0:3 0:4"));
}

/// Test that the cycle cap is reported when vehicles are left over
#[test]
fn test_cycle_cap_is_reported() {
    let output = run_sim(&[
        "--preset",
        "parallel-streets",
        "--capacity",
        "500",
        "--max-cycles",
        "2",
        "--quiet",
        "--seed",
        "3",
    ]);

    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("[Intersection 0] Cycle cap reached after 2 cycles"),
        "Missing cap line. stdout: {stdout}"
    );
    assert!(
        !stdout.contains("=== Intersection"),
        "Quiet run printed cycle blocks"
    );
}

/// Test that a malformed configuration is rejected before anything runs
#[test]
fn test_zero_streets_is_rejected() {
    let output = run_sim(&["--streets", "0"]);

    assert!(!output.status.success(), "Zero streets should be rejected");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("at least one street"),
        "Missing rejection reason. stderr: {stderr}"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Starting simulation"));
}
