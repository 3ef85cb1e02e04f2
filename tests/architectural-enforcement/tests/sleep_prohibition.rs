//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT block a thread to wait.
//! Delays are awaited on the tokio timer (`tokio::time::sleep`), which keeps
//! concurrent waits overlapping and lets tests run on paused time.
//!
//! **Forbidden**: `std::thread::sleep`, `thread::sleep`

use architectural_enforcement::{code_part, report, scan_production};

fn is_blocking_sleep(line: &str) -> bool {
    let code = code_part(line);
    code.contains("thread::sleep(") || code.contains("use std::thread::sleep")
}

/// Test that production code never parks a thread
#[test]
fn test_no_thread_sleep_in_production_code() {
    let violations = scan_production(|lines, idx| {
        is_blocking_sleep(lines[idx]).then_some("Blocking sleep")
    });

    report("Thread-blocking sleep found in production code!", &violations);
}

#[test]
fn test_sleep_violation_detection() {
    assert!(is_blocking_sleep(
        "    std::thread::sleep(Duration::from_millis(10));"
    ));
    assert!(is_blocking_sleep("use std::thread::sleep;"));
    assert!(!is_blocking_sleep(
        "    tokio::time::sleep(Duration::from_secs_f64(delay)).await;"
    ));
    assert!(!is_blocking_sleep("    // never std::thread::sleep(d) here"));
}
