//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async functions MUST NOT use blocking I/O.
//! **Required**: `reqwest::Client` and `tokio::net`, not `reqwest::blocking`
//! or `std::net`; `tokio::fs`, not `std::fs`, once inside a runtime.
//!
//! **Acceptable**: blocking calls in plain `fn`s (configuration loading runs
//! before any request is made) and test code.

use architectural_enforcement::{code_part, is_in_async_function, report, scan_production};

const FORBIDDEN: [(&str, &str); 3] = [
    ("std::fs::", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
];

fn blocking_call(line: &str) -> Option<&'static str> {
    let code = code_part(line);
    FORBIDDEN
        .iter()
        .find(|(pattern, _)| code.contains(pattern))
        .map(|(_, reason)| *reason)
}

/// Test that async production code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_async_functions() {
    let violations = scan_production(|lines, idx| {
        if !is_in_async_function(lines, idx) {
            return None;
        }
        blocking_call(lines[idx])
    });

    report("Blocking I/O calls found in async functions!", &violations);
}

/// The blocking HTTP client needs a feature the workspace never enables
#[test]
fn test_no_reqwest_blocking_anywhere() {
    let violations = scan_production(|lines, idx| {
        code_part(lines[idx])
            .contains("reqwest::blocking")
            .then_some("Blocking HTTP client")
    });

    report("reqwest::blocking used in production code!", &violations);
}

#[test]
fn test_blocking_call_detection() {
    assert_eq!(
        blocking_call("    let s = std::fs::read_to_string(path)?;"),
        Some("Blocking file I/O")
    );
    assert_eq!(
        blocking_call("    let stream = std::net::TcpStream::connect(addr)?;"),
        Some("Blocking network I/O")
    );
    assert_eq!(
        blocking_call("    let body = reqwest::blocking::get(url)?;"),
        Some("Blocking HTTP client")
    );
    assert_eq!(blocking_call("    let r = client.get(url).send().await?;"), None);
}
