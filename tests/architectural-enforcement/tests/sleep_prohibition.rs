//! Integration Test: Sleep Prohibition
//!
//! **Policy**: production code waits on timers, channels or I/O; it never
//! sleeps to poll.
//! **Exceptions**: the TUI frame tick in `tui/src/app.rs`, test code.

use architectural_enforcement::{assert_clean, scan};

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(") || code.trim_start().starts_with("sleep(")
}

#[test]
fn test_no_thread_sleep_anywhere() {
    let mut violations = scan("core/src", |_, code| code.contains("thread::sleep"));
    violations.extend(scan("tui/src", |_, code| code.contains("thread::sleep")));
    assert_clean("std::thread::sleep blocks the async runtime", &violations);
}

#[test]
fn test_core_only_sleeps_until_deadlines() {
    // Intro timers use sleep_until against one start instant
    let violations = scan("core/src", |_, code| is_sleep_call(code));
    assert_clean("core must not sleep; use sleep_until or wait on I/O", &violations);
}

#[test]
fn test_tui_sleeps_only_for_frame_tick() {
    let violations = scan("tui/src", |path, code| {
        let frame_tick = path.ends_with("tui/src/app.rs") && code.contains("FRAME_INTERVAL");
        is_sleep_call(code) && !frame_tick
    });
    assert_clean("TUI may only sleep for the frame tick", &violations);
}

#[test]
fn test_detector_matches_common_forms() {
    assert!(is_sleep_call("    tokio::time::sleep(Duration::from_millis(10)).await;"));
    assert!(is_sleep_call("    std::thread::sleep(d);"));
    assert!(is_sleep_call("    sleep(d).await;"));
    assert!(!is_sleep_call("    sleep_until(deadline).await;"));
}
