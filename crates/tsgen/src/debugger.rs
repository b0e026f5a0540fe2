//! Debugger detection and the optional attach-wait hook.
//!
//! The wait loop is a purely operational aid guarded by the
//! `wait_for_debugger` setting; it sits outside the generation algorithm's
//! critical path and outside every test path.

use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Whether a debugger is attached to this process.
///
/// On Linux this reads `TracerPid` from `/proc/self/status`. Elsewhere the
/// probe reports false, which degrades to "never serialize for a debugger".
#[must_use]
#[cfg(target_os = "linux")]
pub fn is_attached() -> bool {
    std::fs::read_to_string("/proc/self/status")
        .map(|status| status_reports_tracer(&status))
        .unwrap_or(false)
}

#[must_use]
#[cfg(not(target_os = "linux"))]
pub fn is_attached() -> bool {
    false
}

/// Block until a debugger attaches, polling at a fixed interval.
pub fn wait_for_attach() {
    while !is_attached() {
        tracing::info!("waiting for debugger to attach");
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(any(target_os = "linux", test))]
fn status_reports_tracer(status: &str) -> bool {
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .is_some_and(|pid| pid.trim() != "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tracer_pid_means_no_debugger() {
        let status = "Name:\ttsgen\nTracerPid:\t0\nUid:\t1000\n";
        assert!(!status_reports_tracer(status));
    }

    #[test]
    fn nonzero_tracer_pid_means_attached() {
        let status = "Name:\ttsgen\nTracerPid:\t4242\nUid:\t1000\n";
        assert!(status_reports_tracer(status));
    }

    #[test]
    fn missing_field_means_no_debugger() {
        assert!(!status_reports_tracer("Name:\ttsgen\n"));
    }
}
