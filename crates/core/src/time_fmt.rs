// SPDX-License-Identifier: MIT

//! Human-readable elapsed-time formatting, used by CLI/status output.

use std::time::Duration;

/// Format a duration as a short human-readable string: `"3s"`, `"4m12s"`,
/// `"2h05m"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h{minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m{seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_seconds_only() {
        assert_eq!(format_elapsed(Duration::from_secs(7)), "7s");
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_elapsed(Duration::from_secs(252)), "4m12s");
    }

    #[test]
    fn formats_hours_and_minutes() {
        assert_eq!(format_elapsed(Duration::from_secs(7500)), "2h05m");
    }
}
