//! Human-readable durations for log lines.

use std::time::Duration;

/// `"45s"`, `"3m 05s"`, `"2h 07m"`, `"4d 01h"`: the two largest units.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    match secs {
        0..=59 => format!("{}s", secs),
        60..=3599 => format!("{}m {:02}s", secs / 60, secs % 60),
        3600..=86399 => format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60),
        _ => format!("{}d {:02}h", secs / 86400, (secs % 86400) / 3600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_two_largest_units() {
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(185)), "3m 05s");
        assert_eq!(format_duration(Duration::from_secs(7_620)), "2h 07m");
        assert_eq!(format_duration(Duration::from_secs(349_200)), "4d 01h");
    }

    #[test]
    fn sub_second_rounds_down() {
        assert_eq!(format_duration(Duration::from_millis(999)), "0s");
    }
}
