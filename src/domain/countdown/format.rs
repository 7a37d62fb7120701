//! Remaining-time rendering for ticket headers.

/// Formats remaining seconds as `MM:SS`, or `H:MM:SS` from one hour up.
/// Zero remaining renders as `00:00`.
pub fn format_remaining(remaining_seconds: u64) -> String {
    let hours = remaining_seconds / 3600;
    let minutes = (remaining_seconds % 3600) / 60;
    let seconds = remaining_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_minutes_and_seconds() {
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(5), "00:05");
        assert_eq!(format_remaining(65), "01:05");
        assert_eq!(format_remaining(600), "10:00");
        assert_eq!(format_remaining(3599), "59:59");
    }

    #[test]
    fn switches_to_hours_at_one_hour() {
        assert_eq!(format_remaining(3600), "1:00:00");
        assert_eq!(format_remaining(3661), "1:01:01");
        assert_eq!(format_remaining(7325), "2:02:05");
    }
}
