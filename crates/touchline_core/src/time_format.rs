//! Scoreboard time formatting.

/// `MM:SS` for a number of seconds. Fractions are truncated and minutes keep
/// counting past 60 (`62:05`). Negative or non-finite input shows `00:00`.
pub fn format_clock(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 { seconds.trunc() as u64 } else { 0 };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.99), "00:59");
        assert_eq!(format_clock(60.0), "01:00");
        assert_eq!(format_clock(3725.4), "62:05");
        assert_eq!(format_clock(6000.0), "100:00");
    }

    #[test]
    fn test_format_clock_degenerate_input() {
        assert_eq!(format_clock(-12.0), "00:00");
        assert_eq!(format_clock(f64::NAN), "00:00");
        assert_eq!(format_clock(f64::INFINITY), "00:00");
    }
}
