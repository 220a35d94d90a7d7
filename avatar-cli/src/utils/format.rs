//! Formatting utilities

/// Format an angle in radians, or a dash when the joint is absent
pub fn format_angle(radians: Option<f32>) -> String {
    radians.map_or_else(|| "-".to_string(), |value| format!("{value:+.4}"))
}

/// Format a millisecond timestamp
pub fn format_ms(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.2}s", ms / 1000.0)
    } else {
        format!("{ms:.0}ms")
    }
}

/// Format a unit interval value as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_angle() {
        assert_eq!(format_angle(None), "-");
        assert_eq!(format_angle(Some(0.10442)), "+0.1044");
        assert_eq!(format_angle(Some(-1.2)), "-1.2000");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(125.0), "125ms");
        assert_eq!(format_ms(4000.0), "4.00s");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.5), "50.0%");
        assert_eq!(format_percentage(0.0417), "4.2%");
    }
}
