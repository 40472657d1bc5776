/// Format whole seconds as `m:ss`. Negative and non-finite input renders as
/// `0:00`.
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Like [`format_clock`], but renders `--:--` while the value is unknown.
pub fn format_optional_clock(seconds: Option<f64>) -> String {
    match seconds {
        Some(value) => format_clock(value),
        None => "--:--".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_padded_seconds() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.9), "0:59");
        assert_eq!(format_clock(120.0), "2:00");
        assert_eq!(format_clock(754.2), "12:34");
    }

    #[test]
    fn degenerate_input_renders_zero() {
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(-3.0), "0:00");
        assert_eq!(format_optional_clock(None), "--:--");
    }
}
