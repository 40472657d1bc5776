use gatecast_model::{format_clock, format_optional_clock};

/// `current_time / duration` clamped to `[0, 1]`.
///
/// Unknown, zero or non-finite durations give `0.0`, never `NaN`.
pub fn progress_fraction(current_time: f64, duration: Option<f64>) -> f64 {
    match duration {
        Some(duration) if duration.is_finite() && duration > 0.0 => {
            let fraction = current_time / duration;
            if fraction.is_finite() {
                fraction.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Everything a progress bar and its labels need.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReadout {
    pub fraction: f64,
    pub percent: u8,
    pub elapsed: String,
    /// `--:--` while the duration is unknown.
    pub duration: String,
    /// Rounded up to whole seconds so it only reads `0:00` at the end.
    pub remaining: String,
}

impl ProgressReadout {
    pub fn new(current_time: f64, duration: Option<f64>) -> Self {
        let fraction = progress_fraction(current_time, duration);
        let remaining = duration.map(|duration| round_up_seconds(duration - current_time));
        Self {
            fraction,
            percent: (fraction * 100.0).round() as u8,
            elapsed: format_clock(current_time),
            duration: format_optional_clock(duration),
            remaining: format_optional_clock(remaining),
        }
    }
}

/// Whole seconds left, rounded up after dropping sub-millisecond float noise.
fn round_up_seconds(remaining: f64) -> f64 {
    ((remaining.max(0.0) * 1_000.0).round() / 1_000.0).ceil()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_is_bounded_for_every_time_in_range() {
        let duration = 120.0;
        let mut time = 0.0;
        while time <= duration {
            let fraction = progress_fraction(time, Some(duration));
            assert!((0.0..=1.0).contains(&fraction));
            assert!((fraction - time / duration).abs() < f64::EPSILON);
            time += 0.5;
        }
    }

    #[test]
    fn unknown_or_degenerate_duration_is_zero() {
        assert_eq!(progress_fraction(10.0, None), 0.0);
        assert_eq!(progress_fraction(10.0, Some(0.0)), 0.0);
        assert_eq!(progress_fraction(10.0, Some(f64::NAN)), 0.0);
        assert_eq!(progress_fraction(f64::NAN, Some(10.0)), 0.0);
        assert_eq!(progress_fraction(30.0, Some(10.0)), 1.0);
    }

    #[test]
    fn readout_labels() {
        let readout = ProgressReadout::new(65.0, Some(120.0));
        assert_eq!(readout.elapsed, "1:05");
        assert_eq!(readout.duration, "2:00");
        assert_eq!(readout.remaining, "0:55");
        assert_eq!(readout.percent, 54);

        assert_eq!(ProgressReadout::new(9.5, Some(10.0)).remaining, "0:01");
        assert_eq!(ProgressReadout::new(10.0, Some(10.0)).remaining, "0:00");
        assert_eq!(ProgressReadout::new(64.2, Some(120.0)).remaining, "0:56");

        let unknown = ProgressReadout::new(3.0, None);
        assert_eq!(unknown.duration, "--:--");
        assert_eq!(unknown.fraction, 0.0);
    }
}
