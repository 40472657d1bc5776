/// Minimum media-time spacing between delivered time updates, in seconds.
pub const DEFAULT_TIME_UPDATE_INTERVAL: f64 = 1.0;

/// Bounds the rate of time updates to roughly one per second of media time.
///
/// Native elements fire `timeupdate` every 15-250ms and some embeds even
/// faster; downstream only needs whole-second resolution. The update that
/// reaches the end of the content is always let through.
#[derive(Debug, Clone)]
pub struct TimeUpdateThrottle {
    interval: f64,
    last_admitted: Option<f64>,
}

impl Default for TimeUpdateThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_UPDATE_INTERVAL)
    }
}

impl TimeUpdateThrottle {
    pub fn new(interval: f64) -> Self {
        Self {
            interval: interval.max(0.0),
            last_admitted: None,
        }
    }

    pub fn admit(&mut self, time: f64, duration: Option<f64>) -> bool {
        let reaches_end = duration.is_some_and(|duration| time >= duration);
        let admitted = reaches_end
            || match self.last_admitted {
                None => true,
                Some(last) => time - last >= self.interval,
            };

        if admitted {
            self.last_admitted = Some(time);
        }
        admitted
    }

    pub fn reset(&mut self) {
        self.last_admitted = None;
    }
}
