use std::time::Duration;

/// Outcome of advancing a [`PlaybackTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAdvance {
    /// The timer is stopped or already finished; nothing changed.
    Idle,
    Ticked { elapsed: Duration },
    /// The timer reached its duration during this advance. Reported once.
    Finished { elapsed: Duration },
}

/// Elapsed/remaining counter for a fixed-length piece of content.
///
/// Drives the progress of timer-backed players and the countdown labels of
/// simulated sessions.
#[derive(Debug, Clone)]
pub struct PlaybackTimer {
    duration: Duration,
    elapsed: Duration,
    running: bool,
}

impl PlaybackTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    pub fn start(&mut self) {
        if !self.is_finished() {
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = false;
    }

    pub fn advance(&mut self, delta: Duration) -> TimerAdvance {
        if !self.running || self.is_finished() {
            return TimerAdvance::Idle;
        }

        self.elapsed = (self.elapsed + delta).min(self.duration);
        if self.is_finished() {
            self.running = false;
            TimerAdvance::Finished {
                elapsed: self.elapsed,
            }
        } else {
            TimerAdvance::Ticked {
                elapsed: self.elapsed,
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }
}
