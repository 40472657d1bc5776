use gatecast_contracts::adapter::{BackendEvent, PlayerAdapter, StartError};
use gatecast_model::{BackendKind, Volume};
use std::time::Duration;

use crate::playback::timer::{PlaybackTimer, TimerAdvance};

/// Timer-driven player for content whose progress cannot be observed.
///
/// Serves both the simulated backend and the plain iframe without a
/// scripting API; the latter only differs in the kind it reports.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    kind: BackendKind,
    timer: PlaybackTimer,
    volume: Volume,
}

impl SimulatedPlayer {
    pub fn new(duration: Duration) -> Self {
        Self {
            kind: BackendKind::Simulated,
            timer: PlaybackTimer::new(duration),
            volume: Volume::default(),
        }
    }

    pub fn plain_frame(duration: Duration) -> Self {
        Self {
            kind: BackendKind::PlainFrame,
            ..Self::new(duration)
        }
    }

    pub fn timer(&self) -> &PlaybackTimer {
        &self.timer
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }
}

impl PlayerAdapter for SimulatedPlayer {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn start(&mut self) -> Result<(), StartError> {
        self.timer.start();
        Ok(())
    }

    fn pause(&mut self) {
        self.timer.stop();
    }

    fn is_paused(&self) -> bool {
        !self.timer.is_running()
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
    }

    fn duration(&self) -> Option<f64> {
        Some(self.timer.duration().as_secs_f64())
    }

    fn current_time(&self) -> f64 {
        self.timer.elapsed().as_secs_f64()
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<BackendEvent> {
        match self.timer.advance(elapsed) {
            TimerAdvance::Idle => Vec::new(),
            TimerAdvance::Ticked { elapsed } => {
                vec![BackendEvent::TimeUpdate(elapsed.as_secs_f64())]
            }
            TimerAdvance::Finished { elapsed } => vec![
                BackendEvent::TimeUpdate(elapsed.as_secs_f64()),
                BackendEvent::Ended,
            ],
        }
    }

    fn reset(&mut self) {
        self.timer.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finishing_emits_final_update_then_ended() {
        let mut player = SimulatedPlayer::new(Duration::from_secs(3));
        assert!(player.advance(Duration::from_secs(1)).is_empty());

        player.start().unwrap();
        assert_eq!(
            player.advance(Duration::from_secs(1)),
            vec![BackendEvent::TimeUpdate(1.0)]
        );
        assert_eq!(
            player.advance(Duration::from_secs(4)),
            vec![BackendEvent::TimeUpdate(3.0), BackendEvent::Ended]
        );
        assert!(player.is_paused());
    }

    #[test]
    fn plain_frame_reports_its_kind() {
        let player = SimulatedPlayer::plain_frame(Duration::from_secs(90));
        assert_eq!(player.kind(), BackendKind::PlainFrame);
        assert_eq!(player.duration(), Some(90.0));
    }
}
