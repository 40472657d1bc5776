use gatecast_model::{BackendKind, Volume};
use std::fmt::Debug;
use std::time::Duration;

/// Why a backend could not play or keep playing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendFailure {
    #[error("network error: {0}")]
    Network(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("embed unavailable: {0}")]
    Embed(String),

    #[error("unsupported source: {0}")]
    Unsupported(String),
}

/// Result of asking a backend to start or resume playback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    /// Autoplay or user-gesture policy refused the request. Recoverable:
    /// the caller shows a manual play control.
    #[error("playback blocked: {0}")]
    Blocked(String),

    #[error(transparent)]
    Backend(#[from] BackendFailure),
}

/// Normalized event emitted by any backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    Playing,
    Paused,
    TimeUpdate(f64),
    Metadata { duration: f64 },
    Ended,
    VolumeChanged(Volume),
    Failed(BackendFailure),
}

/// Uniform control surface over every embed technology.
///
/// Implementations are chosen once when a session is created and never
/// swapped mid-session.
pub trait PlayerAdapter: Debug {
    fn kind(&self) -> BackendKind;

    /// Begin playback. `Err(StartError::Blocked)` means playback did not
    /// begin and must not be assumed to have begun.
    fn start(&mut self) -> Result<(), StartError>;

    /// Pause playback. A no-op when already paused.
    fn pause(&mut self);

    /// Resume after a pause. A no-op when already playing.
    fn resume(&mut self) -> Result<(), StartError> {
        if self.is_paused() {
            self.start()
        } else {
            Ok(())
        }
    }

    fn is_paused(&self) -> bool;

    fn set_volume(&mut self, volume: Volume);

    /// Total length in seconds, `None` while unknown.
    fn duration(&self) -> Option<f64>;

    fn current_time(&self) -> f64;

    /// Let time pass for timer-driven backends. Event-driven backends report
    /// through their host callbacks instead and return nothing here.
    fn advance(&mut self, _elapsed: Duration) -> Vec<BackendEvent> {
        Vec::new()
    }

    /// Return to the pre-start state so a retry starts from scratch.
    fn reset(&mut self);

    /// Release host listeners. Called once when the owning step unmounts.
    fn detach(&mut self) {}
}
