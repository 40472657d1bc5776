#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status of a playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Ended,
    Errored,
}

impl PlaybackStatus {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackStatus::Playing)
    }

    /// `Ended` is terminal for a session; only a full reset leaves it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlaybackStatus::Ended)
    }

    pub fn has_started(&self) -> bool {
        !matches!(self, PlaybackStatus::Idle | PlaybackStatus::Loading)
    }
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlaybackStatus::Idle => "idle",
            PlaybackStatus::Loading => "loading",
            PlaybackStatus::Playing => "playing",
            PlaybackStatus::Paused => "paused",
            PlaybackStatus::Ended => "ended",
            PlaybackStatus::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// Playback volume clamped to `[0, 1]`. Zero means muted.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "f64", into = "f64"))]
pub struct Volume(f64);

impl Volume {
    pub const MUTED: Volume = Volume(0.0);
    pub const FULL: Volume = Volume(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::MUTED;
        }
        Volume(value.clamp(0.0, 1.0))
    }

    pub fn get(&self) -> f64 {
        self.0
    }

    pub fn is_muted(&self) -> bool {
        self.0 == 0.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}

impl From<f64> for Volume {
    fn from(value: f64) -> Self {
        Volume::new(value)
    }
}

impl From<Volume> for f64 {
    fn from(value: Volume) -> Self {
        value.0
    }
}

/// Embed technology rendering a session's video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BackendKind {
    /// Native media element (`<video>`).
    NativeElement,
    /// Third-party iframe player with a scripting API and event emitter.
    EmbedApi,
    /// Plain iframe without any API; progress is timer-driven.
    PlainFrame,
    /// No media at all; a timer fakes playback for a fixed duration.
    Simulated,
}

impl BackendKind {
    /// Whether progress comes from the media itself rather than a timer.
    pub fn reports_media_time(&self) -> bool {
        matches!(self, BackendKind::NativeElement | BackendKind::EmbedApi)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BackendKind::NativeElement => "native-element",
            BackendKind::EmbedApi => "embed-api",
            BackendKind::PlainFrame => "plain-frame",
            BackendKind::Simulated => "simulated",
        };
        f.write_str(label)
    }
}
