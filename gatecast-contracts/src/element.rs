//! Host surface of a native media element.

use std::fmt::Debug;

/// Rejection reasons of `HTMLMediaElement.play()` and media errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    /// `NotAllowedError`: autoplay policy or missing user gesture.
    #[error("not allowed: {0}")]
    NotAllowed(String),

    /// `AbortError`: the load was interrupted, e.g. by a source change.
    #[error("aborted: {0}")]
    Aborted(String),

    #[error("network: {0}")]
    Network(String),

    #[error("decode: {0}")]
    Decode(String),

    /// `NotSupportedError` / `MEDIA_ERR_SRC_NOT_SUPPORTED`.
    #[error("source not supported: {0}")]
    NotSupported(String),
}

impl ElementError {
    /// Map a `MediaError.code` value to an error.
    pub fn from_media_error_code(code: u16, message: &str) -> Self {
        let message = message.to_string();
        match code {
            1 => ElementError::Aborted(message),
            2 => ElementError::Network(message),
            3 => ElementError::Decode(message),
            _ => ElementError::NotSupported(message),
        }
    }
}

/// DOM media events the adapter listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEventKind {
    Play,
    Pause,
    Ended,
    TimeUpdate,
    LoadedMetadata,
    VolumeChange,
    Error,
}

impl MediaEventKind {
    pub const ALL: [MediaEventKind; 7] = [
        MediaEventKind::Play,
        MediaEventKind::Pause,
        MediaEventKind::Ended,
        MediaEventKind::TimeUpdate,
        MediaEventKind::LoadedMetadata,
        MediaEventKind::VolumeChange,
        MediaEventKind::Error,
    ];

    pub fn dom_name(&self) -> &'static str {
        match self {
            MediaEventKind::Play => "play",
            MediaEventKind::Pause => "pause",
            MediaEventKind::Ended => "ended",
            MediaEventKind::TimeUpdate => "timeupdate",
            MediaEventKind::LoadedMetadata => "loadedmetadata",
            MediaEventKind::VolumeChange => "volumechange",
            MediaEventKind::Error => "error",
        }
    }

    pub fn from_dom_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.dom_name() == name)
    }
}

/// The subset of `HTMLMediaElement` the engine drives.
pub trait MediaElement: Debug {
    fn play(&mut self) -> Result<(), ElementError>;
    fn pause(&mut self);
    fn paused(&self) -> bool;
    fn set_volume(&mut self, volume: f64);
    fn volume(&self) -> f64;
    fn set_muted(&mut self, muted: bool);
    fn muted(&self) -> bool;
    /// `NaN` until metadata has loaded, like the DOM property.
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
    /// Last `MediaError`, if any, as `(code, message)`.
    fn error(&self) -> Option<(u16, String)>;
    /// Reload the source from the start.
    fn load(&mut self);
    fn add_listener(&mut self, kind: MediaEventKind);
    fn remove_listener(&mut self, kind: MediaEventKind);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_names_round_trip() {
        for kind in MediaEventKind::ALL {
            assert_eq!(MediaEventKind::from_dom_name(kind.dom_name()), Some(kind));
        }
        assert_eq!(MediaEventKind::from_dom_name("seeking"), None);
    }
}
