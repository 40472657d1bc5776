//! Player adapter variants
//!
//! Every embed technology sits behind one tagged [`AnyBackend`], chosen
//! once when a session is created:
//! - native media elements with real time updates
//! - iframe players exposing a scripting API
//! - plain iframes whose progress is faked by a timer
//! - fully simulated playback of a fixed length

pub mod element;
pub mod embed;
pub mod simulated;

pub use element::ElementPlayer;
pub use embed::{EMBED_EVENTS, EmbedPlayer};
pub use simulated::SimulatedPlayer;

use gatecast_contracts::adapter::{
    BackendEvent, BackendFailure, PlayerAdapter, StartError,
};
use gatecast_contracts::element::{MediaElement, MediaEventKind};
use gatecast_contracts::embed::{EmbedChannel, EmbedMessage};
use gatecast_contracts::host::MediaHost;
use gatecast_model::{BackendKind, Volume};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{CoreError, Result};

#[derive(Debug)]
pub enum AnyBackend {
    Simulated(SimulatedPlayer),
    Element(ElementPlayer),
    Embed(EmbedPlayer),
}

impl AnyBackend {
    pub fn simulated(duration: Duration) -> Self {
        AnyBackend::Simulated(SimulatedPlayer::new(duration))
    }

    pub fn plain_frame(duration: Duration) -> Self {
        AnyBackend::Simulated(SimulatedPlayer::plain_frame(duration))
    }

    pub fn element(
        element: Box<dyn MediaElement>,
        duration_hint: Option<f64>,
    ) -> Self {
        AnyBackend::Element(ElementPlayer::new(element, duration_hint))
    }

    pub fn embed(
        channel: Box<dyn EmbedChannel>,
        duration_hint: Option<f64>,
    ) -> Self {
        AnyBackend::Embed(EmbedPlayer::new(channel, duration_hint))
    }

    /// Translate a native media event. Other variants ignore it.
    pub fn translate_element(
        &self,
        kind: MediaEventKind,
    ) -> Option<BackendEvent> {
        match self {
            AnyBackend::Element(player) => player.translate(kind),
            _ => None,
        }
    }

    /// Translate an embed player message. Other variants ignore it.
    pub fn translate_embed(
        &mut self,
        message: &EmbedMessage,
    ) -> Vec<BackendEvent> {
        match self {
            AnyBackend::Embed(player) => player.translate(message),
            _ => Vec::new(),
        }
    }
}

impl PlayerAdapter for AnyBackend {
    fn kind(&self) -> BackendKind {
        match self {
            AnyBackend::Simulated(player) => player.kind(),
            AnyBackend::Element(player) => player.kind(),
            AnyBackend::Embed(player) => player.kind(),
        }
    }

    fn start(&mut self) -> std::result::Result<(), StartError> {
        match self {
            AnyBackend::Simulated(player) => player.start(),
            AnyBackend::Element(player) => player.start(),
            AnyBackend::Embed(player) => player.start(),
        }
    }

    fn pause(&mut self) {
        match self {
            AnyBackend::Simulated(player) => player.pause(),
            AnyBackend::Element(player) => player.pause(),
            AnyBackend::Embed(player) => player.pause(),
        }
    }

    fn resume(&mut self) -> std::result::Result<(), StartError> {
        match self {
            AnyBackend::Simulated(player) => player.resume(),
            AnyBackend::Element(player) => player.resume(),
            AnyBackend::Embed(player) => player.resume(),
        }
    }

    fn is_paused(&self) -> bool {
        match self {
            AnyBackend::Simulated(player) => player.is_paused(),
            AnyBackend::Element(player) => player.is_paused(),
            AnyBackend::Embed(player) => player.is_paused(),
        }
    }

    fn set_volume(&mut self, volume: Volume) {
        match self {
            AnyBackend::Simulated(player) => player.set_volume(volume),
            AnyBackend::Element(player) => player.set_volume(volume),
            AnyBackend::Embed(player) => player.set_volume(volume),
        }
    }

    fn duration(&self) -> Option<f64> {
        match self {
            AnyBackend::Simulated(player) => player.duration(),
            AnyBackend::Element(player) => player.duration(),
            AnyBackend::Embed(player) => player.duration(),
        }
    }

    fn current_time(&self) -> f64 {
        match self {
            AnyBackend::Simulated(player) => player.current_time(),
            AnyBackend::Element(player) => player.current_time(),
            AnyBackend::Embed(player) => player.current_time(),
        }
    }

    fn advance(&mut self, elapsed: Duration) -> Vec<BackendEvent> {
        match self {
            AnyBackend::Simulated(player) => player.advance(elapsed),
            AnyBackend::Element(player) => player.advance(elapsed),
            AnyBackend::Embed(player) => player.advance(elapsed),
        }
    }

    fn reset(&mut self) {
        match self {
            AnyBackend::Simulated(player) => player.reset(),
            AnyBackend::Element(player) => player.reset(),
            AnyBackend::Embed(player) => player.reset(),
        }
    }

    fn detach(&mut self) {
        match self {
            AnyBackend::Simulated(player) => player.detach(),
            AnyBackend::Element(player) => player.detach(),
            AnyBackend::Embed(player) => player.detach(),
        }
    }
}

/// How a step's video is embedded.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendSpec {
    Simulated {
        duration: Duration,
    },
    PlainFrame {
        src: Url,
        duration: Duration,
    },
    NativeElement {
        src: Url,
        duration_hint: Option<Duration>,
    },
    EmbedApi {
        provider: String,
        video_id: String,
        duration_hint: Option<Duration>,
    },
}

impl BackendSpec {
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendSpec::Simulated { .. } => BackendKind::Simulated,
            BackendSpec::PlainFrame { .. } => BackendKind::PlainFrame,
            BackendSpec::NativeElement { .. } => BackendKind::NativeElement,
            BackendSpec::EmbedApi { .. } => BackendKind::EmbedApi,
        }
    }

    /// Length of the content when it is known without asking the host.
    pub fn known_duration(&self) -> Option<Duration> {
        match self {
            BackendSpec::Simulated { duration }
            | BackendSpec::PlainFrame { duration, .. } => Some(*duration),
            BackendSpec::NativeElement { duration_hint, .. }
            | BackendSpec::EmbedApi { duration_hint, .. } => *duration_hint,
        }
    }

    /// A timer-driven replacement for hosts that cannot render the real
    /// player, or `None` when the length is unknown.
    pub fn simulated_stand_in(&self) -> Option<BackendSpec> {
        self.known_duration()
            .map(|duration| BackendSpec::Simulated { duration })
    }

    pub fn build(&self, host: &mut dyn MediaHost) -> Result<AnyBackend> {
        let kind = self.kind();
        let backend_error =
            |source: BackendFailure| CoreError::Backend { kind, source };

        let backend = match self {
            BackendSpec::Simulated { duration } => {
                AnyBackend::simulated(*duration)
            }
            BackendSpec::PlainFrame { duration, .. } => {
                AnyBackend::plain_frame(*duration)
            }
            BackendSpec::NativeElement { src, duration_hint } => {
                AnyBackend::element(
                    host.create_element(src).map_err(backend_error)?,
                    duration_hint.map(|duration| duration.as_secs_f64()),
                )
            }
            BackendSpec::EmbedApi {
                provider,
                video_id,
                duration_hint,
            } => AnyBackend::embed(
                host.create_embed(provider, video_id)
                    .map_err(backend_error)?,
                duration_hint.map(|duration| duration.as_secs_f64()),
            ),
        };
        debug!(%kind, "backend created");
        Ok(backend)
    }
}

/// Host without media capabilities. Only timer-driven specs can be built
/// against it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl MediaHost for HeadlessHost {
    fn create_element(
        &mut self,
        src: &Url,
    ) -> std::result::Result<Box<dyn MediaElement>, BackendFailure> {
        Err(BackendFailure::Unsupported(format!(
            "no media element available for {src}"
        )))
    }

    fn create_embed(
        &mut self,
        provider: &str,
        video_id: &str,
    ) -> std::result::Result<Box<dyn EmbedChannel>, BackendFailure> {
        Err(BackendFailure::Unsupported(format!(
            "no {provider} player available for video {video_id}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_host_builds_timer_backends_only() {
        let mut host = HeadlessHost;
        let spec = BackendSpec::Simulated {
            duration: Duration::from_secs(3),
        };
        let backend = spec.build(&mut host).unwrap();
        assert_eq!(backend.kind(), BackendKind::Simulated);

        let embed = BackendSpec::EmbedApi {
            provider: "vimeo".into(),
            video_id: "1089786027".into(),
            duration_hint: None,
        };
        assert!(matches!(
            embed.build(&mut host),
            Err(CoreError::Backend {
                kind: BackendKind::EmbedApi,
                ..
            })
        ));
        assert_eq!(embed.simulated_stand_in(), None);
    }

    #[test]
    fn stand_in_keeps_known_duration() {
        let spec = BackendSpec::NativeElement {
            src: Url::parse("https://cdn.example.com/intro.mp4").unwrap(),
            duration_hint: Some(Duration::from_secs(95)),
        };
        assert_eq!(
            spec.simulated_stand_in(),
            Some(BackendSpec::Simulated {
                duration: Duration::from_secs(95)
            })
        );
    }
}
