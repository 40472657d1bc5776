use gatecast_contracts::adapter::{
    BackendEvent, BackendFailure, PlayerAdapter, StartError,
};
use gatecast_contracts::element::{ElementError, MediaElement, MediaEventKind};
use gatecast_model::{BackendKind, Volume};
use tracing::debug;

/// Adapter over a native `<video>` element.
///
/// A configured duration stands in while the element reports NaN or zero.
#[derive(Debug)]
pub struct ElementPlayer {
    element: Box<dyn MediaElement>,
    duration_hint: Option<f64>,
    attached: bool,
}

impl ElementPlayer {
    pub fn new(
        mut element: Box<dyn MediaElement>,
        duration_hint: Option<f64>,
    ) -> Self {
        for kind in MediaEventKind::ALL {
            element.add_listener(kind);
        }
        Self {
            element,
            duration_hint: duration_hint
                .filter(|hint| hint.is_finite() && *hint > 0.0),
            attached: true,
        }
    }

    /// Turn a DOM media event into a normalized event, reading whatever
    /// the event itself doesn't carry from the element.
    pub fn translate(&self, kind: MediaEventKind) -> Option<BackendEvent> {
        if !self.attached {
            return None;
        }
        let event = match kind {
            MediaEventKind::Play => BackendEvent::Playing,
            MediaEventKind::Pause => BackendEvent::Paused,
            MediaEventKind::Ended => BackendEvent::Ended,
            MediaEventKind::TimeUpdate => {
                let time = self.element.current_time();
                if !time.is_finite() {
                    return None;
                }
                BackendEvent::TimeUpdate(time)
            }
            MediaEventKind::LoadedMetadata => BackendEvent::Metadata {
                duration: self.duration()?,
            },
            MediaEventKind::VolumeChange => {
                let volume = if self.element.muted() {
                    Volume::MUTED
                } else {
                    Volume::new(self.element.volume())
                };
                BackendEvent::VolumeChanged(volume)
            }
            MediaEventKind::Error => {
                let (code, message) = self
                    .element
                    .error()
                    .unwrap_or_else(|| (4, "media error".to_string()));
                BackendEvent::Failed(element_failure(
                    ElementError::from_media_error_code(code, &message),
                ))
            }
        };
        Some(event)
    }
}

fn element_failure(error: ElementError) -> BackendFailure {
    match error {
        ElementError::Network(message) => BackendFailure::Network(message),
        ElementError::Decode(message) => BackendFailure::Decode(message),
        other => BackendFailure::Unsupported(other.to_string()),
    }
}

impl PlayerAdapter for ElementPlayer {
    fn kind(&self) -> BackendKind {
        BackendKind::NativeElement
    }

    fn start(&mut self) -> Result<(), StartError> {
        match self.element.play() {
            Ok(()) => Ok(()),
            Err(ElementError::NotAllowed(reason))
            | Err(ElementError::Aborted(reason)) => {
                Err(StartError::Blocked(reason))
            }
            Err(other) => Err(StartError::Backend(element_failure(other))),
        }
    }

    fn pause(&mut self) {
        if !self.element.paused() {
            self.element.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn set_volume(&mut self, volume: Volume) {
        self.element.set_volume(volume.get());
        self.element.set_muted(volume.is_muted());
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (duration.is_finite() && duration > 0.0)
            .then_some(duration)
            .or(self.duration_hint)
    }

    fn current_time(&self) -> f64 {
        let time = self.element.current_time();
        if time.is_finite() { time.max(0.0) } else { 0.0 }
    }

    fn reset(&mut self) {
        self.element.pause();
        self.element.load();
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        for kind in MediaEventKind::ALL {
            self.element.remove_listener(kind);
        }
        self.attached = false;
        debug!("media element listeners removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeElement;

    #[test]
    fn not_allowed_maps_to_blocked() {
        let element = FakeElement::new();
        element.reject_play(ElementError::NotAllowed("gesture".into()));
        let mut player = ElementPlayer::new(Box::new(element.clone()), None);
        assert_eq!(
            player.start(),
            Err(StartError::Blocked("gesture".into()))
        );
    }

    #[test]
    fn unknown_duration_is_none_not_zero() {
        let element = FakeElement::new();
        let player = ElementPlayer::new(Box::new(element.clone()), None);
        assert_eq!(player.duration(), None);
        assert_eq!(player.translate(MediaEventKind::LoadedMetadata), None);

        element.set_duration(120.0);
        assert_eq!(player.duration(), Some(120.0));
    }

    #[test]
    fn configured_duration_covers_an_unknown_element_length() {
        let element = FakeElement::new();
        let player = ElementPlayer::new(Box::new(element.clone()), Some(90.0));
        assert_eq!(player.duration(), Some(90.0));
        assert_eq!(
            player.translate(MediaEventKind::LoadedMetadata),
            Some(BackendEvent::Metadata { duration: 90.0 })
        );

        element.set_duration(95.5);
        assert_eq!(player.duration(), Some(95.5));

        let player = ElementPlayer::new(Box::new(FakeElement::new()), Some(0.0));
        assert_eq!(player.duration(), None);
    }

    #[test]
    fn media_error_maps_to_failure() {
        let element = FakeElement::new();
        element.set_error(2, "connection reset");
        let player = ElementPlayer::new(Box::new(element.clone()), None);
        assert_eq!(
            player.translate(MediaEventKind::Error),
            Some(BackendEvent::Failed(BackendFailure::Network(
                "connection reset".into()
            )))
        );
    }

    #[test]
    fn detach_removes_every_listener() {
        let element = FakeElement::new();
        let mut player = ElementPlayer::new(Box::new(element.clone()), None);
        assert_eq!(element.listener_count(), MediaEventKind::ALL.len());
        player.detach();
        player.detach();
        assert_eq!(element.listener_count(), 0);
        assert_eq!(player.translate(MediaEventKind::Play), None);
    }
}
