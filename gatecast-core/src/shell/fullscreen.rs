use gatecast_contracts::fullscreen::{
    FullscreenPort, FullscreenVariant, ListenerId, OrientationPort,
};
use tracing::debug;

/// Fullscreen toggling over the document-level ports.
///
/// Requests try every vendor variant in order and degrade silently. The
/// fullscreen flag only changes through [`FullscreenController::on_change`],
/// i.e. when the host reports a change, never optimistically.
#[derive(Debug)]
pub struct FullscreenController {
    port: Box<dyn FullscreenPort>,
    orientation: Option<Box<dyn OrientationPort>>,
    listener: Option<ListenerId>,
    active: bool,
    orientation_locked: bool,
}

impl FullscreenController {
    pub fn new(
        mut port: Box<dyn FullscreenPort>,
        orientation: Option<Box<dyn OrientationPort>>,
    ) -> Self {
        let listener = Some(port.subscribe());
        Self {
            port,
            orientation,
            listener,
            active: false,
            orientation_locked: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn orientation_locked(&self) -> bool {
        self.orientation_locked
    }

    pub fn toggle(&mut self) -> bool {
        if self.active { self.exit() } else { self.enter() }
    }

    /// Returns whether some variant accepted the request.
    pub fn enter(&mut self) -> bool {
        if self.listener.is_none() {
            return false;
        }
        let accepted = FullscreenVariant::ATTEMPT_ORDER.into_iter().any(|variant| {
            match self.port.request(variant) {
                Ok(()) => true,
                Err(err) => {
                    debug!(?variant, %err, "fullscreen request failed");
                    false
                }
            }
        });
        if !accepted {
            debug!("fullscreen unavailable");
            return false;
        }

        if let Some(orientation) = self.orientation.as_mut() {
            match orientation.lock_landscape() {
                Ok(()) => self.orientation_locked = true,
                Err(err) => debug!(%err, "orientation lock unavailable"),
            }
        }
        true
    }

    pub fn exit(&mut self) -> bool {
        if self.listener.is_none() {
            return false;
        }
        let accepted = FullscreenVariant::ATTEMPT_ORDER.into_iter().any(|variant| {
            match self.port.exit(variant) {
                Ok(()) => true,
                Err(err) => {
                    debug!(?variant, %err, "fullscreen exit failed");
                    false
                }
            }
        });
        if !accepted {
            debug!("fullscreen exit unavailable");
        }
        accepted
    }

    /// The host reported a fullscreen change. Leaving fullscreen releases
    /// an orientation lock taken on enter.
    pub fn on_change(&mut self, fullscreen: bool) -> bool {
        if self.listener.is_none() || fullscreen == self.active {
            return false;
        }
        self.active = fullscreen;
        if !fullscreen {
            self.release_orientation();
        }
        true
    }

    fn release_orientation(&mut self) {
        if !self.orientation_locked {
            return;
        }
        self.orientation_locked = false;
        if let Some(orientation) = self.orientation.as_mut()
            && let Err(err) = orientation.unlock()
        {
            debug!(%err, "orientation unlock failed");
        }
    }

    /// Stop listening for changes. Later calls are ignored.
    pub fn detach(&mut self) {
        if let Some(id) = self.listener.take() {
            self.port.unsubscribe(id);
        }
        self.release_orientation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingFullscreen, RecordingOrientation};

    #[test]
    fn falls_through_vendor_variants() {
        let port = RecordingFullscreen::supporting(&[FullscreenVariant::Moz]);
        let mut controller = FullscreenController::new(Box::new(port.clone()), None);

        assert!(controller.enter());
        assert_eq!(
            port.requests(),
            vec![
                FullscreenVariant::Standard,
                FullscreenVariant::Webkit,
                FullscreenVariant::WebkitVideo,
                FullscreenVariant::Moz
            ]
        );
        assert!(!controller.is_active());
        assert!(controller.on_change(true));
        assert!(controller.is_active());
    }

    #[test]
    fn unsupported_fullscreen_degrades_silently() {
        let port = RecordingFullscreen::supporting(&[]);
        let mut controller = FullscreenController::new(Box::new(port.clone()), None);
        assert!(!controller.toggle());
        assert!(!controller.is_active());
    }

    #[test]
    fn orientation_released_on_exit() {
        let port = RecordingFullscreen::supporting(&[FullscreenVariant::Standard]);
        let orientation = RecordingOrientation::new();
        let mut controller = FullscreenController::new(
            Box::new(port.clone()),
            Some(Box::new(orientation.clone())),
        );

        controller.enter();
        controller.on_change(true);
        assert!(orientation.is_locked());

        controller.on_change(false);
        assert!(!orientation.is_locked());
        assert!(!controller.orientation_locked());
    }

    #[test]
    fn detach_unsubscribes_and_ignores_later_changes() {
        let port = RecordingFullscreen::supporting(&[FullscreenVariant::Standard]);
        let mut controller = FullscreenController::new(Box::new(port.clone()), None);
        assert_eq!(port.subscriber_count(), 1);
        controller.detach();
        assert_eq!(port.subscriber_count(), 0);
        assert!(!controller.on_change(true));
        assert!(!controller.enter());
    }
}
