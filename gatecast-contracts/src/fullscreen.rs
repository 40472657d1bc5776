//! Document-level fullscreen and screen-orientation ports.

use std::fmt::Debug;

/// Vendor flavours of the fullscreen API, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FullscreenVariant {
    /// `requestFullscreen` / `exitFullscreen`.
    Standard,
    /// `webkitRequestFullscreen` / `webkitExitFullscreen` (Safari).
    Webkit,
    /// `webkitEnterFullscreen` on the video element itself (iOS).
    WebkitVideo,
    /// `mozRequestFullScreen` / `mozCancelFullScreen`.
    Moz,
    /// `msRequestFullscreen` / `msExitFullscreen`.
    Ms,
}

impl FullscreenVariant {
    pub const ATTEMPT_ORDER: [FullscreenVariant; 5] = [
        FullscreenVariant::Standard,
        FullscreenVariant::Webkit,
        FullscreenVariant::WebkitVideo,
        FullscreenVariant::Moz,
        FullscreenVariant::Ms,
    ];
}

/// Failure of a best-effort browser API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("{0} is not supported")]
    Unsupported(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Handle returned when subscribing to change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub trait FullscreenPort: Debug {
    /// Ask for the player container to go fullscreen.
    fn request(&mut self, variant: FullscreenVariant) -> Result<(), PortError>;

    fn exit(&mut self, variant: FullscreenVariant) -> Result<(), PortError>;

    /// Start delivering fullscreen-change notifications (all vendor event
    /// names) to the owning step.
    fn subscribe(&mut self) -> ListenerId;

    fn unsubscribe(&mut self, id: ListenerId);
}

pub trait OrientationPort: Debug {
    fn lock_landscape(&mut self) -> Result<(), PortError>;

    fn unlock(&mut self) -> Result<(), PortError>;
}
