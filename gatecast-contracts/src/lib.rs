//! Trait surfaces that describe how the funnel engine talks to its host.
//!
//! Everything with global or platform-specific state lives behind a port:
//! the embed backends, the document fullscreen and orientation APIs, the
//! visitor's local storage, navigation and the wall clock.

pub mod adapter;
pub mod clock;
pub mod element;
pub mod embed;
pub mod fullscreen;
pub mod host;
pub mod navigation;
pub mod storage;

/// Frequently used trait combinators for the engine and host crates.
pub mod prelude {
    pub use super::adapter::{
        BackendEvent, BackendFailure, PlayerAdapter, StartError,
    };
    pub use super::clock::{Clock, SystemClock};
    pub use super::element::{ElementError, MediaElement, MediaEventKind};
    pub use super::embed::{EmbedChannel, EmbedError, EmbedMessage};
    pub use super::fullscreen::{
        FullscreenPort, FullscreenVariant, ListenerId, OrientationPort,
        PortError,
    };
    pub use super::host::MediaHost;
    pub use super::navigation::Navigator;
    pub use super::storage::{KeyValueStore, StoreError};
}
