//! Playback domain
//!
//! One [`Session`] per watch attempt, driven by a backend through the
//! [`PlayerAdapter`](gatecast_contracts::adapter::PlayerAdapter) surface.

pub mod session;
pub mod throttle;
pub mod timer;
pub mod volume;

pub use session::{Session, SessionSignal};
pub use throttle::{DEFAULT_TIME_UPDATE_INTERVAL, TimeUpdateThrottle};
pub use timer::{PlaybackTimer, TimerAdvance};
pub use volume::VolumeMemory;
