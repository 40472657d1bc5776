//! Convenience re-exports for crates that consume the model wholesale.

pub use crate::access::{AccessBlock, EpochMillis};
pub use crate::gate::{GatePhase, WindowOpens};
pub use crate::ids::{ClientId, SessionId, TimerId};
pub use crate::playback::{BackendKind, PlaybackStatus, Volume};
pub use crate::route::Route;
pub use crate::time_format::{format_clock, format_optional_clock};
