//! Core data model definitions shared across Gatecast crates.
#![allow(missing_docs)]

pub mod access;
pub mod error;
pub mod gate;
pub mod ids;
pub mod playback;
pub mod prelude;
pub mod route;
pub mod time_format;

// Intentionally curated re-exports for downstream consumers.
pub use access::{ACCESS_BLOCK_KEY_PREFIX, AccessBlock, EpochMillis};
pub use error::{ModelError, Result as ModelResult};
pub use gate::{GatePhase, WindowOpens};
pub use ids::{ClientId, SessionId, TimerId};
pub use playback::{BackendKind, PlaybackStatus, Volume};
pub use route::Route;
pub use time_format::{format_clock, format_optional_clock};
