//! # Gatecast Core
//!
//! Headless engine for a gated video funnel: a visitor watches a video, the
//! next step's call-to-action unlocks only once that video has ended, and an
//! optional access window rescinds the offer when it runs out.
//!
//! ## Architecture
//!
//! - [`playback`]: the playback timer, time-update throttling, volume memory
//!   and the [`playback::Session`] status machine
//! - [`backend`]: the tagged player adapter variants (native element, embed
//!   API, plain frame, simulated)
//! - [`gate`]: the gate sequencer and the access-block store
//! - [`shell`]: progress readouts, auto-hiding controls, fullscreen and the
//!   view snapshot a renderer draws
//! - [`funnel`]: page-level steps composing all of the above, plus the
//!   funnel that moves between them
//! - [`storage`]: key/value stores backing access blocks
//!
//! All mutation happens on the caller's thread in response to discrete
//! events; nothing here spawns threads or holds locks.
//!
//! ## Example
//!
//! ```no_run
//! use gatecast_core::prelude::*;
//! use std::time::Duration;
//!
//! let mut session = Session::new(
//!     AnyBackend::simulated(Duration::from_secs(120)),
//!     Volume::new(0.7),
//! );
//! session.start();
//! session.tick(Duration::from_secs(120));
//! assert_eq!(session.status(), PlaybackStatus::Ended);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod backend;
pub mod error;
pub mod funnel;
pub mod gate;
pub mod playback;
pub mod prelude;
pub mod shell;
pub mod storage;
pub mod timers;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::{CoreError, Result};
