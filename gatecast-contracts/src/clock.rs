use gatecast_model::EpochMillis;
use std::fmt::Debug;

/// Wall clock used for access windows and access blocks.
pub trait Clock: Debug {
    fn now(&self) -> EpochMillis;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> EpochMillis {
        EpochMillis(chrono::Utc::now().timestamp_millis())
    }
}
