use crate::access::EpochMillis;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Progression of a funnel step's gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "phase", rename_all = "snake_case"))]
pub enum GatePhase {
    /// Video has not ended yet; the call-to-action is unreachable.
    #[default]
    Locked,
    /// Video ended; the call-to-action is visible.
    Unlocked,
    /// The access window is running until `expires_at`.
    WindowOpen { expires_at: EpochMillis },
    /// The visitor acted in time. Terminal.
    Completed,
    /// The access window ran out, or an access block is active. Terminal.
    Expired,
}

impl GatePhase {
    /// True once the gating condition has been satisfied, including the
    /// terminal phases reached afterwards.
    pub fn is_unlocked(&self) -> bool {
        !matches!(self, GatePhase::Locked)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GatePhase::Completed | GatePhase::Expired)
    }

    pub fn expires_at(&self) -> Option<EpochMillis> {
        match self {
            GatePhase::WindowOpen { expires_at } => Some(*expires_at),
            _ => None,
        }
    }
}

/// When a step's access window starts counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WindowOpens {
    /// When the visitor activates the call-to-action.
    #[default]
    OnActivate,
    /// As soon as the call-to-action is revealed.
    OnReveal,
}
