//! Per-step timer bookkeeping.
//!
//! Timers are data: a due time plus a kind. The step polls the registry on
//! every tick and reacts to whatever came due, so cancelling a timer is just
//! removing its entry and nothing can fire once the registry is disposed.

use gatecast_model::{EpochMillis, TimerId};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Hide the player controls after inactivity.
    ControlsHide,
    /// The access window runs out.
    AccessCountdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    pub id: TimerId,
    pub kind: TimerKind,
    pub due: EpochMillis,
}

#[derive(Debug, Default)]
pub struct TimerRegistry {
    next_id: u64,
    pending: BTreeMap<TimerId, DueTimer>,
    disposed: bool,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to come due at `due`. Returns `None` once disposed.
    pub fn schedule(
        &mut self,
        kind: TimerKind,
        due: EpochMillis,
    ) -> Option<TimerId> {
        if self.disposed {
            debug!(?kind, "refusing to schedule on a disposed registry");
            return None;
        }
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.insert(id, DueTimer { id, kind, due });
        Some(id)
    }

    pub fn schedule_after(
        &mut self,
        kind: TimerKind,
        now: EpochMillis,
        delay: Duration,
    ) -> Option<TimerId> {
        self.schedule(kind, now.saturating_add(delay))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id).is_some()
    }

    /// Cancel every pending timer of `kind`, returning how many were
    /// removed.
    pub fn cancel_kind(&mut self, kind: TimerKind) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, timer| timer.kind != kind);
        before - self.pending.len()
    }

    pub fn is_pending(&self, kind: TimerKind) -> bool {
        self.pending.values().any(|timer| timer.kind == kind)
    }

    /// Remove and return every timer due at or before `now`, earliest
    /// first.
    pub fn take_due(&mut self, now: EpochMillis) -> Vec<DueTimer> {
        let due_ids: Vec<TimerId> = self
            .pending
            .values()
            .filter(|timer| timer.due <= now)
            .map(|timer| timer.id)
            .collect();

        let mut due: Vec<DueTimer> = due_ids
            .into_iter()
            .filter_map(|id| self.pending.remove(&id))
            .collect();
        due.sort_by_key(|timer| (timer.due, timer.id));
        due
    }

    pub fn next_due(&self) -> Option<EpochMillis> {
        self.pending.values().map(|timer| timer.due).min()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Cancel everything and refuse later schedules.
    pub fn dispose(&mut self) {
        if !self.pending.is_empty() {
            debug!(cancelled = self.pending.len(), "disposing pending timers");
        }
        self.pending.clear();
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
