use gatecast_model::{EpochMillis, PlaybackStatus};
use std::time::Duration;

use crate::timers::{TimerKind, TimerRegistry};

pub const DEFAULT_HIDE_AFTER: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsConfig {
    pub hide_after: Duration,
    /// Touch-first device: auto-hide only starts after activity, never on
    /// play, and pointer-leave is meaningless.
    pub coarse_pointer: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_after: DEFAULT_HIDE_AFTER,
            coarse_pointer: false,
        }
    }
}

/// Auto-hiding player controls.
///
/// Controls are always shown unless playing. While playing they hide after
/// `hide_after` without activity.
#[derive(Debug, Clone)]
pub struct ControlsVisibility {
    config: ControlsConfig,
    playing: bool,
    shown: bool,
}

impl ControlsVisibility {
    pub fn new(config: ControlsConfig) -> Self {
        Self {
            config,
            playing: false,
            shown: true,
        }
    }

    pub fn config(&self) -> ControlsConfig {
        self.config
    }

    pub fn is_visible(&self) -> bool {
        !self.playing || self.shown
    }

    pub fn on_status(
        &mut self,
        status: PlaybackStatus,
        timers: &mut TimerRegistry,
        now: EpochMillis,
    ) {
        let playing = status.is_playing();
        if playing == self.playing {
            return;
        }
        self.playing = playing;
        self.shown = true;
        timers.cancel_kind(TimerKind::ControlsHide);
        if playing && !self.config.coarse_pointer {
            self.schedule_hide(timers, now);
        }
    }

    /// Pointer movement or a tap over the player.
    pub fn on_activity(&mut self, timers: &mut TimerRegistry, now: EpochMillis) {
        self.shown = true;
        timers.cancel_kind(TimerKind::ControlsHide);
        if self.playing {
            self.schedule_hide(timers, now);
        }
    }

    /// A tap toggles the controls while playing.
    pub fn on_touch(&mut self, timers: &mut TimerRegistry, now: EpochMillis) {
        if self.playing && self.shown {
            self.shown = false;
            timers.cancel_kind(TimerKind::ControlsHide);
        } else {
            self.on_activity(timers, now);
        }
    }

    pub fn on_pointer_leave(&mut self, timers: &mut TimerRegistry) {
        if self.playing && !self.config.coarse_pointer {
            self.shown = false;
            timers.cancel_kind(TimerKind::ControlsHide);
        }
    }

    /// The hide timer came due.
    pub fn on_hide_timer(&mut self) {
        if self.playing {
            self.shown = false;
        }
    }

    fn schedule_hide(&self, timers: &mut TimerRegistry, now: EpochMillis) {
        timers.schedule_after(TimerKind::ControlsHide, now, self.config.hide_after);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_due(
        controls: &mut ControlsVisibility,
        timers: &mut TimerRegistry,
        now: EpochMillis,
    ) {
        for timer in timers.take_due(now) {
            if timer.kind == TimerKind::ControlsHide {
                controls.on_hide_timer();
            }
        }
    }

    #[test]
    fn hides_after_inactivity_while_playing() {
        let mut timers = TimerRegistry::new();
        let mut controls = ControlsVisibility::new(ControlsConfig::default());
        controls.on_status(PlaybackStatus::Playing, &mut timers, EpochMillis(0));

        fire_due(&mut controls, &mut timers, EpochMillis(2_999));
        assert!(controls.is_visible());
        fire_due(&mut controls, &mut timers, EpochMillis(3_000));
        assert!(!controls.is_visible());
    }

    #[test]
    fn activity_resets_the_hide_timer() {
        let mut timers = TimerRegistry::new();
        let mut controls = ControlsVisibility::new(ControlsConfig::default());
        controls.on_status(PlaybackStatus::Playing, &mut timers, EpochMillis(0));
        controls.on_activity(&mut timers, EpochMillis(2_000));

        fire_due(&mut controls, &mut timers, EpochMillis(4_000));
        assert!(controls.is_visible());
        fire_due(&mut controls, &mut timers, EpochMillis(5_000));
        assert!(!controls.is_visible());
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn always_visible_unless_playing() {
        let mut timers = TimerRegistry::new();
        let mut controls = ControlsVisibility::new(ControlsConfig::default());
        controls.on_status(PlaybackStatus::Playing, &mut timers, EpochMillis(0));
        controls.on_pointer_leave(&mut timers);
        assert!(!controls.is_visible());

        controls.on_status(PlaybackStatus::Paused, &mut timers, EpochMillis(10));
        assert!(controls.is_visible());
        assert!(!timers.is_pending(TimerKind::ControlsHide));
    }

    #[test]
    fn coarse_pointer_waits_for_activity() {
        let mut timers = TimerRegistry::new();
        let mut controls = ControlsVisibility::new(ControlsConfig {
            coarse_pointer: true,
            ..ControlsConfig::default()
        });
        controls.on_status(PlaybackStatus::Playing, &mut timers, EpochMillis(0));
        assert!(!timers.is_pending(TimerKind::ControlsHide));
        controls.on_pointer_leave(&mut timers);
        assert!(controls.is_visible());

        controls.on_touch(&mut timers, EpochMillis(100));
        assert!(!controls.is_visible());
        controls.on_touch(&mut timers, EpochMillis(200));
        assert!(controls.is_visible());
        assert!(timers.is_pending(TimerKind::ControlsHide));
    }
}
