use gatecast_model::{EpochMillis, GatePhase, PlaybackStatus, Volume, format_clock};

use crate::gate::GateSequencer;
use crate::playback::Session;
use crate::shell::controls::ControlsVisibility;
use crate::shell::fullscreen::FullscreenController;
use crate::shell::progress::ProgressReadout;

/// What covers the player surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Loading,
    /// Autoplay was refused; the visitor has to press play.
    ManualPlay,
    /// "Video failed to load, retry?"
    ErrorBanner { message: String },
}

/// Snapshot of everything a renderer draws for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellView {
    pub status: PlaybackStatus,
    pub overlay: Overlay,
    pub controls_visible: bool,
    pub progress: ProgressReadout,
    pub volume: Volume,
    pub muted: bool,
    pub fullscreen: bool,
    /// Shown while the video plays with a known length and the gate is
    /// still locked.
    pub keep_watching_hint: bool,
    pub cta_visible: bool,
    pub popup_visible: bool,
    pub gate: GatePhase,
    /// `m:ss` left in an open access window.
    pub access_countdown: Option<String>,
    pub expired: bool,
    pub completed: bool,
}

/// Borrowed state a [`ShellView`] is composed from.
#[derive(Debug)]
pub struct ViewSources<'a> {
    pub session: &'a Session,
    pub gate: &'a GateSequencer,
    pub controls: &'a ControlsVisibility,
    pub fullscreen: &'a FullscreenController,
    pub popup_visible: bool,
    pub max_silent_retries: u32,
}

impl ShellView {
    pub fn compose(sources: ViewSources<'_>, now: EpochMillis) -> Self {
        let ViewSources {
            session,
            gate,
            controls,
            fullscreen,
            popup_visible,
            max_silent_retries,
        } = sources;
        let status = session.status();
        let phase = gate.phase();

        let overlay = if session.error_visible(max_silent_retries) {
            Overlay::ErrorBanner {
                message: session
                    .failure()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "video failed to load".to_string()),
            }
        } else if session.manual_play_required() && status == PlaybackStatus::Idle {
            Overlay::ManualPlay
        } else if matches!(status, PlaybackStatus::Loading | PlaybackStatus::Errored) {
            Overlay::Loading
        } else {
            Overlay::None
        };

        let access_countdown = gate
            .remaining(now)
            .map(|remaining| format_clock(remaining.as_secs_f64().ceil()));

        Self {
            status,
            overlay,
            controls_visible: controls.is_visible(),
            progress: ProgressReadout::new(session.current_time(), session.duration()),
            volume: session.volume(),
            muted: session.is_muted(),
            fullscreen: fullscreen.is_active(),
            keep_watching_hint: status.is_playing()
                && session.duration().is_some()
                && phase == GatePhase::Locked,
            cta_visible: matches!(
                phase,
                GatePhase::Unlocked | GatePhase::WindowOpen { .. }
            ),
            popup_visible,
            gate: phase,
            access_countdown,
            expired: phase == GatePhase::Expired,
            completed: phase == GatePhase::Completed,
        }
    }
}
