use gatecast_contracts::element::MediaEventKind;
use gatecast_contracts::embed::EmbedMessage;
use gatecast_contracts::fullscreen::{FullscreenPort, OrientationPort};
use gatecast_contracts::host::MediaHost;
use gatecast_contracts::navigation::Navigator;
use gatecast_contracts::storage::KeyValueStore;
use gatecast_model::{ClientId, EpochMillis, PlaybackStatus, Route, Volume};
use tracing::{debug, info};
use url::Url;

use crate::error::Result;
use crate::funnel::definition::{StepDefinition, StepSettings};
use crate::gate::{AccessBlockStore, GateSequencer, GateSignal, NextAction};
use crate::playback::{Session, SessionSignal};
use crate::shell::{ControlsVisibility, FullscreenController, ShellView, ViewSources};
use crate::timers::{TimerKind, TimerRegistry};

/// Host collaborators handed to a step when it is created.
#[derive(Debug)]
pub struct StepPorts {
    pub fullscreen: Box<dyn FullscreenPort>,
    /// Only present on devices that can lock screen orientation.
    pub orientation: Option<Box<dyn OrientationPort>>,
    pub navigator: Box<dyn Navigator>,
    pub store: Box<dyn KeyValueStore>,
    pub media: Box<dyn MediaHost>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UserAction {
    /// The big play button, including the manual one shown after a
    /// refused autoplay.
    PressPlay,
    TogglePlay,
    Pause,
    Resume,
    SetVolume(Volume),
    ToggleMute,
    PointerActivity,
    PointerLeave,
    Touch,
    ToggleFullscreen,
    Retry,
    ActivateCallToAction,
    ConfirmPopup,
    DismissPopup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    User(UserAction),
    /// A DOM event fired by a native media element.
    Element(MediaEventKind),
    /// A message posted by an embedded player.
    Embed(EmbedMessage),
    FullscreenChanged(bool),
    /// Wall-clock time passed.
    Tick,
}

/// Something the host may want to react to beyond re-rendering the view.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEffect {
    StatusChanged(PlaybackStatus),
    ManualPlayRequired,
    ErrorShown { message: String },
    SessionEnded,
    CallToActionRevealed,
    PopupShown,
    PopupHidden,
    AccessWindowOpened { expires_at: EpochMillis },
    Completed,
    Navigated(Route),
    LinkOpened(Url),
    AccessExpired { blocked_until: Option<EpochMillis> },
    AccessBlocked { until: EpochMillis },
    FullscreenChanged(bool),
    /// The funnel opened on the in-app browser notice.
    InAppNoticeShown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Created,
    Mounted,
    Unmounted,
}

/// One page of the funnel: a video player gating a call-to-action.
///
/// Every mutation goes through [`FunnelStep::handle`]. The step owns its
/// timers and host listeners; [`FunnelStep::unmount`] (or dropping the
/// step) cancels all of them, and events arriving afterwards are ignored.
#[derive(Debug)]
pub struct FunnelStep {
    route: Route,
    settings: StepSettings,
    session: Session,
    gate: GateSequencer,
    controls: ControlsVisibility,
    fullscreen: FullscreenController,
    navigator: Box<dyn Navigator>,
    timers: TimerRegistry,
    popup_visible: bool,
    last_seen: Option<EpochMillis>,
    lifecycle: Lifecycle,
}

impl FunnelStep {
    pub fn new(
        definition: &StepDefinition,
        settings: StepSettings,
        client: ClientId,
        ports: StepPorts,
    ) -> Result<Self> {
        let StepPorts {
            fullscreen,
            orientation,
            navigator,
            store,
            mut media,
        } = ports;

        let backend = definition.backend.build(media.as_mut())?;
        let session = Session::new(backend, settings.initial_volume);
        let gate = GateSequencer::new(
            definition.gate.clone(),
            client,
            AccessBlockStore::new(store),
        );

        Ok(Self {
            route: definition.route.clone(),
            settings,
            session,
            gate,
            controls: ControlsVisibility::new(settings.controls),
            fullscreen: FullscreenController::new(fullscreen, orientation),
            navigator,
            timers: TimerRegistry::new(),
            popup_visible: false,
            last_seen: None,
            lifecycle: Lifecycle::Created,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn gate(&self) -> &GateSequencer {
        &self.gate
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle == Lifecycle::Mounted
    }

    pub fn popup_visible(&self) -> bool {
        self.popup_visible
    }

    /// When the next timer comes due, for hosts that sleep between ticks.
    pub fn next_wake(&self) -> Option<EpochMillis> {
        self.timers.next_due()
    }

    /// Check for an earlier access block and attempt autoplay.
    pub fn mount(&mut self, now: EpochMillis) -> Vec<StepEffect> {
        if self.lifecycle != Lifecycle::Created {
            return Vec::new();
        }
        self.lifecycle = Lifecycle::Mounted;
        self.last_seen = Some(now);
        info!(route = %self.route, client = %self.gate.client(), "step mounted");

        let mut effects = Vec::new();
        let before = self.session.status();
        let signals = self.gate.mount(now);
        self.apply_gate(signals, &mut effects);
        if self.settings.autoplay {
            let signals = self.session.start();
            self.apply_session(signals, now, &mut effects);
        }
        self.sync_status(before, now, &mut effects);
        effects
    }

    pub fn handle(&mut self, event: StepEvent, now: EpochMillis) -> Vec<StepEffect> {
        if self.lifecycle != Lifecycle::Mounted {
            debug!(route = %self.route, ?event, "ignoring event outside mount");
            return Vec::new();
        }

        let mut effects = Vec::new();
        let before = self.session.status();
        self.catch_up(now, &mut effects);

        match event {
            StepEvent::User(action) => self.on_user(action, now, &mut effects),
            StepEvent::Element(kind) => {
                let signals = self.session.on_element_event(kind);
                self.apply_session(signals, now, &mut effects);
            }
            StepEvent::Embed(message) => {
                if message.event == "fullscreenchange" {
                    if let Some(fullscreen) = message.fullscreen() {
                        self.on_fullscreen_change(fullscreen, &mut effects);
                    }
                } else {
                    let signals = self.session.on_embed_message(&message);
                    self.apply_session(signals, now, &mut effects);
                }
            }
            StepEvent::FullscreenChanged(fullscreen) => {
                self.on_fullscreen_change(fullscreen, &mut effects);
            }
            StepEvent::Tick => {}
        }

        self.fire_due_timers(now, &mut effects);
        self.sync_status(before, now, &mut effects);
        effects
    }

    /// Let timer-driven playback catch up with the wall clock.
    fn catch_up(&mut self, now: EpochMillis, effects: &mut Vec<StepEffect>) {
        let elapsed = self
            .last_seen
            .map(|last| last.until(now))
            .unwrap_or_default();
        self.last_seen = Some(now.max(self.last_seen.unwrap_or(now)));
        if !elapsed.is_zero() {
            let signals = self.session.tick(elapsed);
            self.apply_session(signals, now, effects);
        }
    }

    fn fire_due_timers(&mut self, now: EpochMillis, effects: &mut Vec<StepEffect>) {
        for timer in self.timers.take_due(now) {
            match timer.kind {
                TimerKind::ControlsHide => self.controls.on_hide_timer(),
                TimerKind::AccessCountdown => {
                    let signals = self.gate.tick(now);
                    self.apply_gate(signals, effects);
                }
            }
        }
    }

    fn on_user(
        &mut self,
        action: UserAction,
        now: EpochMillis,
        effects: &mut Vec<StepEffect>,
    ) {
        let signals = match action {
            UserAction::PressPlay => self.session.start(),
            UserAction::TogglePlay => self.session.toggle_play(),
            UserAction::Pause => self.session.pause(),
            UserAction::Resume => self.session.resume(),
            UserAction::SetVolume(volume) => self.session.set_volume(volume),
            UserAction::ToggleMute => self.session.toggle_mute(),
            UserAction::Retry => self.session.retry(),
            UserAction::PointerActivity => {
                self.controls.on_activity(&mut self.timers, now);
                Vec::new()
            }
            UserAction::PointerLeave => {
                self.controls.on_pointer_leave(&mut self.timers);
                Vec::new()
            }
            UserAction::Touch => {
                self.controls.on_touch(&mut self.timers, now);
                Vec::new()
            }
            UserAction::ToggleFullscreen => {
                self.fullscreen.toggle();
                Vec::new()
            }
            UserAction::ActivateCallToAction => {
                let signals = self.gate.activate(now);
                self.apply_gate(signals, effects);
                Vec::new()
            }
            UserAction::ConfirmPopup => {
                if self.popup_visible {
                    let signals = self.gate.activate(now);
                    self.apply_gate(signals, effects);
                }
                Vec::new()
            }
            UserAction::DismissPopup => {
                if self.popup_visible {
                    self.popup_visible = false;
                    self.gate.dismiss_popup();
                    effects.push(StepEffect::PopupHidden);
                }
                Vec::new()
            }
        };
        self.apply_session(signals, now, effects);
    }

    fn on_fullscreen_change(&mut self, fullscreen: bool, effects: &mut Vec<StepEffect>) {
        if self.fullscreen.on_change(fullscreen) {
            self.session.set_fullscreen(fullscreen);
            effects.push(StepEffect::FullscreenChanged(fullscreen));
        }
    }

    fn apply_session(
        &mut self,
        signals: Vec<SessionSignal>,
        now: EpochMillis,
        effects: &mut Vec<StepEffect>,
    ) {
        for signal in signals {
            match signal {
                SessionSignal::PlaybackBlocked => {
                    effects.push(StepEffect::ManualPlayRequired);
                }
                SessionSignal::Ended => {
                    effects.push(StepEffect::SessionEnded);
                    let signals = self.gate.on_video_ended(now);
                    self.apply_gate(signals, effects);
                }
                SessionSignal::Failed(failure) => {
                    if self.session.failed_attempts() <= self.settings.max_silent_retries {
                        debug!(
                            route = %self.route,
                            attempts = self.session.failed_attempts(),
                            "retrying playback silently"
                        );
                        let signals = self.session.retry();
                        self.apply_session(signals, now, effects);
                    } else {
                        effects.push(StepEffect::ErrorShown {
                            message: failure.to_string(),
                        });
                    }
                }
                SessionSignal::Started
                | SessionSignal::Paused
                | SessionSignal::Resumed
                | SessionSignal::Progress { .. }
                | SessionSignal::VolumeChanged(_) => {}
            }
        }
    }

    fn apply_gate(
        &mut self,
        signals: Vec<GateSignal>,
        effects: &mut Vec<StepEffect>,
    ) {
        for signal in signals {
            match signal {
                GateSignal::Revealed => effects.push(StepEffect::CallToActionRevealed),
                GateSignal::ShowPopup => {
                    self.popup_visible = true;
                    effects.push(StepEffect::PopupShown);
                }
                GateSignal::WindowOpened { expires_at } => {
                    self.timers.cancel_kind(TimerKind::AccessCountdown);
                    self.timers.schedule(TimerKind::AccessCountdown, expires_at);
                    effects.push(StepEffect::AccessWindowOpened { expires_at });
                }
                GateSignal::Completed(next) => {
                    self.timers.cancel_kind(TimerKind::AccessCountdown);
                    effects.push(StepEffect::Completed);
                    match next {
                        Some(NextAction::Navigate(route)) => {
                            self.popup_visible = false;
                            self.navigator.navigate(&route);
                            effects.push(StepEffect::Navigated(route));
                        }
                        Some(NextAction::OpenLink(url)) => {
                            self.navigator.open_link(&url);
                            effects.push(StepEffect::LinkOpened(url));
                        }
                        None => {}
                    }
                }
                GateSignal::Expired { blocked_until } => {
                    self.timers.cancel_kind(TimerKind::AccessCountdown);
                    effects.push(StepEffect::AccessExpired { blocked_until });
                }
                GateSignal::Blocked { until } => {
                    effects.push(StepEffect::AccessBlocked { until });
                }
            }
        }
    }

    fn sync_status(
        &mut self,
        before: PlaybackStatus,
        now: EpochMillis,
        effects: &mut Vec<StepEffect>,
    ) {
        let status = self.session.status();
        self.controls.on_status(status, &mut self.timers, now);
        if status != before {
            debug!(route = %self.route, from = %before, to = %status, "playback status changed");
            effects.push(StepEffect::StatusChanged(status));
        }
    }

    pub fn view(&self, now: EpochMillis) -> ShellView {
        ShellView::compose(
            ViewSources {
                session: &self.session,
                gate: &self.gate,
                controls: &self.controls,
                fullscreen: &self.fullscreen,
                popup_visible: self.popup_visible,
                max_silent_retries: self.settings.max_silent_retries,
            },
            now,
        )
    }

    /// Point the host router at this step.
    pub(crate) fn route_here(&mut self) -> StepEffect {
        self.navigator.navigate(&self.route);
        StepEffect::Navigated(self.route.clone())
    }

    /// Cancel every timer and release every host listener. Idempotent.
    pub fn unmount(&mut self) {
        if self.lifecycle == Lifecycle::Unmounted {
            return;
        }
        self.lifecycle = Lifecycle::Unmounted;
        self.timers.dispose();
        self.fullscreen.detach();
        self.session.detach();
        self.popup_visible = false;
        debug!(route = %self.route, "step unmounted");
    }
}

impl Drop for FunnelStep {
    fn drop(&mut self) {
        self.unmount();
    }
}
