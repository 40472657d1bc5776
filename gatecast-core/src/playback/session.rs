use gatecast_contracts::adapter::{
    BackendEvent, BackendFailure, PlayerAdapter, StartError,
};
use gatecast_contracts::element::MediaEventKind;
use gatecast_contracts::embed::EmbedMessage;
use gatecast_model::{BackendKind, PlaybackStatus, SessionId, Volume};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::backend::AnyBackend;
use crate::playback::throttle::TimeUpdateThrottle;
use crate::playback::volume::VolumeMemory;

/// Observable outcome of a session operation.
///
/// Operations return the signals they produced so the owning step can turn
/// them into effects; an operation that changed nothing returns none.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSignal {
    Started,
    Paused,
    Resumed,
    /// The backend refused to start; a manual play control is required.
    PlaybackBlocked,
    Progress {
        current_time: f64,
        duration: Option<f64>,
    },
    /// Latched once per session.
    Ended,
    Failed(BackendFailure),
    VolumeChanged(Volume),
}

/// One watch attempt of one video.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    backend: AnyBackend,
    status: PlaybackStatus,
    current_time: f64,
    duration: Option<f64>,
    volume: VolumeMemory,
    throttle: TimeUpdateThrottle,
    ended_latched: bool,
    failure: Option<BackendFailure>,
    failed_attempts: u32,
    manual_play_required: bool,
    is_fullscreen: bool,
}

impl Session {
    pub fn new(mut backend: AnyBackend, initial_volume: Volume) -> Self {
        backend.set_volume(initial_volume);
        let duration = known_duration(backend.duration());
        Self {
            id: SessionId::new(),
            backend,
            status: PlaybackStatus::Idle,
            current_time: 0.0,
            duration,
            volume: VolumeMemory::new(initial_volume),
            throttle: TimeUpdateThrottle::default(),
            ended_latched: false,
            failure: None,
            failed_attempts: 0,
            manual_play_required: false,
            is_fullscreen: false,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn remaining(&self) -> Option<f64> {
        self.duration
            .map(|duration| (duration - self.current_time).max(0.0))
    }

    pub fn volume(&self) -> Volume {
        self.volume.live()
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    pub fn has_ended(&self) -> bool {
        self.ended_latched
    }

    pub fn failure(&self) -> Option<&BackendFailure> {
        self.failure.as_ref()
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn manual_play_required(&self) -> bool {
        self.manual_play_required
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.is_fullscreen = fullscreen;
    }

    /// Whether the "failed to load, retry?" banner should be shown, given
    /// how many failures are retried silently first.
    pub fn error_visible(&self, max_silent_retries: u32) -> bool {
        self.status == PlaybackStatus::Errored
            && self.failed_attempts > max_silent_retries
    }

    /// Start playback from `Idle`, or resume from `Paused`.
    pub fn start(&mut self) -> Vec<SessionSignal> {
        match self.status {
            PlaybackStatus::Idle => self.begin(),
            PlaybackStatus::Paused => self.resume(),
            _ => Vec::new(),
        }
    }

    fn begin(&mut self) -> Vec<SessionSignal> {
        self.status = PlaybackStatus::Loading;
        match self.backend.start() {
            Ok(()) => {
                self.status = PlaybackStatus::Playing;
                self.manual_play_required = false;
                if self.duration.is_none() {
                    self.duration = known_duration(self.backend.duration());
                }
                debug!(session = %self.id, backend = %self.backend.kind(), "playback started");
                vec![SessionSignal::Started]
            }
            Err(StartError::Blocked(reason)) => {
                warn!(session = %self.id, %reason, "playback start blocked");
                self.status = PlaybackStatus::Idle;
                self.manual_play_required = true;
                vec![SessionSignal::PlaybackBlocked]
            }
            Err(StartError::Backend(failure)) => self.fail(failure),
        }
    }

    pub fn pause(&mut self) -> Vec<SessionSignal> {
        if self.status != PlaybackStatus::Playing {
            return Vec::new();
        }
        self.backend.pause();
        self.status = PlaybackStatus::Paused;
        debug!(session = %self.id, at = self.current_time, "playback paused");
        vec![SessionSignal::Paused]
    }

    pub fn resume(&mut self) -> Vec<SessionSignal> {
        if self.status != PlaybackStatus::Paused {
            return Vec::new();
        }
        match self.backend.resume() {
            Ok(()) => {
                self.status = PlaybackStatus::Playing;
                self.manual_play_required = false;
                debug!(session = %self.id, at = self.current_time, "playback resumed");
                vec![SessionSignal::Resumed]
            }
            Err(StartError::Blocked(reason)) => {
                warn!(session = %self.id, %reason, "playback resume blocked");
                self.manual_play_required = true;
                vec![SessionSignal::PlaybackBlocked]
            }
            Err(StartError::Backend(failure)) => self.fail(failure),
        }
    }

    pub fn toggle_play(&mut self) -> Vec<SessionSignal> {
        match self.status {
            PlaybackStatus::Playing => self.pause(),
            PlaybackStatus::Idle | PlaybackStatus::Paused => self.start(),
            _ => Vec::new(),
        }
    }

    pub fn set_volume(&mut self, volume: Volume) -> Vec<SessionSignal> {
        if self.volume.set(volume) {
            self.push_volume()
        } else {
            Vec::new()
        }
    }

    pub fn mute(&mut self) -> Vec<SessionSignal> {
        if self.volume.mute() {
            self.push_volume()
        } else {
            Vec::new()
        }
    }

    pub fn unmute(&mut self) -> Vec<SessionSignal> {
        if self.volume.unmute() {
            self.push_volume()
        } else {
            Vec::new()
        }
    }

    pub fn toggle_mute(&mut self) -> Vec<SessionSignal> {
        if self.volume.toggle_mute() {
            self.push_volume()
        } else {
            Vec::new()
        }
    }

    fn push_volume(&mut self) -> Vec<SessionSignal> {
        let live = self.volume.live();
        self.backend.set_volume(live);
        vec![SessionSignal::VolumeChanged(live)]
    }

    /// Let wall-clock time pass. Only timer-driven backends produce events
    /// here, and only while playing.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<SessionSignal> {
        if self.status != PlaybackStatus::Playing {
            return Vec::new();
        }
        let events = self.backend.advance(elapsed);
        events
            .into_iter()
            .flat_map(|event| self.handle(event))
            .collect()
    }

    /// Apply a normalized backend event.
    pub fn handle(&mut self, event: BackendEvent) -> Vec<SessionSignal> {
        match event {
            BackendEvent::Playing => match self.status {
                PlaybackStatus::Idle | PlaybackStatus::Loading => {
                    self.status = PlaybackStatus::Playing;
                    self.manual_play_required = false;
                    vec![SessionSignal::Started]
                }
                PlaybackStatus::Paused => {
                    self.status = PlaybackStatus::Playing;
                    vec![SessionSignal::Resumed]
                }
                _ => Vec::new(),
            },
            BackendEvent::Paused => {
                if self.status == PlaybackStatus::Playing {
                    self.status = PlaybackStatus::Paused;
                    vec![SessionSignal::Paused]
                } else {
                    Vec::new()
                }
            }
            BackendEvent::TimeUpdate(time) => self.on_time_update(time),
            BackendEvent::Metadata { duration } => {
                if self.duration.is_none() {
                    self.duration = known_duration(Some(duration));
                    debug!(session = %self.id, ?self.duration, "duration known");
                }
                Vec::new()
            }
            BackendEvent::Ended => match self.status {
                PlaybackStatus::Playing | PlaybackStatus::Paused => {
                    self.latch_ended()
                }
                _ => Vec::new(),
            },
            BackendEvent::VolumeChanged(volume) => {
                if self.volume.set(volume) {
                    vec![SessionSignal::VolumeChanged(volume)]
                } else {
                    Vec::new()
                }
            }
            BackendEvent::Failed(failure) => {
                if self.ended_latched {
                    debug!(session = %self.id, %failure, "ignoring failure after end");
                    Vec::new()
                } else {
                    self.fail(failure)
                }
            }
        }
    }

    /// Apply a DOM media event reported by a native element backend.
    pub fn on_element_event(
        &mut self,
        kind: MediaEventKind,
    ) -> Vec<SessionSignal> {
        match self.backend.translate_element(kind) {
            Some(event) => self.handle(event),
            None => Vec::new(),
        }
    }

    /// Apply a message posted by an embedded player.
    pub fn on_embed_message(
        &mut self,
        message: &EmbedMessage,
    ) -> Vec<SessionSignal> {
        let events = self.backend.translate_embed(message);
        events
            .into_iter()
            .flat_map(|event| self.handle(event))
            .collect()
    }

    fn on_time_update(&mut self, time: f64) -> Vec<SessionSignal> {
        if self.status != PlaybackStatus::Playing || !time.is_finite() {
            return Vec::new();
        }
        if time < self.current_time {
            debug!(session = %self.id, time, current = self.current_time, "ignoring backward time update");
            return Vec::new();
        }

        let time = match self.duration {
            Some(duration) => time.min(duration),
            None => time,
        };
        if !self.throttle.admit(time, self.duration) {
            return Vec::new();
        }

        self.current_time = time;
        let mut signals = vec![SessionSignal::Progress {
            current_time: time,
            duration: self.duration,
        }];
        if self.duration.is_some_and(|duration| time >= duration) {
            signals.extend(self.latch_ended());
        }
        signals
    }

    fn latch_ended(&mut self) -> Vec<SessionSignal> {
        if self.ended_latched {
            return Vec::new();
        }
        self.ended_latched = true;
        self.status = PlaybackStatus::Ended;
        if let Some(duration) = self.duration {
            self.current_time = duration;
        }
        info!(session = %self.id, backend = %self.backend.kind(), "playback ended");
        vec![SessionSignal::Ended]
    }

    fn fail(&mut self, failure: BackendFailure) -> Vec<SessionSignal> {
        self.status = PlaybackStatus::Errored;
        self.failed_attempts += 1;
        self.failure = Some(failure.clone());
        warn!(
            session = %self.id,
            attempts = self.failed_attempts,
            %failure,
            "playback failed"
        );
        vec![SessionSignal::Failed(failure)]
    }

    /// Fully reset an errored session and start again.
    ///
    /// The session gets a new id; volume and the failure count carry over.
    pub fn retry(&mut self) -> Vec<SessionSignal> {
        if self.status != PlaybackStatus::Errored {
            return Vec::new();
        }
        self.backend.reset();
        self.id = SessionId::new();
        self.status = PlaybackStatus::Idle;
        self.current_time = 0.0;
        self.duration = known_duration(self.backend.duration());
        self.throttle.reset();
        self.ended_latched = false;
        self.failure = None;
        self.manual_play_required = false;
        debug!(session = %self.id, attempts = self.failed_attempts, "retrying playback");
        self.start()
    }

    /// Release backend listeners. The session stays readable afterwards.
    pub fn detach(&mut self) {
        self.backend.detach();
        if self.status == PlaybackStatus::Playing {
            self.backend.pause();
        }
    }
}

fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|duration| duration.is_finite() && *duration > 0.0)
}
