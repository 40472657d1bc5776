use gatecast_contracts::adapter::{
    BackendEvent, BackendFailure, PlayerAdapter, StartError,
};
use gatecast_contracts::embed::{EmbedChannel, EmbedError, EmbedMessage};
use gatecast_model::{BackendKind, Volume};
use tracing::debug;

/// Player events subscribed to on creation.
pub const EMBED_EVENTS: [&str; 7] = [
    "play",
    "pause",
    "ended",
    "timeupdate",
    "volumechange",
    "loaded",
    "error",
];

/// Adapter over an iframe player that exposes a scripting API.
///
/// Play state and time are tracked from the player's own events since the
/// API only answers asynchronously.
#[derive(Debug)]
pub struct EmbedPlayer {
    channel: Box<dyn EmbedChannel>,
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    subscribed: Vec<&'static str>,
}

impl EmbedPlayer {
    pub fn new(
        mut channel: Box<dyn EmbedChannel>,
        duration_hint: Option<f64>,
    ) -> Self {
        let mut subscribed = Vec::with_capacity(EMBED_EVENTS.len());
        for event in EMBED_EVENTS {
            match channel.on(event) {
                Ok(()) => subscribed.push(event),
                Err(err) => debug!(event, %err, "embed event subscription failed"),
            }
        }

        let duration = match channel.get_duration() {
            Ok(duration) if duration.is_finite() && duration > 0.0 => {
                Some(duration)
            }
            Ok(_) => duration_hint,
            Err(err) => {
                debug!(%err, "embed duration unavailable");
                duration_hint
            }
        };

        Self {
            channel,
            paused: true,
            current_time: 0.0,
            duration,
            subscribed,
        }
    }

    /// Normalize one message posted by the player.
    ///
    /// A time update that carries a duration not seen before yields the
    /// metadata event first so progress math never runs against an unknown
    /// duration it could have known.
    pub fn translate(&mut self, message: &EmbedMessage) -> Vec<BackendEvent> {
        match message.event.as_str() {
            "play" | "playing" => {
                self.paused = false;
                vec![BackendEvent::Playing]
            }
            "pause" => {
                self.paused = true;
                vec![BackendEvent::Paused]
            }
            "ended" => {
                self.paused = true;
                if let Some(duration) = self.duration {
                    self.current_time = duration;
                }
                vec![BackendEvent::Ended]
            }
            "timeupdate" | "progress" => {
                let mut events = self.learn_duration(message);
                if let Some(seconds) = message.seconds() {
                    self.current_time = seconds.max(0.0);
                    events.push(BackendEvent::TimeUpdate(self.current_time));
                }
                events
            }
            "loaded" | "durationchange" => self.learn_duration(message),
            "volumechange" => message
                .volume()
                .map(|volume| BackendEvent::VolumeChanged(Volume::new(volume)))
                .into_iter()
                .collect(),
            "error" => {
                vec![BackendEvent::Failed(BackendFailure::Embed(
                    message.message(),
                ))]
            }
            other => {
                debug!(event = other, "ignoring embed message");
                Vec::new()
            }
        }
    }

    fn learn_duration(&mut self, message: &EmbedMessage) -> Vec<BackendEvent> {
        match (self.duration, message.duration()) {
            (None, Some(duration)) => {
                self.duration = Some(duration);
                vec![BackendEvent::Metadata { duration }]
            }
            _ => Vec::new(),
        }
    }
}

fn start_error(error: EmbedError) -> StartError {
    match error {
        EmbedError::NotAllowed(reason) => StartError::Blocked(reason),
        other => StartError::Backend(BackendFailure::Embed(other.to_string())),
    }
}

impl PlayerAdapter for EmbedPlayer {
    fn kind(&self) -> BackendKind {
        BackendKind::EmbedApi
    }

    fn start(&mut self) -> Result<(), StartError> {
        self.channel.play().map_err(start_error)?;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        if self.paused {
            return;
        }
        if let Err(err) = self.channel.pause() {
            debug!(%err, "embed pause rejected");
        }
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: Volume) {
        if let Err(err) = self.channel.set_volume(volume.get()) {
            debug!(%err, "embed volume change rejected");
        }
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn reset(&mut self) {
        if let Err(err) = self.channel.unload() {
            debug!(%err, "embed unload rejected");
        }
        self.paused = true;
        self.current_time = 0.0;
    }

    fn detach(&mut self) {
        for event in self.subscribed.drain(..) {
            self.channel.off(event);
        }
    }
}
