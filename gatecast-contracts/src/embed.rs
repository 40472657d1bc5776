//! Host surface of a third-party iframe player exposing a scripting API.

use serde::Deserialize;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbedError {
    /// The player refused to start without a user gesture.
    #[error("not allowed: {0}")]
    NotAllowed(String),

    /// The API script or the iframe never became ready.
    #[error("player unavailable: {0}")]
    Unavailable(String),

    #[error("{method} rejected: {reason}")]
    Rejected { method: &'static str, reason: String },
}

/// One message from the player's event emitter, shaped like the JSON the
/// embed posts to the parent window: `{"event": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbedMessage {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl EmbedMessage {
    pub fn new(event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn number(&self, field: &str) -> Option<f64> {
        self.data
            .get(field)
            .and_then(serde_json::Value::as_f64)
            .filter(|value| value.is_finite())
    }

    pub fn seconds(&self) -> Option<f64> {
        self.number("seconds")
    }

    pub fn duration(&self) -> Option<f64> {
        self.number("duration").filter(|value| *value > 0.0)
    }

    pub fn volume(&self) -> Option<f64> {
        self.number("volume")
    }

    pub fn fullscreen(&self) -> Option<bool> {
        self.data
            .get("fullscreen")
            .and_then(serde_json::Value::as_bool)
    }

    pub fn message(&self) -> String {
        self.data
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("unknown player error")
            .to_string()
    }
}

/// Commands the engine issues to the embedded player.
pub trait EmbedChannel: Debug {
    fn play(&mut self) -> Result<(), EmbedError>;
    fn pause(&mut self) -> Result<(), EmbedError>;
    fn set_volume(&mut self, volume: f64) -> Result<(), EmbedError>;
    fn get_duration(&mut self) -> Result<f64, EmbedError>;
    /// Register interest in `event` (the player's `on(event, cb)`).
    fn on(&mut self, event: &str) -> Result<(), EmbedError>;
    /// Drop interest in `event` (the player's `off(event)`).
    fn off(&mut self, event: &str);
    /// Seek back to zero and stop, used by retries.
    fn unload(&mut self) -> Result<(), EmbedError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_posted_timeupdate() {
        let message = EmbedMessage::parse(
            r#"{"event":"timeupdate","data":{"seconds":12.5,"percent":0.1,"duration":125}}"#,
        )
        .unwrap();
        assert_eq!(message.event, "timeupdate");
        assert_eq!(message.seconds(), Some(12.5));
        assert_eq!(message.duration(), Some(125.0));
    }

    #[test]
    fn missing_data_defaults_to_null() {
        let message = EmbedMessage::parse(r#"{"event":"ended"}"#).unwrap();
        assert!(message.data.is_null());
        assert_eq!(message.seconds(), None);
        assert_eq!(message.message(), "unknown player error");
    }
}
