//! Serde helpers for durations written as humantime strings (`"2m"`,
//! `"1m 30s"`) or as plain whole seconds.

use serde::{Deserialize, Deserializer, Serializer, de};
use std::time::Duration;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Text(String),
}

impl RawDuration {
    fn into_duration<E: de::Error>(self) -> Result<Duration, E> {
        match self {
            RawDuration::Seconds(secs) => Ok(Duration::from_secs(secs)),
            RawDuration::Text(text) => humantime::parse_duration(text.trim())
                .map_err(|err| {
                    E::custom(format!("invalid duration '{text}': {err}"))
                }),
        }
    }
}

pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&humantime::format_duration(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    RawDuration::deserialize(deserializer)?.into_duration()
}

pub mod option {
    use super::RawDuration;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => super::serialize(duration, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawDuration>::deserialize(deserializer)?
            .map(RawDuration::into_duration)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Holder {
        #[serde(with = "super")]
        window: Duration,
        #[serde(default, with = "super::option")]
        grace: Option<Duration>,
    }

    #[test]
    fn accepts_humantime_text_and_plain_seconds() {
        let parsed: Holder =
            serde_json::from_str(r#"{"window":"2m","grace":90}"#).unwrap();
        assert_eq!(parsed.window, Duration::from_secs(120));
        assert_eq!(parsed.grace, Some(Duration::from_secs(90)));

        let parsed: Holder = serde_json::from_str(r#"{"window":"1m 30s"}"#).unwrap();
        assert_eq!(parsed.window, Duration::from_secs(90));
        assert_eq!(parsed.grace, None);
    }

    #[test]
    fn rejects_garbage() {
        let err = serde_json::from_str::<Holder>(r#"{"window":"soon"}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid duration 'soon'"), "{err}");
    }

    #[test]
    fn serializes_as_humantime() {
        let text = serde_json::to_string(&Holder {
            window: Duration::from_secs(600),
            grace: None,
        })
        .unwrap();
        assert_eq!(text, r#"{"window":"10m","grace":null}"#);
    }
}
