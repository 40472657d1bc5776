use std::time::Duration;

use crate::error::ModelError;
use crate::ids::ClientId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Storage key prefix for access block records.
pub const ACCESS_BLOCK_KEY_PREFIX: &str = "blocked_";

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EpochMillis(pub i64);

impl EpochMillis {
    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn saturating_add(self, duration: Duration) -> Self {
        let millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        EpochMillis(self.0.saturating_add(millis))
    }

    /// Time left until `deadline`, zero once it has passed.
    pub fn until(self, deadline: EpochMillis) -> Duration {
        let remaining = deadline.0.saturating_sub(self.0);
        Duration::from_millis(u64::try_from(remaining).unwrap_or(0))
    }
}

impl std::fmt::Display for EpochMillis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-side rate-limit record written when an access window expires.
///
/// While `now < blocked_until` the gate renders as expired for `client`.
/// This is a soft control living in the visitor's own storage.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AccessBlock {
    pub client: ClientId,
    pub blocked_until: EpochMillis,
}

impl AccessBlock {
    pub fn new(client: ClientId, blocked_until: EpochMillis) -> Self {
        Self {
            client,
            blocked_until,
        }
    }

    pub fn storage_key_for(client: &ClientId) -> String {
        format!("{ACCESS_BLOCK_KEY_PREFIX}{}", client.as_str())
    }

    pub fn storage_key(&self) -> String {
        Self::storage_key_for(&self.client)
    }

    pub fn storage_value(&self) -> String {
        self.blocked_until.0.to_string()
    }

    /// Rebuild a record from a stored key/value pair.
    pub fn from_record(key: &str, value: &str) -> Result<Self, ModelError> {
        let invalid = || ModelError::InvalidAccessRecord {
            key: key.to_string(),
            value: value.to_string(),
        };

        let client = key
            .strip_prefix(ACCESS_BLOCK_KEY_PREFIX)
            .ok_or_else(invalid)
            .and_then(|raw| ClientId::new(raw).map_err(|_| invalid()))?;
        let blocked_until =
            value.trim().parse::<i64>().map_err(|_| invalid())?;

        Ok(Self {
            client,
            blocked_until: EpochMillis(blocked_until),
        })
    }

    pub fn is_active(&self, now: EpochMillis) -> bool {
        now < self.blocked_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ClientId {
        ClientId::new("192.168.1.17").unwrap()
    }

    #[test]
    fn storage_layout_matches_local_storage_keys() {
        let block = AccessBlock::new(client(), EpochMillis(1_700_000_600_000));
        assert_eq!(block.storage_key(), "blocked_192.168.1.17");
        assert_eq!(block.storage_value(), "1700000600000");
    }

    #[test]
    fn from_record_rejects_foreign_keys_and_garbage() {
        assert!(AccessBlock::from_record("volume", "12").is_err());
        assert!(AccessBlock::from_record("blocked_x", "soon").is_err());
        assert!(AccessBlock::from_record("blocked_", "12").is_err());

        let parsed =
            AccessBlock::from_record("blocked_192.168.1.17", " 42 ").unwrap();
        assert_eq!(parsed.client, client());
        assert_eq!(parsed.blocked_until, EpochMillis(42));
    }

    #[test]
    fn block_is_active_strictly_before_deadline() {
        let block = AccessBlock::new(client(), EpochMillis(1_000));
        assert!(block.is_active(EpochMillis(999)));
        assert!(!block.is_active(EpochMillis(1_000)));
    }

    #[test]
    fn until_saturates_at_zero() {
        assert_eq!(
            EpochMillis(5_000).until(EpochMillis(4_000)),
            Duration::ZERO
        );
        assert_eq!(
            EpochMillis(1_000).until(EpochMillis(3_500)),
            Duration::from_millis(2_500)
        );
    }
}
