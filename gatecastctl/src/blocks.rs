//! Inspecting and clearing access blocks in a JSON file store.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use gatecast_core::gate::AccessBlockStore;
use gatecast_core::storage::JsonFileStore;
use gatecast_model::{AccessBlock, ClientId, EpochMillis};
use std::path::Path;
use tracing::info;

/// What `blocks clear` removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearScope {
    All,
    Expired,
    Client(ClientId),
}

fn open(path: &Path) -> Result<AccessBlockStore> {
    let store = JsonFileStore::open(path).with_context(|| {
        format!("failed to open block store {}", path.display())
    })?;
    Ok(AccessBlockStore::new(Box::new(store)))
}

pub fn list_blocks(path: &Path) -> Result<Vec<AccessBlock>> {
    let mut blocks = open(path)?.list()?;
    blocks.sort_by_key(|block| block.blocked_until);
    Ok(blocks)
}

pub fn clear_blocks(
    path: &Path,
    scope: &ClearScope,
    now: EpochMillis,
) -> Result<usize> {
    let mut store = open(path)?;
    let removed = match scope {
        ClearScope::All => store.clear_all()?,
        ClearScope::Expired => store.purge_expired(now)?,
        ClearScope::Client(client) => {
            let present = store
                .list()?
                .iter()
                .any(|block| &block.client == client);
            store.clear(client)?;
            usize::from(present)
        }
    };
    info!(path = %path.display(), removed, ?scope, "access blocks cleared");
    Ok(removed)
}

pub fn render_blocks(blocks: &[AccessBlock], now: EpochMillis) -> String {
    if blocks.is_empty() {
        return "no access blocks\n".to_string();
    }

    let mut out = String::new();
    for block in blocks {
        let state = if block.is_active(now) {
            format!(
                "active, {} left",
                humantime::format_duration(round_to_seconds(
                    now.until(block.blocked_until)
                ))
            )
        } else {
            "expired".to_string()
        };
        out.push_str(&format!(
            "{}  until {}  ({state})\n",
            block.client,
            format_instant(block.blocked_until)
        ));
    }
    out
}

fn round_to_seconds(duration: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_secs(duration.as_secs())
}

fn format_instant(at: EpochMillis) -> String {
    DateTime::<Utc>::from_timestamp_millis(at.as_millis())
        .map(|instant| instant.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| at.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    const NOW: EpochMillis = EpochMillis(1_700_000_000_000);

    fn seeded(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("blocks.json");
        let mut store = open(&path).unwrap();
        store
            .block(
                &ClientId::new("192.168.1.10").unwrap(),
                NOW.saturating_add(Duration::from_secs(600)),
            )
            .unwrap();
        store
            .block(&ClientId::new("192.168.1.11").unwrap(), EpochMillis(NOW.0 - 1))
            .unwrap();
        path
    }

    #[test]
    fn lists_blocks_soonest_first() {
        let dir = TempDir::new().unwrap();
        let path = seeded(&dir);

        let blocks = list_blocks(&path).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].client.as_str(), "192.168.1.11");

        let text = render_blocks(&blocks, NOW);
        assert!(text.contains("192.168.1.10  until 2023-11-14 22:23:20 UTC  (active, 10m left)"), "{text}");
        assert!(text.contains("(expired)"));
    }

    #[test]
    fn clear_scopes() {
        let dir = TempDir::new().unwrap();
        let path = seeded(&dir);

        assert_eq!(clear_blocks(&path, &ClearScope::Expired, NOW).unwrap(), 1);
        let other = ClientId::new("10.0.0.1").unwrap();
        assert_eq!(clear_blocks(&path, &ClearScope::Client(other), NOW).unwrap(), 0);
        assert_eq!(clear_blocks(&path, &ClearScope::All, NOW).unwrap(), 1);
        assert_eq!(render_blocks(&list_blocks(&path).unwrap(), NOW), "no access blocks\n");
    }
}
