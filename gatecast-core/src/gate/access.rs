use gatecast_contracts::storage::{KeyValueStore, StoreError};
use gatecast_model::{ACCESS_BLOCK_KEY_PREFIX, AccessBlock, ClientId, EpochMillis};
use tracing::{debug, warn};

/// Access blocks on top of a key/value store, laid out as
/// `blocked_<client>` → epoch millis.
#[derive(Debug)]
pub struct AccessBlockStore {
    store: Box<dyn KeyValueStore>,
}

impl AccessBlockStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The client's block if it is still in force at `now`.
    ///
    /// An unreadable record counts as no block.
    pub fn active_block(
        &self,
        client: &ClientId,
        now: EpochMillis,
    ) -> Result<Option<AccessBlock>, StoreError> {
        let key = AccessBlock::storage_key_for(client);
        let Some(value) = self.store.get(&key)? else {
            return Ok(None);
        };
        match AccessBlock::from_record(&key, &value) {
            Ok(block) if block.is_active(now) => Ok(Some(block)),
            Ok(_) => Ok(None),
            Err(err) => {
                warn!(%err, "ignoring unreadable access block");
                Ok(None)
            }
        }
    }

    pub fn block(
        &mut self,
        client: &ClientId,
        blocked_until: EpochMillis,
    ) -> Result<AccessBlock, StoreError> {
        let block = AccessBlock::new(client.clone(), blocked_until);
        self.store.set(&block.storage_key(), &block.storage_value())?;
        debug!(client = %client, until = %blocked_until, "access block written");
        Ok(block)
    }

    pub fn clear(&mut self, client: &ClientId) -> Result<(), StoreError> {
        self.store.remove(&AccessBlock::storage_key_for(client))
    }

    /// Every readable block in the store, active or not.
    pub fn list(&self) -> Result<Vec<AccessBlock>, StoreError> {
        let mut blocks = Vec::new();
        for key in self.store.keys()? {
            if !key.starts_with(ACCESS_BLOCK_KEY_PREFIX) {
                continue;
            }
            let Some(value) = self.store.get(&key)? else {
                continue;
            };
            match AccessBlock::from_record(&key, &value) {
                Ok(block) => blocks.push(block),
                Err(err) => debug!(%err, "skipping unreadable access block"),
            }
        }
        Ok(blocks)
    }

    /// Remove blocks that have lapsed by `now`; returns how many went.
    pub fn purge_expired(
        &mut self,
        now: EpochMillis,
    ) -> Result<usize, StoreError> {
        let lapsed: Vec<AccessBlock> = self
            .list()?
            .into_iter()
            .filter(|block| !block.is_active(now))
            .collect();
        for block in &lapsed {
            self.store.remove(&block.storage_key())?;
        }
        Ok(lapsed.len())
    }

    pub fn clear_all(&mut self) -> Result<usize, StoreError> {
        let blocks = self.list()?;
        for block in &blocks {
            self.store.remove(&block.storage_key())?;
        }
        Ok(blocks.len())
    }
}
