//! Host ports for running a funnel without a browser.

use gatecast_contracts::fullscreen::{
    FullscreenPort, FullscreenVariant, ListenerId, PortError,
};
use gatecast_contracts::navigation::Navigator;
use gatecast_contracts::storage::{KeyValueStore, StoreError};
use gatecast_core::backend::HeadlessHost;
use gatecast_core::funnel::{PortsProvider, StepPorts};
use gatecast_core::storage::{JsonFileStore, MemoryStore};
use gatecast_model::Route;
use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

/// Where access blocks are kept between runs.
#[derive(Debug, Clone)]
pub enum BlockStoreLocation {
    File(PathBuf),
    Memory(MemoryStore),
}

impl BlockStoreLocation {
    pub fn open(&self) -> Result<Box<dyn KeyValueStore>, StoreError> {
        match self {
            BlockStoreLocation::File(path) => {
                Ok(Box::new(JsonFileStore::open(path.clone())?))
            }
            BlockStoreLocation::Memory(store) => Ok(Box::new(store.clone())),
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadlessFullscreen {
    next_listener: u64,
}

impl FullscreenPort for HeadlessFullscreen {
    fn request(&mut self, variant: FullscreenVariant) -> Result<(), PortError> {
        Err(PortError::Unsupported(format!("{variant:?} fullscreen")))
    }

    fn exit(&mut self, variant: FullscreenVariant) -> Result<(), PortError> {
        Err(PortError::Unsupported(format!("{variant:?} fullscreen")))
    }

    fn subscribe(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }

    fn unsubscribe(&mut self, _id: ListenerId) {}
}

/// Navigation only shows up in the log; the funnel moves between its own
/// steps by itself.
#[derive(Debug, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&mut self, route: &Route) {
        info!(%route, "navigate");
    }

    fn open_link(&mut self, url: &Url) {
        info!(%url, "open link");
    }
}

#[derive(Debug)]
pub struct HeadlessPorts {
    store: BlockStoreLocation,
}

impl HeadlessPorts {
    pub fn new(store: BlockStoreLocation) -> Self {
        Self { store }
    }
}

impl PortsProvider for HeadlessPorts {
    fn ports(&mut self, route: &Route) -> StepPorts {
        // each step reopens the store so blocks written by earlier steps
        // or other runs are visible
        let store = self.store.open().unwrap_or_else(|err| {
            warn!(%route, error = %err, "block store unavailable; using memory");
            Box::new(MemoryStore::new())
        });

        StepPorts {
            fullscreen: Box::new(HeadlessFullscreen::default()),
            orientation: None,
            navigator: Box::new(LoggingNavigator),
            store,
            media: Box::new(HeadlessHost),
        }
    }
}
