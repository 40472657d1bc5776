//! Configuration loading for Gatecast funnels.
//!
//! Funnels are described in TOML or JSON, resolved from an explicit path,
//! the environment, a default file or the built-in two-step funnel, checked
//! by [`validation::apply_guard_rails`] and converted into a
//! [`gatecast_core::funnel::FunnelDefinition`].

#![allow(missing_docs)]

pub mod definition;
pub mod loader;
pub mod models;
pub mod validation;

pub use loader::{
    CONFIG_JSON_VAR, CONFIG_PATH_VAR, ConfigLoad, ConfigLoader,
    ConfigLoaderOptions, ConfigSource, EnvSnapshot, error::ConfigLoadError,
};
pub use models::{
    AccessConfig, BackendConfig, ControlsSection, DEFAULT_FRAME_DURATION,
    DEFAULT_STORE_PATH, FunnelConfig, NextConfig, NoticeSection,
    PlaybackSection, PopupSetting, StepConfig, StorageSection,
};
pub use validation::{
    ConfigGuardRailError, ConfigWarning, ConfigWarnings, apply_guard_rails,
};
