//! Operator tooling for Gatecast funnels: configuration checks, headless
//! simulation runs and access-block maintenance. The `gatecastctl` binary
//! is a thin clap layer over these modules.

#![allow(missing_docs)]

pub mod blocks;
pub mod check;
pub mod ports;
pub mod simulate;

pub use blocks::{ClearScope, clear_blocks, list_blocks, render_blocks};
pub use check::{CheckOptions, render_check, run_config_check};
pub use ports::{BlockStoreLocation, HeadlessPorts};
pub use simulate::{
    SimulateOptions, SimulationOutcome, SimulationReport, run_simulation,
};
