//! Gate sequencing and access blocks.

pub mod access;
pub mod sequencer;

pub use access::AccessBlockStore;
pub use sequencer::{
    AccessPolicy, GateConfig, GateSequencer, GateSignal, NextAction,
    PopupTrigger,
};
