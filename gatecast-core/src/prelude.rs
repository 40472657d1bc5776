pub use crate::backend::{AnyBackend, BackendSpec, HeadlessHost};
pub use crate::error::{CoreError, Result};
pub use crate::funnel::{
    Funnel, FunnelDefinition, FunnelStep, FunnelView, InAppNotice,
    NoticeConfig, NoticeView, PortsProvider, StepDefinition, StepEffect,
    StepEvent, StepPorts, StepSettings, UserAction, is_in_app_browser,
    simulated_client_id,
};
pub use crate::gate::{
    AccessBlockStore, AccessPolicy, GateConfig, GateSequencer, GateSignal,
    NextAction, PopupTrigger,
};
pub use crate::playback::{PlaybackTimer, Session, SessionSignal};
pub use crate::shell::{
    ControlsConfig, Overlay, ProgressReadout, ShellView, progress_fraction,
};
pub use crate::storage::{JsonFileStore, MemoryStore};
pub use crate::timers::{TimerKind, TimerRegistry};

pub use gatecast_contracts::prelude::*;
pub use gatecast_model::{
    AccessBlock, BackendKind, ClientId, EpochMillis, GatePhase,
    PlaybackStatus, Route, SessionId, Volume, WindowOpens, format_clock,
};
