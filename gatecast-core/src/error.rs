use gatecast_contracts::adapter::BackendFailure;
use gatecast_contracts::storage::StoreError;
use gatecast_model::{BackendKind, ModelError, Route};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("failed to create {kind} backend")]
    Backend {
        kind: BackendKind,
        #[source]
        source: BackendFailure,
    },

    #[error("route {0} is not part of the funnel")]
    UnknownRoute(Route),

    #[error("funnel has no steps")]
    EmptyFunnel,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid model value: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
