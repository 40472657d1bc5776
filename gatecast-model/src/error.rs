use std::fmt::{self, Display};

/// Errors produced by model constructors and validation routines.
#[derive(Debug)]
pub enum ModelError {
    InvalidClientId(String),
    InvalidAccessRecord { key: String, value: String },
    InvalidRoute(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidClientId(raw) => {
                write!(f, "invalid client identifier: {raw:?}")
            }
            ModelError::InvalidAccessRecord { key, value } => {
                write!(f, "invalid access record {key}={value:?}")
            }
            ModelError::InvalidRoute(raw) => write!(f, "invalid route: {raw}"),
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
