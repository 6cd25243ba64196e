//! Crate-level error type.

use crate::aws::AwsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolicyGrantError {
    /// Bad arguments, detected before any call to SNS.
    #[error("{0}")]
    Usage(String),

    #[error("{mode} is not supported with {addressing} addressing")]
    UnsupportedMode { mode: String, addressing: String },

    #[error(transparent)]
    Aws(#[from] AwsError),
}

impl PolicyGrantError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// True for errors raised while validating the request.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::UnsupportedMode { .. })
    }
}

pub type PolicyGrantResult<T> = Result<T, PolicyGrantError>;
