//! AWS SDK integration: the policy store seam, the SNS client wrapper, ARN helpers.

pub mod arn;
pub(crate) mod sns_client;
pub mod store;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("AWS configuration error: {0}")]
    ConfigError(String),
    #[error("SNS client error: {0}")]
    SnsError(String),
    #[error("Policy document error: {0}")]
    PolicyError(String),
}

pub type AwsResult<T> = Result<T, AwsError>;
