//! This crate provides the core business logic for SNS Policy Grant:
//! - The SNS topic access policy model
//! - Publish-permission reconciliation, by source ARN or by source account
//! - Request validation and the fetch / reconcile / write service
//!

mod aws;
pub mod commands;
mod error;
pub mod policy;
pub mod reconcile;
mod synthesis;
mod types;

// Re-exports for a small, focused public API
pub use aws::arn::{build_bucket_arn, parse_topic_arn, validate_account_id, TopicArn};
pub use aws::sns_client::{ClientConfig, SnsPolicyStore};
pub use aws::store::{InMemoryPolicyStore, PolicyStore, WriteReceipt};
pub use aws::{AwsError, AwsResult};
pub use commands::{prepare, PolicyGrantService};
pub use error::{PolicyGrantError, PolicyGrantResult};
pub use policy::PolicyDocument;
pub use reconcile::{Outcome, Reconcile, Reconciliation, Strategy};
pub use synthesis::{
    build_source_account_statement, build_source_arn_statement, expand_bulk_targets,
};
pub use types::{
    Addressing, ApplyOptions, ApplyResult, GrantRequest, Mode, PlanResult, PreparedRequest,
    DEFAULT_BULK_COUNT, DEFAULT_SOURCE_ARN_PATTERN, MAX_BULK_COUNT,
};
