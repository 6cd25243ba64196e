//! Request and result types shared by the service and its adapters.

use crate::aws::arn::TopicArn;
use crate::aws::store::WriteReceipt;
use crate::policy::PolicyDocument;
use crate::reconcile::{Outcome, Reconciliation};
use std::fmt;

/// Batch size used by bulk grants when none is given.
pub const DEFAULT_BULK_COUNT: usize = 700;

/// Largest batch a bulk grant accepts. Larger batches cannot fit the topic
/// policy size limit anyway.
pub const MAX_BULK_COUNT: usize = 5_000;

/// Source ARN pattern baked into account-addressed statements by default.
pub const DEFAULT_SOURCE_ARN_PATTERN: &str = "arn:aws:s3:::*";

/// What to do with the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Grant,
    /// Grant `{target}-1` through `{target}-{count}` at once.
    BulkGrant { count: usize },
    Revoke,
    /// Remove the whole statement that grants the target.
    Delete,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Grant => "GRANT",
            Mode::BulkGrant { .. } => "BULK_GRANT",
            Mode::Revoke => "REVOKE",
            Mode::Delete => "DELETE",
        })
    }
}

/// How publishers are identified in the topic policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// Targets are S3 buckets, listed under one shared `aws:SourceArn` condition.
    SourceArn,
    /// Targets are account ids, each owning a statement whose `Sid` is the id.
    SourceAccount { source_arn_pattern: String },
}

impl Addressing {
    pub fn source_account() -> Self {
        Self::SourceAccount {
            source_arn_pattern: DEFAULT_SOURCE_ARN_PATTERN.to_string(),
        }
    }
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Addressing::SourceArn => "source-arn",
            Addressing::SourceAccount { .. } => "source-account",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantRequest {
    pub target: String,
    pub mode: Mode,
}

impl GrantRequest {
    pub fn new(target: impl Into<String>, mode: Mode) -> Self {
        Self {
            target: target.into(),
            mode,
        }
    }
}

/// A validated request, ready to be planned against the live policy.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub topic: TopicArn,
    pub addressing: Addressing,
    /// The request with its target normalized (bucket name to bucket ARN).
    pub request: GrantRequest,
}

/// Result of planning: the fetched policy and what reconciliation makes of it.
#[derive(Debug, Clone)]
pub struct PlanResult {
    pub topic_arn: String,
    pub before: PolicyDocument,
    pub reconciliation: Reconciliation,
}

impl PlanResult {
    pub fn outcome(&self) -> &Outcome {
        &self.reconciliation.outcome
    }

    pub fn document(&self) -> &PolicyDocument {
        &self.reconciliation.document
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    /// Plan only; never write the policy.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct ApplyResult {
    pub topic_arn: String,
    pub outcome: Outcome,
    pub document: PolicyDocument,
    pub statement_count: usize,
    /// Whether the policy was written back to the topic.
    pub written: bool,
    pub receipt: Option<WriteReceipt>,
}
