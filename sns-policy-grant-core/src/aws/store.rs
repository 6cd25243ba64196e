//! The policy store seam.
//!
//! The service reads and replaces topic policies only through [`PolicyStore`],
//! so the SNS client is an explicit collaborator rather than process state.

use crate::aws::{AwsError, AwsResult};
use crate::policy::PolicyDocument;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Acknowledgement of a successful policy write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReceipt {
    pub request_id: Option<String>,
}

/// Reads and replaces the access policy of a topic.
///
/// Writes replace the whole document; there is no conditional update, so
/// concurrent writers to the same topic race and the last one wins.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn fetch(&self, topic_arn: &str) -> AwsResult<PolicyDocument>;

    async fn write(&self, topic_arn: &str, document: &PolicyDocument) -> AwsResult<WriteReceipt>;
}

/// Process-local store, for tests and offline use.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    policies: Mutex<HashMap<String, PolicyDocument>>,
    writes: Mutex<usize>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a topic with an initial policy.
    pub fn with_topic(self, topic_arn: impl Into<String>, document: PolicyDocument) -> Self {
        if let Ok(mut policies) = self.policies.lock() {
            policies.insert(topic_arn.into(), document);
        }
        self
    }

    pub fn policy(&self, topic_arn: &str) -> Option<PolicyDocument> {
        self.policies.lock().ok()?.get(topic_arn).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|writes| *writes).unwrap_or_default()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn fetch(&self, topic_arn: &str) -> AwsResult<PolicyDocument> {
        self.policy(topic_arn)
            .ok_or_else(|| AwsError::SnsError(format!("Topic does not exist: {topic_arn}")))
    }

    async fn write(&self, topic_arn: &str, document: &PolicyDocument) -> AwsResult<WriteReceipt> {
        let mut policies = self
            .policies
            .lock()
            .map_err(|_| AwsError::SnsError("policy store lock poisoned".to_string()))?;
        let slot = policies
            .get_mut(topic_arn)
            .ok_or_else(|| AwsError::SnsError(format!("Topic does not exist: {topic_arn}")))?;
        *slot = document.clone();

        let mut writes = self
            .writes
            .lock()
            .map_err(|_| AwsError::SnsError("policy store lock poisoned".to_string()))?;
        *writes += 1;
        Ok(WriteReceipt {
            request_id: Some(format!("in-memory-{}", *writes)),
        })
    }
}
