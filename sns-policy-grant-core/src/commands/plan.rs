//! Plan creation logic for SNS Policy Grant service

use crate::aws::arn::{build_bucket_arn, parse_topic_arn, validate_account_id};
use crate::aws::store::PolicyStore;
use crate::error::{PolicyGrantError, PolicyGrantResult};
use crate::reconcile::Strategy;
use crate::types::{
    Addressing, GrantRequest, Mode, PlanResult, PreparedRequest, MAX_BULK_COUNT,
};

/// Validate a request and normalize its target, without touching SNS.
///
/// Source-ARN targets are bucket names (or bucket ARNs) and become bucket ARNs
/// in the topic's partition; source-account targets must be account ids.
pub fn prepare(
    topic_arn: &str,
    addressing: &Addressing,
    request: &GrantRequest,
) -> PolicyGrantResult<PreparedRequest> {
    let topic = parse_topic_arn(topic_arn)?;

    let target = request.target.trim();
    if target.is_empty() {
        return Err(PolicyGrantError::usage("target must not be empty"));
    }

    if !Strategy::new(&topic.arn, addressing).supports(request.mode) {
        return Err(PolicyGrantError::UnsupportedMode {
            mode: request.mode.to_string(),
            addressing: addressing.to_string(),
        });
    }
    match request.mode {
        Mode::BulkGrant { count: 0 } => {
            return Err(PolicyGrantError::usage(
                "bulk grant count must be at least 1",
            ));
        }
        Mode::BulkGrant { count } if count > MAX_BULK_COUNT => {
            return Err(PolicyGrantError::usage(format!(
                "bulk grant count must be at most {MAX_BULK_COUNT}, got {count}"
            )));
        }
        _ => {}
    }

    let target = match addressing {
        Addressing::SourceArn => build_bucket_arn(&topic.partition, target),
        Addressing::SourceAccount { .. } => {
            validate_account_id(target)?;
            target.to_string()
        }
    };

    Ok(PreparedRequest {
        topic,
        addressing: addressing.clone(),
        request: GrantRequest::new(target, request.mode),
    })
}

impl<S: PolicyStore> super::service::PolicyGrantService<S> {
    /// Fetch the topic's current policy and reconcile the request against it.
    ///
    /// Nothing is written; the returned plan holds both the fetched and the
    /// reconciled document.
    pub async fn plan(&self, prepared: &PreparedRequest) -> PolicyGrantResult<PlanResult> {
        let topic_arn = prepared.topic.arn.as_str();
        let before = self.store.fetch(topic_arn).await?;

        let strategy = Strategy::new(topic_arn, &prepared.addressing);
        let reconciliation = strategy.reconcile(&before, &prepared.request)?;
        log::info!(
            "{} {} on {topic_arn}: {}",
            prepared.request.mode,
            prepared.request.target,
            reconciliation.outcome
        );

        Ok(PlanResult {
            topic_arn: topic_arn.to_string(),
            before,
            reconciliation,
        })
    }
}
