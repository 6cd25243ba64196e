//! Apply logic for SNS Policy Grant service

use crate::aws::store::PolicyStore;
use crate::error::PolicyGrantResult;
use crate::types::{ApplyOptions, ApplyResult, PlanResult, PreparedRequest};

impl<S: PolicyStore> super::service::PolicyGrantService<S> {
    /// Write the planned policy back to the topic.
    ///
    /// The whole document is replaced. Plans whose outcome is not a change are
    /// not written.
    pub async fn apply(&self, plan: &PlanResult) -> PolicyGrantResult<ApplyResult> {
        let document = plan.document();
        let outcome = plan.outcome();

        let receipt = if outcome.is_change() {
            let receipt = self.store.write(&plan.topic_arn, document).await?;
            log::info!(
                "Updated policy of {} (request id: {})",
                plan.topic_arn,
                receipt.request_id.as_deref().unwrap_or("unknown")
            );
            Some(receipt)
        } else {
            log::debug!("Nothing to write for {}", plan.topic_arn);
            None
        };

        Ok(ApplyResult {
            topic_arn: plan.topic_arn.clone(),
            outcome: outcome.clone(),
            document: document.clone(),
            statement_count: document.statements.len(),
            written: receipt.is_some(),
            receipt,
        })
    }

    /// Plan, then apply unless `options.dry_run` is set.
    pub async fn run(
        &self,
        prepared: &PreparedRequest,
        options: ApplyOptions,
    ) -> PolicyGrantResult<ApplyResult> {
        let plan = self.plan(prepared).await?;
        if options.dry_run {
            log::info!("Dry run: not writing policy of {}", plan.topic_arn);
            return Ok(ApplyResult {
                topic_arn: plan.topic_arn.clone(),
                outcome: plan.outcome().clone(),
                document: plan.document().clone(),
                statement_count: plan.document().statements.len(),
                written: false,
                receipt: None,
            });
        }
        self.apply(&plan).await
    }
}

#[cfg(test)]
mod tests {
    use crate::aws::store::InMemoryPolicyStore;
    use crate::commands::{prepare, PolicyGrantService};
    use crate::policy::PolicyDocument;
    use crate::reconcile::Outcome;
    use crate::types::{Addressing, ApplyOptions, GrantRequest, Mode};

    const TOPIC: &str = "arn:aws:sns:us-west-2:123456789012:bucket-events";

    fn service() -> PolicyGrantService<InMemoryPolicyStore> {
        PolicyGrantService::with_store(
            InMemoryPolicyStore::new().with_topic(TOPIC, PolicyDocument::default()),
        )
    }

    async fn run(
        service: &PolicyGrantService<InMemoryPolicyStore>,
        addressing: &Addressing,
        target: &str,
        mode: Mode,
    ) -> crate::types::ApplyResult {
        let prepared = prepare(TOPIC, addressing, &GrantRequest::new(target, mode)).unwrap();
        service
            .run(&prepared, ApplyOptions::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_grant_writes_and_noop_does_not() {
        let service = service();

        let first = run(&service, &Addressing::SourceArn, "logs", Mode::Grant).await;
        assert!(first.written);
        assert!(first.receipt.is_some());
        assert_eq!(first.statement_count, 1);
        assert_eq!(service.store().write_count(), 1);

        let second = run(&service, &Addressing::SourceArn, "logs", Mode::Grant).await;
        assert!(!second.written);
        assert_eq!(
            second.outcome,
            Outcome::AlreadyGranted {
                targets: vec!["arn:aws:s3:::logs".to_string()]
            }
        );
        assert_eq!(service.store().write_count(), 1);
    }

    #[tokio::test]
    async fn test_bulk_grant_then_delete_round_trip() {
        let service = service();

        let bulk = run(
            &service,
            &Addressing::SourceArn,
            "bucket",
            Mode::BulkGrant { count: 3 },
        )
        .await;
        assert!(bulk.written);
        let stored = service.store().policy(TOPIC).unwrap();
        assert_eq!(
            stored.statements[0].conditions[0].values,
            vec![
                "arn:aws:s3:::bucket-1",
                "arn:aws:s3:::bucket-2",
                "arn:aws:s3:::bucket-3"
            ]
        );

        let deleted = run(&service, &Addressing::SourceArn, "bucket-2", Mode::Delete).await;
        assert!(matches!(deleted.outcome, Outcome::StatementRemoved { .. }));
        assert_eq!(
            service.store().policy(TOPIC).unwrap(),
            PolicyDocument::default()
        );
    }

    #[tokio::test]
    async fn test_account_grant_and_revoke() {
        let service = service();
        let addressing = Addressing::source_account();

        run(&service, &addressing, "210987654321", Mode::Grant).await;
        let stored = service.store().policy(TOPIC).unwrap();
        assert!(stored.find_statement_by_sid("210987654321").is_some());

        let revoked = run(&service, &addressing, "210987654321", Mode::Revoke).await;
        assert!(revoked.written);
        assert_eq!(
            service.store().policy(TOPIC).unwrap(),
            PolicyDocument::default()
        );
        assert_eq!(service.store().write_count(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_never_writes() {
        let service = service();
        let prepared = prepare(
            TOPIC,
            &Addressing::SourceArn,
            &GrantRequest::new("logs", Mode::Grant),
        )
        .unwrap();

        let result = service
            .run(&prepared, ApplyOptions { dry_run: true })
            .await
            .unwrap();
        assert!(!result.written);
        assert!(result.outcome.is_change());
        assert_eq!(result.statement_count, 1);
        assert_eq!(service.store().write_count(), 0);
        assert_eq!(
            service.store().policy(TOPIC).unwrap(),
            PolicyDocument::default()
        );
    }
}
