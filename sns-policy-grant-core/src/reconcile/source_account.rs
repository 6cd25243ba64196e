//! Source-account addressing: every account owns a whole statement whose
//! `Sid` is the account id.

use super::{Outcome, Reconcile, Reconciliation};
use crate::policy::PolicyDocument;
use crate::synthesis::build_source_account_statement;

pub const SOURCE_ACCOUNT_CONDITION_KEY: &str = "aws:SourceAccount";

#[derive(Debug, Clone)]
pub struct SourceAccountReconciler {
    topic_arn: String,
    source_arn_pattern: String,
}

impl SourceAccountReconciler {
    pub fn new(topic_arn: impl Into<String>, source_arn_pattern: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            source_arn_pattern: source_arn_pattern.into(),
        }
    }
}

impl Reconcile for SourceAccountReconciler {
    fn grant(&self, document: &PolicyDocument, account_id: &str) -> Reconciliation {
        if document.find_statement_by_sid(account_id).is_some() {
            return Reconciliation::unchanged(
                document,
                Outcome::AlreadyGranted {
                    targets: vec![account_id.to_string()],
                },
            );
        }

        let statement =
            build_source_account_statement(&self.topic_arn, account_id, &self.source_arn_pattern);
        let mut updated = document.clone();
        updated.statements.push(statement);
        Reconciliation::changed(
            updated,
            Outcome::StatementCreated {
                sid: Some(account_id.to_string()),
                targets: vec![account_id.to_string()],
            },
        )
    }

    fn revoke(&self, document: &PolicyDocument, account_id: &str) -> Reconciliation {
        let Some(idx) = document
            .statements
            .iter()
            .position(|statement| statement.sid.as_deref() == Some(account_id))
        else {
            return Reconciliation::unchanged(
                document,
                Outcome::StatementNotFound {
                    sid: account_id.to_string(),
                },
            );
        };

        let mut updated = document.clone();
        let removed = updated.statements.remove(idx);
        Reconciliation::changed(
            updated,
            Outcome::StatementRemoved {
                sid: removed.sid,
                target: account_id.to_string(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ComparisonType;
    use crate::reconcile::SourceArnReconciler;

    const TOPIC: &str = "arn:aws:sns:us-west-2:123456789012:events";
    const ACCOUNT: &str = "210987654321";

    fn reconciler() -> SourceAccountReconciler {
        SourceAccountReconciler::new(TOPIC, "arn:aws:s3:::*")
    }

    fn populated_doc() -> PolicyDocument {
        let doc = SourceArnReconciler::new(TOPIC)
            .grant(&PolicyDocument::default(), "arn:aws:s3:::a")
            .document;
        reconciler().grant(&doc, "111122223333").document
    }

    #[test]
    fn test_grant_creates_account_statement() {
        let result = reconciler().grant(&PolicyDocument::default(), ACCOUNT);
        let statement = result.document.find_statement_by_sid(ACCOUNT).unwrap();

        assert_eq!(statement.conditions.len(), 2);
        assert_eq!(
            statement.conditions[0].comparison,
            ComparisonType::StringEquals
        );
        assert_eq!(statement.conditions[0].values, vec![ACCOUNT]);
        assert_eq!(statement.conditions[1].comparison, ComparisonType::ArnLike);
        assert_eq!(statement.conditions[1].values, vec!["arn:aws:s3:::*"]);
        assert!(result.outcome.is_change());
    }

    #[test]
    fn test_grant_twice_is_noop() {
        let once = reconciler().grant(&PolicyDocument::default(), ACCOUNT);
        let twice = reconciler().grant(&once.document, ACCOUNT);
        assert_eq!(twice.document, once.document);
        assert_eq!(
            twice.outcome,
            Outcome::AlreadyGranted {
                targets: vec![ACCOUNT.to_string()]
            }
        );
    }

    #[test]
    fn test_grant_then_revoke_leaves_other_statements_untouched() {
        let doc = populated_doc();
        let granted = reconciler().grant(&doc, ACCOUNT).document;
        assert_eq!(granted.statements.len(), doc.statements.len() + 1);

        let revoked = reconciler().revoke(&granted, ACCOUNT);
        assert!(revoked.document.find_statement_by_sid(ACCOUNT).is_none());
        assert_eq!(revoked.document, doc);
        assert_eq!(
            revoked.outcome,
            Outcome::StatementRemoved {
                sid: Some(ACCOUNT.to_string()),
                target: ACCOUNT.to_string()
            }
        );
    }

    #[test]
    fn test_revoke_unknown_account_is_noop() {
        let doc = populated_doc();
        let result = reconciler().revoke(&doc, ACCOUNT);
        assert_eq!(result.document, doc);
        assert_eq!(
            result.outcome,
            Outcome::StatementNotFound {
                sid: ACCOUNT.to_string()
            }
        );
    }
}
