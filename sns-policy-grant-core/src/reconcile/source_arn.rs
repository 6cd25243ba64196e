//! Source-ARN addressing: one shared `aws:SourceArn` condition lists every
//! granted bucket.

use super::{Outcome, Reconcile, Reconciliation, SOURCE_ACCOUNT_CONDITION_KEY};
use crate::policy::{Condition, PolicyDocument, Statement};
use crate::synthesis::{build_source_arn_statement, expand_bulk_targets};
use std::collections::HashSet;

pub const SOURCE_ARN_CONDITION_KEY: &str = "aws:SourceArn";

/// Position of the well-known condition: (statement index, condition index).
type ConditionSlot = (usize, usize);

#[derive(Debug, Clone)]
pub struct SourceArnReconciler {
    topic_arn: String,
}

impl SourceArnReconciler {
    pub fn new(topic_arn: impl Into<String>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
        }
    }

    /// Grant `"{prefix}-1"` through `"{prefix}-{count}"` in one update.
    pub fn bulk_grant(
        &self,
        document: &PolicyDocument,
        prefix: &str,
        count: usize,
    ) -> Reconciliation {
        self.grant_all(document, &expand_bulk_targets(prefix, count))
    }

    /// Remove the whole statement whose condition lists `target`, whatever
    /// else the condition lists.
    pub fn delete(&self, document: &PolicyDocument, target: &str) -> Reconciliation {
        let Some((statement_idx, condition_idx)) = locate(document) else {
            return Reconciliation::unchanged(document, Outcome::ConditionNotFound);
        };
        if !document.statements[statement_idx].conditions[condition_idx].contains(target) {
            return Reconciliation::unchanged(
                document,
                Outcome::TargetNotFound {
                    target: target.to_string(),
                },
            );
        }

        let mut updated = document.clone();
        let removed = updated.statements.remove(statement_idx);
        Reconciliation::changed(
            updated,
            Outcome::StatementRemoved {
                sid: removed.sid,
                target: target.to_string(),
            },
        )
    }

    /// Find-or-create with set semantics: targets already listed (or repeated
    /// within the batch) are added once.
    fn grant_all(&self, document: &PolicyDocument, targets: &[String]) -> Reconciliation {
        let mut seen: HashSet<&str> = HashSet::with_capacity(targets.len());
        let batch: Vec<String> = targets
            .iter()
            .filter(|target| seen.insert(target.as_str()))
            .cloned()
            .collect();

        let Some((statement_idx, condition_idx)) = locate(document) else {
            let statement = build_source_arn_statement(&self.topic_arn, batch.clone());
            let sid = statement.sid.clone();
            let mut updated = document.clone();
            updated.statements.push(statement);
            return Reconciliation::changed(
                updated,
                Outcome::StatementCreated {
                    sid,
                    targets: batch,
                },
            );
        };

        let existing = &document.statements[statement_idx].conditions[condition_idx];
        let listed: HashSet<&str> = existing.values.iter().map(String::as_str).collect();
        let added: Vec<String> = batch
            .iter()
            .filter(|target| !listed.contains(target.as_str()))
            .cloned()
            .collect();
        if added.is_empty() {
            return Reconciliation::unchanged(document, Outcome::AlreadyGranted { targets: batch });
        }

        let mut updated = document.clone();
        let statement = &mut updated.statements[statement_idx];
        statement.conditions[condition_idx]
            .values
            .extend(added.iter().cloned());
        let sid = statement.sid.clone();
        Reconciliation::changed(
            updated,
            Outcome::ConditionExtended {
                sid,
                targets: batch,
                added,
            },
        )
    }
}

impl Reconcile for SourceArnReconciler {
    fn grant(&self, document: &PolicyDocument, target: &str) -> Reconciliation {
        self.grant_all(document, &[target.to_string()])
    }

    /// Drop `target` from the condition; drop the statement once the
    /// condition lists nothing.
    fn revoke(&self, document: &PolicyDocument, target: &str) -> Reconciliation {
        let Some((statement_idx, condition_idx)) = locate(document) else {
            return Reconciliation::unchanged(document, Outcome::ConditionNotFound);
        };
        if !document.statements[statement_idx].conditions[condition_idx].contains(target) {
            return Reconciliation::unchanged(
                document,
                Outcome::TargetNotFound {
                    target: target.to_string(),
                },
            );
        }

        let mut updated = document.clone();
        let condition = &mut updated.statements[statement_idx].conditions[condition_idx];
        condition.values.retain(|value| value != target);

        let target = target.to_string();
        if condition.values.is_empty() {
            let removed = updated.statements.remove(statement_idx);
            Reconciliation::changed(
                updated,
                Outcome::StatementRemoved {
                    sid: removed.sid,
                    target,
                },
            )
        } else {
            let sid = updated.statements[statement_idx].sid.clone();
            Reconciliation::changed(updated, Outcome::ConditionShrunk { sid, target })
        }
    }
}

/// Any operator counts (`ArnEquals`, `ArnLike`, ...); only the key matters.
fn is_source_arn_condition(condition: &Condition) -> bool {
    condition.has_key(SOURCE_ARN_CONDITION_KEY)
}

/// Statements scoped to one account belong to source-account addressing.
fn is_account_scoped(statement: &Statement) -> bool {
    statement
        .conditions
        .iter()
        .any(|condition| condition.has_key(SOURCE_ACCOUNT_CONDITION_KEY))
}

/// The first statement carrying the well-known condition.
fn locate(document: &PolicyDocument) -> Option<ConditionSlot> {
    document
        .statements
        .iter()
        .enumerate()
        .filter(|(_, statement)| !is_account_scoped(statement))
        .find_map(|(statement_idx, statement)| {
            statement
                .conditions
                .iter()
                .position(is_source_arn_condition)
                .map(|condition_idx| (statement_idx, condition_idx))
        })
}
