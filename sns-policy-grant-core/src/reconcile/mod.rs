//! Publish-permission reconciliation.
//!
//! Given a topic policy and a request, compute the updated policy and a
//! description of what changed. Inputs are never modified; every operation
//! returns a new [`PolicyDocument`], and an unchanged document when the
//! request is already satisfied or has nothing to remove.
//!
//! Two addressing strategies exist:
//! [`SourceArnReconciler`] keeps every granted bucket ARN in one shared
//! `aws:SourceArn` condition, while [`SourceAccountReconciler`] gives each
//! account its own statement keyed by `Sid`.

mod source_account;
mod source_arn;

pub use source_account::{SourceAccountReconciler, SOURCE_ACCOUNT_CONDITION_KEY};
pub use source_arn::{SourceArnReconciler, SOURCE_ARN_CONDITION_KEY};

use crate::error::{PolicyGrantError, PolicyGrantResult};
use crate::policy::PolicyDocument;
use crate::types::{Addressing, GrantRequest, Mode};
use std::fmt;

/// The updated document and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub document: PolicyDocument,
    pub outcome: Outcome,
}

impl Reconciliation {
    fn changed(document: PolicyDocument, outcome: Outcome) -> Self {
        Self { document, outcome }
    }

    fn unchanged(document: &PolicyDocument, outcome: Outcome) -> Self {
        Self {
            document: document.clone(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every requested target was already granted.
    AlreadyGranted { targets: Vec<String> },
    /// The existing condition now covers every requested target; `added`
    /// lists the ones that were missing.
    ConditionExtended {
        sid: Option<String>,
        targets: Vec<String>,
        added: Vec<String>,
    },
    StatementCreated {
        sid: Option<String>,
        targets: Vec<String>,
    },
    /// Target removed; the condition still lists other targets.
    ConditionShrunk { sid: Option<String>, target: String },
    StatementRemoved { sid: Option<String>, target: String },
    /// No statement carries the well-known condition.
    ConditionNotFound,
    /// The condition exists but does not list the target.
    TargetNotFound { target: String },
    /// No statement has the requested `Sid`.
    StatementNotFound { sid: String },
}

impl Outcome {
    /// Whether the document differs from the one reconciled.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Outcome::ConditionExtended { .. }
                | Outcome::StatementCreated { .. }
                | Outcome::ConditionShrunk { .. }
                | Outcome::StatementRemoved { .. }
        )
    }
}

fn sid_label(sid: Option<&String>) -> &str {
    sid.map_or("<no sid>", String::as_str)
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::AlreadyGranted { targets } => write!(
                f,
                "Permission already exists for {}. Skip",
                targets.join(", ")
            ),
            Outcome::ConditionExtended {
                sid,
                targets,
                added,
            } => write!(
                f,
                "Updated condition of statement {} for {} ({} new)",
                sid_label(sid.as_ref()),
                targets.join(", "),
                added.len()
            ),
            Outcome::StatementCreated { sid, targets } => write!(
                f,
                "Created statement {} for {}",
                sid_label(sid.as_ref()),
                targets.join(", ")
            ),
            Outcome::ConditionShrunk { sid, target } => write!(
                f,
                "Removed {target} from condition of statement {}",
                sid_label(sid.as_ref())
            ),
            Outcome::StatementRemoved { sid, target } => write!(
                f,
                "Removed statement {} granting {target}",
                sid_label(sid.as_ref())
            ),
            Outcome::ConditionNotFound => f.write_str("Permission not found. Skip"),
            Outcome::TargetNotFound { target } => write!(f, "{target} not found. Skip"),
            Outcome::StatementNotFound { sid } => write!(f, "Statement {sid} not found. Skip"),
        }
    }
}

/// Operations both addressing strategies offer.
pub trait Reconcile {
    fn grant(&self, document: &PolicyDocument, target: &str) -> Reconciliation;

    fn revoke(&self, document: &PolicyDocument, target: &str) -> Reconciliation;
}

/// A reconciler selected by [`Addressing`].
#[derive(Debug, Clone)]
pub enum Strategy {
    SourceArn(SourceArnReconciler),
    SourceAccount(SourceAccountReconciler),
}

impl Strategy {
    pub fn new(topic_arn: &str, addressing: &Addressing) -> Self {
        match addressing {
            Addressing::SourceArn => Self::SourceArn(SourceArnReconciler::new(topic_arn)),
            Addressing::SourceAccount { source_arn_pattern } => Self::SourceAccount(
                SourceAccountReconciler::new(topic_arn, source_arn_pattern.clone()),
            ),
        }
    }

    /// Bulk grants and deletes only exist for source-ARN addressing.
    pub fn supports(&self, mode: Mode) -> bool {
        match self {
            Strategy::SourceArn(_) => true,
            Strategy::SourceAccount(_) => matches!(mode, Mode::Grant | Mode::Revoke),
        }
    }

    pub fn reconcile(
        &self,
        document: &PolicyDocument,
        request: &GrantRequest,
    ) -> PolicyGrantResult<Reconciliation> {
        let target = request.target.as_str();
        match (self, request.mode) {
            (_, Mode::Grant) => Ok(self.as_reconcile().grant(document, target)),
            (_, Mode::Revoke) => Ok(self.as_reconcile().revoke(document, target)),
            (Strategy::SourceArn(reconciler), Mode::BulkGrant { count }) => {
                Ok(reconciler.bulk_grant(document, target, count))
            }
            (Strategy::SourceArn(reconciler), Mode::Delete) => {
                Ok(reconciler.delete(document, target))
            }
            (Strategy::SourceAccount(_), mode) => Err(PolicyGrantError::UnsupportedMode {
                mode: mode.to_string(),
                addressing: "source-account".to_string(),
            }),
        }
    }

    fn as_reconcile(&self) -> &dyn Reconcile {
        match self {
            Strategy::SourceArn(reconciler) => reconciler,
            Strategy::SourceAccount(reconciler) => reconciler,
        }
    }
}
