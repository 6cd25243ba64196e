//! Builders for the publish-permission statements this tool owns.

use crate::policy::{ComparisonType, Condition, Effect, Principal, Statement, StringOrArray};
use crate::reconcile::{SOURCE_ACCOUNT_CONDITION_KEY, SOURCE_ARN_CONDITION_KEY};
use serde_json::Map;
use uuid::Uuid;

pub const PUBLISH_ACTION: &str = "sns:Publish";

fn publish_statement(sid: String, topic_arn: &str, conditions: Vec<Condition>) -> Statement {
    Statement {
        sid: Some(sid),
        effect: Effect::Allow,
        principal: Some(Principal::wildcard()),
        action: Some(StringOrArray::Single(PUBLISH_ACTION.to_string())),
        resource: Some(StringOrArray::Single(topic_arn.to_string())),
        conditions,
        extra: Map::new(),
    }
}

/// Allow anyone to publish when the source ARN is one of `source_arns`.
/// The statement gets a fresh random `Sid`.
pub fn build_source_arn_statement(topic_arn: &str, source_arns: Vec<String>) -> Statement {
    publish_statement(
        Uuid::new_v4().to_string(),
        topic_arn,
        vec![Condition::new(
            ComparisonType::ArnEquals,
            SOURCE_ARN_CONDITION_KEY,
            source_arns,
        )],
    )
}

/// Allow `account_id` to publish from sources matching `source_arn_pattern`.
/// The statement's `Sid` is the account id.
pub fn build_source_account_statement(
    topic_arn: &str,
    account_id: &str,
    source_arn_pattern: &str,
) -> Statement {
    publish_statement(
        account_id.to_string(),
        topic_arn,
        vec![
            Condition::new(
                ComparisonType::StringEquals,
                SOURCE_ACCOUNT_CONDITION_KEY,
                vec![account_id.to_string()],
            ),
            Condition::new(
                ComparisonType::ArnLike,
                SOURCE_ARN_CONDITION_KEY,
                vec![source_arn_pattern.to_string()],
            ),
        ],
    )
}

/// `"{prefix}-1"` through `"{prefix}-{count}"`, in order.
pub fn expand_bulk_targets(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{prefix}-{i}")).collect()
}
