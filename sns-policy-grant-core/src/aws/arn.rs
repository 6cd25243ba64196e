//! ARN and account id helpers used to validate and normalize request targets.

use crate::error::{PolicyGrantError, PolicyGrantResult};
use regex::Regex;
use std::sync::LazyLock;

static TOPIC_ARN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^arn:(aws[a-z-]*):sns:([a-z0-9-]+):(\d{12}):([A-Za-z0-9_-]{1,256}(?:\.fifo)?)$")
        .expect("topic ARN pattern is valid")
});

/// The parts of an SNS topic ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicArn {
    pub arn: String,
    pub partition: String,
    pub region: String,
    pub account_id: String,
    pub name: String,
}

/// Parse `arn:<partition>:sns:<region>:<account>:<topic>`.
pub fn parse_topic_arn(arn: &str) -> PolicyGrantResult<TopicArn> {
    let captures = TOPIC_ARN
        .captures(arn)
        .ok_or_else(|| {
            PolicyGrantError::usage(format!("'{arn}' is not a valid SNS topic ARN"))
        })?;

    Ok(TopicArn {
        arn: arn.to_string(),
        partition: captures[1].to_string(),
        region: captures[2].to_string(),
        account_id: captures[3].to_string(),
        name: captures[4].to_string(),
    })
}

/// Build the ARN of an S3 bucket. Targets that already are S3 ARNs pass through.
pub fn build_bucket_arn(partition: &str, bucket: &str) -> String {
    if bucket.starts_with("arn:") && bucket.contains(":s3:::") {
        bucket.to_string()
    } else {
        format!("arn:{partition}:s3:::{bucket}")
    }
}

/// Account ids are exactly 12 ASCII digits.
pub fn validate_account_id(account_id: &str) -> PolicyGrantResult<()> {
    if account_id.len() == 12 && account_id.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(PolicyGrantError::usage(format!(
            "'{account_id}' is not a valid AWS account id (expected 12 digits)"
        )))
    }
}
