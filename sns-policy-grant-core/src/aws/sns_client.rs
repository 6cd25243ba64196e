//! AWS SNS client wrapper for topic policy operations

use crate::aws::store::{PolicyStore, WriteReceipt};
use crate::aws::{AwsError, AwsResult};
use crate::policy::PolicyDocument;
use async_trait::async_trait;
use aws_sdk_sns::error::ProvideErrorMetadata;
use aws_sdk_sns::operation::RequestId;
use aws_sdk_sns::Client as SnsClient;
use std::fmt::Display;

/// Topic attribute holding the access policy JSON.
pub(crate) const POLICY_ATTRIBUTE: &str = "Policy";

/// Settings used to build the SDK configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Overrides the region from the default provider chain.
    pub region: Option<String>,
    /// Named profile from the shared config/credentials files.
    pub profile: Option<String>,
}

/// [`PolicyStore`] backed by the SNS topic attribute API.
#[derive(Debug, Clone)]
pub struct SnsPolicyStore {
    client: SnsClient,
}

impl SnsPolicyStore {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }

    /// Load the SDK configuration through the standard provider chain.
    pub async fn from_config(config: &ClientConfig) -> AwsResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        if sdk_config.region().is_none() {
            return Err(AwsError::ConfigError(
                "no AWS region configured; pass --region or set AWS_REGION".to_string(),
            ));
        }
        log::debug!("Using SNS in region {:?}", sdk_config.region());

        Ok(Self::new(SnsClient::new(&sdk_config)))
    }
}

#[async_trait]
impl PolicyStore for SnsPolicyStore {
    async fn fetch(&self, topic_arn: &str) -> AwsResult<PolicyDocument> {
        log::info!("Getting attributes for topic {topic_arn}");

        let response = self
            .client
            .get_topic_attributes()
            .topic_arn(topic_arn)
            .send()
            .await
            .map_err(|e| {
                AwsError::SnsError(format!(
                    "Failed to get attributes of topic '{topic_arn}': {}",
                    describe(&e)
                ))
            })?;

        let Some(policy_json) = response
            .attributes()
            .and_then(|attributes| attributes.get(POLICY_ATTRIBUTE))
        else {
            log::warn!(
                "Topic {topic_arn} has no policy attribute, starting from an empty policy"
            );
            return Ok(PolicyDocument::default());
        };
        log::debug!("Fetched policy for {topic_arn}: {policy_json}");

        PolicyDocument::from_json(policy_json)
            .map_err(|e| AwsError::PolicyError(format!("Failed to parse topic policy JSON: {e}")))
    }

    async fn write(&self, topic_arn: &str, document: &PolicyDocument) -> AwsResult<WriteReceipt> {
        let policy_json = document
            .to_json()
            .map_err(|e| AwsError::PolicyError(format!("Failed to serialize policy: {e}")))?;
        log::debug!("Writing policy for {topic_arn}: {policy_json}");

        let response = self
            .client
            .set_topic_attributes()
            .topic_arn(topic_arn)
            .attribute_name(POLICY_ATTRIBUTE)
            .attribute_value(policy_json)
            .send()
            .await
            .map_err(|e| {
                AwsError::SnsError(format!(
                    "Failed to set policy on topic '{topic_arn}': {}",
                    describe(&e)
                ))
            })?;

        Ok(WriteReceipt {
            request_id: response.request_id().map(str::to_string),
        })
    }
}

/// Prefer the service's own error message over the SDK's wrapper text.
fn describe<E>(error: &E) -> String
where
    E: ProvideErrorMetadata + Display,
{
    match (error.code(), error.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => error.to_string(),
    }
}
