//! SNS client used by the web handlers.
//!
//! Handlers talk to the [`Notifier`] trait so the SDK client can be swapped
//! for a recorder in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_sns::Client;
use tracing::info;

/// Outbound SNS operations.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish a message to a topic, returning the SNS message id.
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<String>;

    /// Complete a subscription handshake, returning the subscription ARN.
    async fn confirm_subscription(&self, topic_arn: &str, token: &str) -> Result<String>;
}

/// [`Notifier`] backed by the AWS SDK.
#[derive(Clone)]
pub struct SnsNotifier {
    client: Client,
}

impl SnsNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, topic_arn: &str, subject: &str, message: &str) -> Result<String> {
        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .context("Failed to publish to SNS topic")?;

        let message_id = output.message_id().unwrap_or_default().to_string();

        info!(
            topic_arn = %topic_arn,
            message_id = %message_id,
            message_length = message.len(),
            "sns_published"
        );

        Ok(message_id)
    }

    async fn confirm_subscription(&self, topic_arn: &str, token: &str) -> Result<String> {
        let output = self
            .client
            .confirm_subscription()
            .topic_arn(topic_arn)
            .token(token)
            .send()
            .await
            .context("Failed to confirm SNS subscription")?;

        let subscription_arn = output.subscription_arn().unwrap_or_default().to_string();

        info!(
            topic_arn = %topic_arn,
            subscription_arn = %subscription_arn,
            "sns_subscription_confirmed"
        );

        Ok(subscription_arn)
    }
}
