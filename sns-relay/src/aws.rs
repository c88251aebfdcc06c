//! Shared AWS SDK configuration.
//!
//! Both the SNS and CloudWatch Logs clients are built from one `SdkConfig`
//! carrying the static credentials, region and operation timeout.

use std::sync::Arc;
use std::time::Duration;

use aws_config::{timeout::TimeoutConfig, BehaviorVersion, SdkConfig};
use aws_sdk_sns::config::{Credentials, Region};
use tracing::info;

use crate::{AppState, CloudWatchSink, Config, SnsNotifier};

/// Provider name attached to the static credentials.
const CREDENTIALS_PROVIDER: &str = "sns-relay-environment";

/// Build the SDK configuration from application configuration.
pub async fn load_sdk_config(config: &Config) -> SdkConfig {
    let credentials = Credentials::new(
        config.aws_access_key.clone(),
        config.aws_secret_key().to_string(),
        None,
        None,
        CREDENTIALS_PROVIDER,
    );

    let timeouts = TimeoutConfig::builder()
        .operation_timeout(Duration::from_millis(config.request_timeout_ms))
        .build();

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(credentials)
        .timeout_config(timeouts)
        .load()
        .await;

    info!(
        region = %config.aws_region,
        api_version = %config.aws_api_version,
        operation_timeout_ms = config.request_timeout_ms,
        "aws_sdk_config_loaded"
    );

    sdk_config
}

/// Build the SDK clients and wrap them, with the configuration, into the
/// state shared by every request.
pub async fn build_state(config: Config) -> AppState {
    let sdk_config = load_sdk_config(&config).await;

    let notifier = SnsNotifier::new(aws_sdk_sns::Client::new(&sdk_config));

    let log_sink = CloudWatchSink::new(
        aws_sdk_cloudwatchlogs::Client::new(&sdk_config),
        config.cw_group_name.clone(),
        config.cw_stream_name.clone(),
        config.cw_retention_days,
        config.logger_name.clone(),
    );

    AppState::new(config, Arc::new(notifier), Arc::new(log_sink))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::from_lookup(|name| {
            let value = match name {
                "AWS_REGION" => "ap-southeast-2",
                "AWS_CREDENTIALS_KEY" => "AKIDEXAMPLE",
                "AWS_CREDENTIALS_SECRET" => "SECRET",
                "AWS_SNS_TOPIC1" => "arn:aws:sns:ap-southeast-2:123456789012:topic1",
                "CW_GROUPNAME" => "group",
                "CW_STREAMNAMEINSTANCE" => "stream",
                "CF_LOGGERNAME" => "relay",
                "REQUEST_TIMEOUT_MS" => "2500",
                _ => return None,
            };
            Some(value.to_string())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_sdk_config_uses_configured_region_and_timeout() {
        let sdk_config = load_sdk_config(&config()).await;

        assert_eq!(
            sdk_config.region().map(|r| r.to_string()),
            Some("ap-southeast-2".to_string())
        );
        assert_eq!(
            sdk_config.timeout_config().and_then(|t| t.operation_timeout()),
            Some(Duration::from_millis(2500))
        );
        assert!(sdk_config.credentials_provider().is_some());
    }

    #[tokio::test]
    async fn test_build_state_keeps_config() {
        let state = build_state(config()).await;

        assert_eq!(
            state.config.sns_topic_arn,
            "arn:aws:sns:ap-southeast-2:123456789012:topic1"
        );
    }
}
