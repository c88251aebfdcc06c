//! Configuration module for environment variable parsing.
//!
//! All settings are read once at startup. Missing required variables are
//! fatal: the binary refuses to start rather than failing on first request.

use std::env;
use std::fmt;
use std::path::Path;

use secrecy::{ExposeSecret, Secret};
use thiserror::Error;
use tracing::{debug, warn};

/// Default SDK API version label, as accepted by `AWS_VERSION`.
const DEFAULT_API_VERSION: &str = "latest";

/// Default retention applied to a log group this service creates.
const DEFAULT_RETENTION_DAYS: i32 = 14;

/// Dotenv files loaded before the environment is read, in order.
const DOTENV_PATHS: &[&str] = &["env/.env", ".env"];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for environment variable {name}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    // =========================================================================
    // AWS
    // =========================================================================
    /// AWS region, e.g. `eu-west-1`
    pub aws_region: String,

    /// API version label. Logged only; the SDK always uses its latest behavior.
    pub aws_api_version: String,

    /// Access key id
    pub aws_access_key: String,

    /// Secret access key
    pub aws_secret_key: Secret<String>,

    /// ARN of the topic published to and confirmed against
    pub sns_topic_arn: String,

    // =========================================================================
    // CloudWatch Logs
    // =========================================================================
    /// Retention in days for a log group created by this service
    pub cw_retention_days: i32,

    /// Log group name
    pub cw_group_name: String,

    /// Log stream name
    pub cw_stream_name: String,

    /// Channel name rendered into every log record
    pub logger_name: String,

    // =========================================================================
    // Web Server Configuration
    // =========================================================================
    /// Port for the web server to listen on
    pub port: u16,

    /// Timeout in milliseconds for each outbound AWS operation
    pub request_timeout_ms: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("aws_region", &self.aws_region)
            .field("aws_api_version", &self.aws_api_version)
            .field("aws_access_key", &self.aws_access_key)
            .field("aws_secret_key", &"[REDACTED]")
            .field("sns_topic_arn", &self.sns_topic_arn)
            .field("cw_retention_days", &self.cw_retention_days)
            .field("cw_group_name", &self.cw_group_name)
            .field("cw_stream_name", &self.cw_stream_name)
            .field("logger_name", &self.logger_name)
            .field("port", &self.port)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

impl Config {
    /// Load dotenv files (if any) and then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Config {
            aws_region: required("AWS_REGION")?,

            aws_api_version: lookup("AWS_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),

            aws_access_key: required("AWS_CREDENTIALS_KEY")?,

            aws_secret_key: Secret::new(required("AWS_CREDENTIALS_SECRET")?),

            sns_topic_arn: required("AWS_SNS_TOPIC1")?,

            cw_retention_days: parse_or(&lookup, "CW_RETENTIONDAYS", DEFAULT_RETENTION_DAYS)?,

            cw_group_name: required("CW_GROUPNAME")?,

            cw_stream_name: required("CW_STREAMNAMEINSTANCE")?,

            logger_name: required("CF_LOGGERNAME")?,

            port: parse_or(&lookup, "PORT", 8080)?,

            request_timeout_ms: parse_or(&lookup, "REQUEST_TIMEOUT_MS", 8000)?,
        })
    }

    /// The secret access key, for handing to the credentials provider.
    pub fn aws_secret_key(&self) -> &str {
        self.aws_secret_key.expose_secret()
    }
}

/// Parse an optional variable, falling back to `default` when unset.
///
/// A value that is present but unparseable is an error, not a silent default.
fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

/// Load dotenv files. Variables already in the environment take precedence.
fn load_dotenv() {
    for path in DOTENV_PATHS {
        if !Path::new(path).exists() {
            continue;
        }
        match dotenvy::from_path(path) {
            Ok(()) => debug!(path = %path, "dotenv_loaded"),
            Err(e) => warn!(path = %path, error = %e, "dotenv_load_failed"),
        }
    }
}
