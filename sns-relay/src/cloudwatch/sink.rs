//! CloudWatch Logs sink.
//!
//! The log group and stream are created lazily on the first write. A group
//! created here gets the configured retention policy; an existing group is
//! left untouched.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::{types::InputLogEvent, Client};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::record::{Level, LogRecord};

/// Destination for structured log records.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn write(&self, record: LogRecord) -> Result<()>;
}

/// Mirror a record to the process's own tracing output.
fn trace_record(record: &LogRecord) {
    match record.level {
        Level::Notice => info!(context = ?record.context, "{}", record.message),
        Level::Warning => warn!(context = ?record.context, "{}", record.message),
    }
}

/// [`LogSink`] writing to a CloudWatch Logs stream.
#[derive(Clone)]
pub struct CloudWatchSink {
    inner: Arc<SinkInner>,
}

struct SinkInner {
    client: Client,
    group_name: String,
    stream_name: String,
    retention_days: i32,
    channel: String,
    state: RwLock<InitState>,
}

/// Progress of the one-time group and stream setup.
#[derive(Debug, Default)]
struct InitState {
    ready: bool,
    /// Set once this process creates the group, cleared by a successful
    /// PutRetentionPolicy. Survives a failed attempt so the next write retries.
    retention_pending: bool,
}

/// Whether an SDK error is the service's "already exists" answer.
macro_rules! already_exists {
    ($err:expr) => {
        $err.as_service_error()
            .map(|se| se.is_resource_already_exists_exception())
            .unwrap_or(false)
    };
}

impl CloudWatchSink {
    pub fn new(
        client: Client,
        group_name: String,
        stream_name: String,
        retention_days: i32,
        channel: String,
    ) -> Self {
        Self {
            inner: Arc::new(SinkInner {
                client,
                group_name,
                stream_name,
                retention_days,
                channel,
                state: RwLock::new(InitState::default()),
            }),
        }
    }

    /// Ensure the log group and stream exist.
    async fn ensure_initialized(&self) -> Result<()> {
        if self.inner.state.read().await.ready {
            return Ok(());
        }

        let mut state = self.inner.state.write().await;

        // Double-check after acquiring write lock
        if state.ready {
            return Ok(());
        }

        let inner = &self.inner;

        info!(
            group = %inner.group_name,
            stream = %inner.stream_name,
            retention_pending = state.retention_pending,
            "cloudwatch_sink_initializing"
        );

        match inner
            .client
            .create_log_group()
            .log_group_name(&inner.group_name)
            .send()
            .await
        {
            Ok(_) => {
                state.retention_pending = true;
                info!(group = %inner.group_name, "cloudwatch_log_group_created");
            }
            Err(e) if already_exists!(e) => {}
            Err(e) => return Err(e).context("Failed to create log group"),
        }

        if state.retention_pending {
            inner
                .client
                .put_retention_policy()
                .log_group_name(&inner.group_name)
                .retention_in_days(inner.retention_days)
                .send()
                .await
                .context("Failed to set log group retention")?;

            state.retention_pending = false;

            info!(
                group = %inner.group_name,
                retention_days = inner.retention_days,
                "cloudwatch_retention_applied"
            );
        }

        match inner
            .client
            .create_log_stream()
            .log_group_name(&inner.group_name)
            .log_stream_name(&inner.stream_name)
            .send()
            .await
        {
            Ok(_) => info!(stream = %inner.stream_name, "cloudwatch_log_stream_created"),
            Err(e) if already_exists!(e) => {}
            Err(e) => return Err(e).context("Failed to create log stream"),
        }

        state.ready = true;

        Ok(())
    }
}

#[async_trait]
impl LogSink for CloudWatchSink {
    async fn write(&self, record: LogRecord) -> Result<()> {
        trace_record(&record);

        self.ensure_initialized().await?;

        let event = InputLogEvent::builder()
            .timestamp(record.timestamp_millis())
            .message(record.format_line(&self.inner.channel))
            .build()
            .context("Failed to build log event")?;

        self.inner
            .client
            .put_log_events()
            .log_group_name(&self.inner.group_name)
            .log_stream_name(&self.inner.stream_name)
            .log_events(event)
            .send()
            .await
            .context("Failed to put log events")?;

        Ok(())
    }
}
