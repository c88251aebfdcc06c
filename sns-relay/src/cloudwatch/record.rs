//! Log records written to the sink.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// Datetime layout of a rendered line.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Notice,
    Warning,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structured log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    pub context: BTreeMap<String, String>,
    pub datetime: DateTime<Utc>,
}

impl LogRecord {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            context: BTreeMap::new(),
            datetime: Utc::now(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(Level::Notice, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    /// Attach a context field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Epoch milliseconds, as CloudWatch expects event timestamps.
    pub fn timestamp_millis(&self) -> i64 {
        self.datetime.timestamp_millis()
    }

    /// Render as `[Y-m-d H:i:s] channel.LEVEL: message {context}`.
    ///
    /// The context object is omitted when empty. Datetimes are UTC.
    pub fn format_line(&self, channel: &str) -> String {
        let mut line = format!(
            "[{}] {}.{}: {}",
            self.datetime.format(DATETIME_FORMAT),
            channel,
            self.level,
            self.message
        );

        if !self.context.is_empty() {
            // A map of strings always serializes.
            let context = serde_json::to_string(&self.context).unwrap_or_default();
            line.push(' ');
            line.push_str(&context);
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_format_line_with_context() {
        let mut record = LogRecord::warning("read")
            .with("Subject", "s")
            .with("Message", "m")
            .with("Timestamp", "t");
        record.datetime = fixed_time();

        assert_eq!(
            record.format_line("relay"),
            r#"[2024-03-01 12:30:45] relay.WARNING: read {"Message":"m","Subject":"s","Timestamp":"t"}"#
        );
    }

    #[test]
    fn test_format_line_without_context() {
        let mut record = LogRecord::notice("sns:confirmSubscription");
        record.datetime = fixed_time();

        assert_eq!(
            record.format_line("relay"),
            "[2024-03-01 12:30:45] relay.NOTICE: sns:confirmSubscription"
        );
    }

    #[test]
    fn test_timestamp_millis() {
        let mut record = LogRecord::notice("x");
        record.datetime = fixed_time();

        assert_eq!(record.timestamp_millis(), 1_709_296_245_000);
    }
}
