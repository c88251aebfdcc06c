//! CloudWatch Logs module.
//!
//! Structured records produced by the webhook handler are rendered to a
//! single line and appended to a CloudWatch Logs stream.

pub mod record;
pub mod sink;

pub use record::{Level, LogRecord};
pub use sink::{CloudWatchSink, LogSink};
