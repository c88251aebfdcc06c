//! SNS relay - HTTP façade over AWS SNS and CloudWatch Logs.
//!
//! ## Architecture
//!
//! ```text
//! GET  /push → Notifier::publish → SNS topic
//! SNS  → POST /read → Notifier::confirm_subscription   (SubscriptionConfirmation)
//!                   → LogSink::write → CloudWatch Logs (everything else)
//! ```

pub mod aws;
pub mod cloudwatch;
pub mod config;
pub mod error;
pub mod sns;
pub mod web;

// Re-export commonly used types
pub use cloudwatch::{CloudWatchSink, LogRecord, LogSink};
pub use config::{Config, ConfigError};
pub use error::AppError;
pub use sns::{Notifier, SnsNotifier, SnsPayload};
pub use web::{build_router, AppState};
