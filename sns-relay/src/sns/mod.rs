//! SNS module.
//!
//! This module provides:
//! - Payload and header types for inbound SNS HTTP deliveries
//! - The [`Notifier`] seam and its SDK-backed implementation

pub mod client;
pub mod types;

pub use client::{Notifier, SnsNotifier};
pub use types::{MessageType, SnsPayload, MESSAGE_TYPE_HEADER, PUSH_MESSAGE, PUSH_SUBJECT};
