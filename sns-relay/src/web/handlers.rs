//! Endpoint handlers.
//!
//! Both handlers are thin: they make at most one SNS call or one log write
//! and answer with a fixed body.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::cloudwatch::{LogRecord, LogSink};
use crate::error::AppError;
use crate::sns::{MessageType, Notifier, SnsPayload, MESSAGE_TYPE_HEADER, PUSH_MESSAGE, PUSH_SUBJECT};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub notifier: Arc<dyn Notifier>,
    pub log_sink: Arc<dyn LogSink>,
}

impl AppState {
    pub fn new(config: Config, notifier: Arc<dyn Notifier>, log_sink: Arc<dyn LogSink>) -> Self {
        Self {
            config: Arc::new(config),
            notifier,
            log_sink,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Push
// =============================================================================

/// Publish the fixed message to the configured topic.
pub async fn push(State(state): State<AppState>) -> Result<Json<[&'static str; 1]>, AppError> {
    let message_id = state
        .notifier
        .publish(&state.config.sns_topic_arn, PUSH_SUBJECT, PUSH_MESSAGE)
        .await
        .map_err(|e| AppError::upstream("sns:publish", e))?;

    info!(message_id = %message_id, "push_published");

    Ok(Json(["push"]))
}

// =============================================================================
// Read
// =============================================================================

/// Receive an SNS HTTP delivery.
///
/// SNS posts JSON with a `text/plain` content type, so the body is parsed
/// directly rather than through the `Json` extractor.
pub async fn read(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<&'static str, AppError> {
    let payload: SnsPayload = serde_json::from_slice(&body)?;

    let message_type = MessageType::from_header(
        headers
            .get(MESSAGE_TYPE_HEADER)
            .and_then(|v| v.to_str().ok()),
    );

    info!(
        message_type = %message_type.as_str(),
        payload_type = payload.kind.as_deref().unwrap_or_default(),
        message_id = payload.message_id.as_deref().unwrap_or_default(),
        body_length = body.len(),
        "sns_delivery_received"
    );

    if message_type == MessageType::SubscriptionConfirmation {
        let token = SnsPayload::require(&payload.token, "Token").map_err(AppError::MissingField)?;

        state
            .log_sink
            .write(LogRecord::notice("sns:confirmSubscription"))
            .await
            .map_err(|e| AppError::upstream("logs:write", e))?;

        state
            .notifier
            .confirm_subscription(&state.config.sns_topic_arn, token)
            .await
            .map_err(|e| AppError::upstream("sns:confirmSubscription", e))?;

        info!("subscription_confirmed");
    } else {
        let subject = SnsPayload::require(&payload.subject, "Subject").map_err(AppError::MissingField)?;
        let message = SnsPayload::require(&payload.message, "Message").map_err(AppError::MissingField)?;
        let timestamp =
            SnsPayload::require(&payload.timestamp, "Timestamp").map_err(AppError::MissingField)?;

        let record = LogRecord::warning("read")
            .with("Subject", subject)
            .with("Message", message)
            .with("Timestamp", timestamp);

        state
            .log_sink
            .write(record)
            .await
            .map_err(|e| AppError::upstream("logs:write", e))?;
    }

    Ok("OK")
}
