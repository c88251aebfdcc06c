//! SNS message types and the fixed publish content.
//!
//! SNS delivers HTTP notifications as a JSON document whose kind is also
//! announced in the `X-Amz-Sns-Message-Type` header.

use serde::Deserialize;

/// Header SNS sets on every HTTP delivery.
pub const MESSAGE_TYPE_HEADER: &str = "x-amz-sns-message-type";

/// Body of the message published by `GET /push`.
pub const PUSH_MESSAGE: &str = "hi";

/// Subject of the message published by `GET /push`.
pub const PUSH_SUBJECT: &str = "Subject";

/// Kind of SNS delivery, taken from the message type header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageType {
    SubscriptionConfirmation,
    Notification,
    UnsubscribeConfirmation,
    /// Unrecognized header value
    Other(String),
    /// Header not present
    Missing,
}

impl MessageType {
    /// Parse the header value. Matching is exact, as SNS sends it.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some("SubscriptionConfirmation") => MessageType::SubscriptionConfirmation,
            Some("Notification") => MessageType::Notification,
            Some("UnsubscribeConfirmation") => MessageType::UnsubscribeConfirmation,
            Some(other) => MessageType::Other(other.to_string()),
            None => MessageType::Missing,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageType::SubscriptionConfirmation => "SubscriptionConfirmation",
            MessageType::Notification => "Notification",
            MessageType::UnsubscribeConfirmation => "UnsubscribeConfirmation",
            MessageType::Other(s) => s,
            MessageType::Missing => "",
        }
    }
}

/// Inbound SNS HTTP delivery.
///
/// Every field is optional: which ones are required depends on the message
/// type, and the handler checks them with [`SnsPayload::require`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsPayload {
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl SnsPayload {
    /// Borrow a required field, naming it when absent.
    pub fn require<'a>(
        field: &'a Option<String>,
        name: &'static str,
    ) -> Result<&'a str, &'static str> {
        field.as_deref().ok_or(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_from_header() {
        assert_eq!(
            MessageType::from_header(Some("SubscriptionConfirmation")),
            MessageType::SubscriptionConfirmation
        );
        assert_eq!(
            MessageType::from_header(Some("Notification")),
            MessageType::Notification
        );
        assert_eq!(MessageType::from_header(None), MessageType::Missing);
        assert_eq!(
            MessageType::from_header(Some("subscriptionconfirmation")),
            MessageType::Other("subscriptionconfirmation".to_string())
        );
    }

    #[test]
    fn test_payload_deserialization() {
        let json = r#"{
            "Type": "Notification",
            "MessageId": "22b80b92-fdea-4c2c-8f9d-bdfb0c7bf324",
            "TopicArn": "arn:aws:sns:us-west-2:123456789012:MyTopic",
            "Subject": "My First Message",
            "Message": "Hello world!",
            "Timestamp": "2012-05-02T00:54:06.655Z",
            "SignatureVersion": "1"
        }"#;

        let payload: SnsPayload = serde_json::from_str(json).unwrap();

        assert_eq!(payload.kind.as_deref(), Some("Notification"));
        assert_eq!(payload.subject.as_deref(), Some("My First Message"));
        assert_eq!(payload.message.as_deref(), Some("Hello world!"));
        assert_eq!(payload.timestamp.as_deref(), Some("2012-05-02T00:54:06.655Z"));
        assert!(payload.token.is_none());
    }

    #[test]
    fn test_payload_subscription_confirmation() {
        let json = r#"{
            "Type": "SubscriptionConfirmation",
            "Token": "2336412f37fb687f5d51e6e241d09c805a5a57b3",
            "SubscribeURL": "https://sns.us-west-2.amazonaws.com/?Action=ConfirmSubscription"
        }"#;

        let payload: SnsPayload = serde_json::from_str(json).unwrap();

        assert_eq!(
            SnsPayload::require(&payload.token, "Token"),
            Ok("2336412f37fb687f5d51e6e241d09c805a5a57b3")
        );
        assert_eq!(payload.kind.as_deref(), Some("SubscriptionConfirmation"));
    }

    #[test]
    fn test_require_missing_field() {
        let payload = SnsPayload::default();
        assert_eq!(SnsPayload::require(&payload.subject, "Subject"), Err("Subject"));
    }
}
