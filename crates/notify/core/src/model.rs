//! Push request and response wire types.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// The title and body shown to every recipient of a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The title of the message.
    #[serde(default)]
    pub title: String,
    /// The body of the message.
    #[serde(default)]
    pub body: String,
}

/// A push notification request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PushRequest {
    /// Recipient registration tokens. Order matters, duplicates are allowed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub recipients: Vec<String>,

    /// Custom key-value pairs attached to every notification.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub data: HashMap<String, String>,

    /// The notification message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// A notification the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Provider delivery identifier.
    pub id: String,
    pub recipient: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
}

/// A notification the provider rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationError {
    pub recipient: String,
    /// Provider error detail.
    pub message: String,
}

/// Response to a push notification request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResponse {
    /// Number of notifications the provider accepted.
    pub notifications_count: usize,

    /// Number of notifications the provider rejected.
    pub errors_count: usize,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<Notification>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<NotificationError>,
}

/// Body of every failed HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The HTTP status, mirrored from the reply.
    pub status: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_missing_and_null_fields() {
        let request: PushRequest = serde_json::from_str(r#"{"recipients": null}"#).unwrap();
        assert!(request.recipients.is_empty());
        assert!(request.data.is_empty());
        assert!(request.message.is_none());

        let request: PushRequest = serde_json::from_str("{}").unwrap();
        assert!(request.recipients.is_empty());
    }

    #[test]
    fn test_request_keeps_duplicate_recipients_in_order() {
        let request: PushRequest = serde_json::from_str(
            r#"{"recipients": ["t1", "t2", "t1"], "data": {"k": "v"}, "message": {"title": "Hi"}}"#,
        )
        .unwrap();
        assert_eq!(request.recipients, ["t1", "t2", "t1"]);
        assert_eq!(request.data["k"], "v");
        let message = request.message.unwrap();
        assert_eq!(message.title, "Hi");
        assert_eq!(message.body, "");
    }

    #[test]
    fn test_empty_response_omits_collections() {
        let json = serde_json::to_value(PushResponse::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"notificationsCount": 0, "errorsCount": 0})
        );
    }

    #[test]
    fn test_notification_omits_empty_payload() {
        let notification = Notification {
            id: "m1".into(),
            recipient: "t1".into(),
            data: HashMap::new(),
            message: None,
        };
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json, serde_json::json!({"id": "m1", "recipient": "t1"}));
    }
}
