use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::dto::user_dto::UserProfile;
use crate::model::message::Message;

#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = "validate_payload_kind"))]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 4096))]
    pub text: Option<String>,
    /// Base64 image data URL; verified server-side before storage
    pub image: Option<String>,
}

/// A message carries exactly one of text or image.
fn validate_payload_kind(req: &SendMessageRequest) -> Result<(), ValidationError> {
    match (&req.text, &req.image) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (Some(_), Some(_)) => Err(ValidationError::new("text_and_image")),
        (None, None) => Err(ValidationError::new("empty_message")),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageView {
    pub id: Option<ObjectId>,
    pub sender_id: String,
    pub receiver_id: String,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub seen: bool,
    pub created_at: Option<String>,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        MessageView {
            id: message.id,
            sender_id: message.sender_id.to_hex(),
            receiver_id: message.receiver_id.to_hex(),
            text: message.text,
            image_url: message.image_url,
            seen: message.seen,
            created_at: message.created_at,
        }
    }
}

/// Sidebar entry: a chat partner plus how many of their messages are unread.
#[derive(Debug, Serialize)]
pub struct ChatPartner {
    pub user: UserProfile,
    pub unseen_count: u64,
}

#[derive(Debug, Serialize)]
pub struct SidebarResponse {
    pub success: bool,
    pub users: Vec<ChatPartner>,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub success: bool,
    pub messages: Vec<MessageView>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: String,
    pub data: MessageView,
}

#[derive(Debug, Serialize)]
pub struct MarkSeenResponse {
    pub success: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_is_valid() {
        let req = SendMessageRequest {
            text: Some("hello".to_string()),
            image: None,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_image_only_is_valid() {
        let req = SendMessageRequest {
            text: None,
            image: Some("data:image/png;base64,AAAA".to_string()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_both_fields_rejected() {
        let req = SendMessageRequest {
            text: Some("hello".to_string()),
            image: Some("data:image/png;base64,AAAA".to_string()),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_neither_field_rejected() {
        let req = SendMessageRequest {
            text: None,
            image: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_empty_text_rejected() {
        let req = SendMessageRequest {
            text: Some("".to_string()),
            image: None,
        };
        assert!(req.validate().is_err());
    }
}
