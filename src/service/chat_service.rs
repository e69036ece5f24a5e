use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dto::message_dto::{ChatPartner, MessageView, SendMessageRequest};
use crate::dto::user_dto::UserProfile;
use crate::model::message::Message;
use crate::realtime::presence::{PresenceRegistry, ServerEvent};
use crate::repository::message_repo::{MessageRepository, MessageRepositoryImpl};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::image;
use crate::util::minio::MinioService;

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Every other user, with the count of their messages the caller hasn't seen.
    async fn sidebar(&self, user_id: &ObjectId) -> Result<Vec<ChatPartner>, ServiceError>;
    /// Conversation with `other`, oldest first; marks their messages seen.
    async fn conversation(
        &self,
        user_id: &ObjectId,
        other: &ObjectId,
    ) -> Result<Vec<MessageView>, ServiceError>;
    async fn send_message(
        &self,
        sender: &ObjectId,
        receiver: &ObjectId,
        payload: SendMessageRequest,
    ) -> Result<MessageView, ServiceError>;
    async fn mark_message_seen(
        &self,
        user_id: &ObjectId,
        message_id: &ObjectId,
    ) -> Result<(), ServiceError>;
}

pub struct ChatServiceImpl {
    pub message_repo: Arc<MessageRepositoryImpl>,
    pub user_repo: Arc<UserRepositoryImpl>,
    pub media: Arc<MinioService>,
    pub presence: Arc<PresenceRegistry>,
}

impl ChatServiceImpl {
    pub fn new(
        message_repo: Arc<MessageRepositoryImpl>,
        user_repo: Arc<UserRepositoryImpl>,
        media: Arc<MinioService>,
        presence: Arc<PresenceRegistry>,
    ) -> Self {
        Self {
            message_repo,
            user_repo,
            media,
            presence,
        }
    }

    /// Decode, verify, and offload a message image; returns its public URL.
    async fn store_message_image(
        &self,
        sender: &ObjectId,
        data_url: &str,
    ) -> Result<String, ServiceError> {
        let decoded = image::parse_data_url(data_url)
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid image: {}", e)))?;

        let object_name = format!(
            "messages/{}/{}{}",
            sender.to_hex(),
            Uuid::new_v4(),
            decoded.extension
        );
        self.media
            .put_object(&object_name, decoded.bytes, Some(&decoded.content_type))
            .await
            .map_err(|e| ServiceError::InternalError(format!("Media upload error: {}", e)))?;

        Ok(self.media.public_url(&object_name))
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn sidebar(&self, user_id: &ObjectId) -> Result<Vec<ChatPartner>, ServiceError> {
        let users = self.user_repo.find_all_except(user_id).await?;

        let mut partners = Vec::with_capacity(users.len());
        for user in users {
            let unseen_count = match user.id {
                Some(ref partner_id) => {
                    self.message_repo.count_unseen_from(partner_id, user_id).await?
                }
                None => 0,
            };
            partners.push(ChatPartner {
                user: UserProfile::from(user),
                unseen_count,
            });
        }
        Ok(partners)
    }

    #[instrument(skip(self), fields(user_id = %user_id, other = %other))]
    async fn conversation(
        &self,
        user_id: &ObjectId,
        other: &ObjectId,
    ) -> Result<Vec<MessageView>, ServiceError> {
        // Opening a conversation reads it; flag the partner's messages seen
        // first so the returned view carries the updated flags.
        let marked = self.message_repo.mark_conversation_seen(other, user_id).await?;
        if marked > 0 {
            debug!("Marked {} messages from {} as seen", marked, other);
        }

        let messages = self.message_repo.find_conversation(user_id, other).await?;
        Ok(messages.into_iter().map(MessageView::from).collect())
    }

    #[instrument(skip(self, payload), fields(sender = %sender, receiver = %receiver))]
    async fn send_message(
        &self,
        sender: &ObjectId,
        receiver: &ObjectId,
        payload: SendMessageRequest,
    ) -> Result<MessageView, ServiceError> {
        if sender == receiver {
            return Err(ServiceError::InvalidInput(
                "Cannot send a message to yourself".to_string(),
            ));
        }

        self.user_repo
            .find_by_id(receiver)
            .await?
            .ok_or(ServiceError::NotFound("Recipient not found".to_string()))?;

        let image_url = match payload.image {
            Some(ref data_url) => Some(self.store_message_image(sender, data_url).await?),
            None => None,
        };

        let message = Message {
            id: None,
            sender_id: *sender,
            receiver_id: *receiver,
            text: payload.text,
            image_url,
            seen: false,
            created_at: None,
        };
        let inserted = self.message_repo.insert(message).await?;
        info!("Message stored");

        let view = MessageView::from(inserted);

        // Push to the recipient's live connections; offline recipients will
        // pick the message up over HTTP.
        let delivered = self
            .presence
            .send_to(
                &view.receiver_id,
                ServerEvent::NewMessage {
                    message: view.clone(),
                },
            )
            .await;
        debug!("Pushed message to {} live connections", delivered);

        Ok(view)
    }

    #[instrument(skip(self), fields(user_id = %user_id, message_id = %message_id))]
    async fn mark_message_seen(
        &self,
        user_id: &ObjectId,
        message_id: &ObjectId,
    ) -> Result<(), ServiceError> {
        let message = self
            .message_repo
            .find_by_id(message_id)
            .await?
            .ok_or(ServiceError::NotFound("Message not found".to_string()))?;

        // Only the addressee can mark a message seen.
        if message.receiver_id != *user_id {
            return Err(ServiceError::InvalidInput(
                "Message is not addressed to this user".to_string(),
            ));
        }

        self.message_repo.mark_seen(message_id).await?;
        Ok(())
    }
}
