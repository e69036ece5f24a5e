use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;

use crate::config::mongo_conf::MongoConfig;
use crate::model::message::Message;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, message: Message) -> RepositoryResult<Message>;
    /// All messages between the two users, ascending by creation time.
    async fn find_conversation(&self, a: &ObjectId, b: &ObjectId) -> RepositoryResult<Vec<Message>>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Message>>;
    /// Flag every unseen message from `sender` to `receiver` as seen.
    async fn mark_conversation_seen(
        &self,
        sender: &ObjectId,
        receiver: &ObjectId,
    ) -> RepositoryResult<u64>;
    async fn mark_seen(&self, id: &ObjectId) -> RepositoryResult<()>;
    async fn count_unseen_from(&self, sender: &ObjectId, receiver: &ObjectId)
        -> RepositoryResult<u64>;
}

pub struct MessageRepositoryImpl {
    collection: mongodb::Collection<Message>,
}

impl MessageRepositoryImpl {
    pub async fn new(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        use mongodb::{
            options::{ClientOptions, Credential, ResolverConfig},
            Client,
        };
        let mut client_options =
            ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare())
                .await?;
        client_options.app_name = Some("QuickChatBackend".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout =
            Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
            client_options.credential = Some(
                Credential::builder()
                    .username(username.clone())
                    .password(password.clone())
                    .build(),
            );
        }
        let client = Client::with_options(client_options)?;
        let db = client.database(&config.database);
        let collection = db.collection::<Message>("messages");
        Ok(MessageRepositoryImpl { collection })
    }
}

#[async_trait]
impl MessageRepository for MessageRepositoryImpl {
    async fn insert(&self, mut message: Message) -> RepositoryResult<Message> {
        use chrono::Utc;

        message.id = Some(ObjectId::new());
        message.created_at = Some(Utc::now().to_rfc3339());
        let result = self.collection.insert_one(message.clone(), None).await;
        match result {
            Ok(_) => Ok(message),
            Err(e) => Err(RepositoryError::from(e)),
        }
    }

    async fn find_conversation(&self, a: &ObjectId, b: &ObjectId) -> RepositoryResult<Vec<Message>> {
        let filter = doc! {
            "$or": [
                { "sender_id": a, "receiver_id": b },
                { "sender_id": b, "receiver_id": a },
            ]
        };
        let options = FindOptions::builder().sort(doc! { "created_at": 1 }).build();
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to fetch conversation: {}", e)))?;

        let mut messages = Vec::new();
        while let Some(message) = cursor.try_next().await.map_err(|e| {
            RepositoryError::database(format!("Failed to read message cursor: {}", e))
        })? {
            messages.push(message);
        }
        Ok(messages)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Message>> {
        let filter = doc! { "_id": id };
        let message = self
            .collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find message by id: {}", e)))?;
        Ok(message)
    }

    async fn mark_conversation_seen(
        &self,
        sender: &ObjectId,
        receiver: &ObjectId,
    ) -> RepositoryResult<u64> {
        let filter = doc! { "sender_id": sender, "receiver_id": receiver, "seen": false };
        let update = doc! { "$set": { "seen": true } };
        let result = self
            .collection
            .update_many(filter, update, None)
            .await
            .map_err(|e| {
                RepositoryError::database(format!("Failed to mark conversation seen: {}", e))
            })?;
        Ok(result.modified_count)
    }

    async fn mark_seen(&self, id: &ObjectId) -> RepositoryResult<()> {
        let filter = doc! { "_id": id };
        let update = doc! { "$set": { "seen": true } };
        let result = self
            .collection
            .update_one(filter, update, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to mark message seen: {}", e)))?;
        if result.matched_count == 0 {
            return Err(RepositoryError::not_found(format!(
                "No message found for ID: {}",
                id
            )));
        }
        Ok(())
    }

    async fn count_unseen_from(
        &self,
        sender: &ObjectId,
        receiver: &ObjectId,
    ) -> RepositoryResult<u64> {
        let filter = doc! { "sender_id": sender, "receiver_id": receiver, "seen": false };
        let count = self
            .collection
            .count_documents(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count unseen: {}", e)))?;
        Ok(count)
    }
}
