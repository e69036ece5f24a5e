use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A single direct message between two users. Exactly one of `text` and
/// `image_url` is set; the send path rejects anything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub sender_id: ObjectId,
    pub receiver_id: ObjectId,
    pub text: Option<String>,
    pub image_url: Option<String>,
    pub seen: bool,
    pub created_at: Option<String>,
}
