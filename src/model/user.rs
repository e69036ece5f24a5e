use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Option<ObjectId>,
    pub fullname: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub profile_pic_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
