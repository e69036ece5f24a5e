use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::user::User;
use crate::util::jwt::TokenPair;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 64))]
    pub fullname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 256))]
    pub bio: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 10))]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Base64 image data URL; verified server-side before storage
    pub profile_pic: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub bio: String,
    #[validate(length(min = 2, max = 64))]
    pub fullname: String,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Option<ObjectId>,
    pub fullname: String,
    pub email: String,
    pub bio: String,
    pub profile_pic_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id,
            fullname: user.fullname,
            email: user.email,
            bio: user.bio,
            profile_pic_url: user.profile_pic_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: UserProfile,
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub tokens: TokenPair,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            fullname: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "Password123!".to_string(),
            bio: "Hi there".to_string(),
        }
    }

    #[test]
    fn test_signup_request_valid() {
        assert!(valid_signup().validate().is_ok());
    }

    #[test]
    fn test_signup_request_rejects_bad_email() {
        let mut req = valid_signup();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signup_request_rejects_short_password() {
        let mut req = valid_signup();
        req.password = "short".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signup_request_rejects_empty_bio() {
        let mut req = valid_signup();
        req.bio = "".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_user_profile_drops_password_hash() {
        let user = User {
            id: None,
            fullname: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            bio: "bio".to_string(),
            profile_pic_url: None,
            created_at: None,
            updated_at: None,
        };
        let profile = UserProfile::from(user);
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
    }
}
