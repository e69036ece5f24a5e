use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::dto::user_dto::{UpdateProfileRequest, UserProfile};
use crate::model::user::User;
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::image;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::minio::MinioService;
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserAuth {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn signup(&self, user: User, password: String) -> Result<UserAuth, ServiceError>;
    async fn login(&self, email: String, password: String) -> Result<UserAuth, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError>;
    async fn profile(&self, user_id: &ObjectId) -> Result<UserProfile, ServiceError>;
    async fn update_profile(
        &self,
        user_id: &ObjectId,
        update: UpdateProfileRequest,
    ) -> Result<UserProfile, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub media: Arc<MinioService>,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<UserRepositoryImpl>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
        media: Arc<MinioService>,
    ) -> Self {
        Self {
            user_repo,
            jwt_utils,
            media,
        }
    }

    fn token_pair_for(&self, user: &User) -> Result<TokenPair, ServiceError> {
        let user_id = user.id.as_ref().map(|id| id.to_hex()).unwrap_or_default();
        self.jwt_utils
            .generate_token_pair(&user_id, &user.email)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))
    }

    /// Decode, verify, and offload a profile picture; returns its public URL.
    async fn store_profile_pic(
        &self,
        user_id: &ObjectId,
        data_url: &str,
    ) -> Result<String, ServiceError> {
        let decoded = image::parse_data_url(data_url)
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid profile picture: {}", e)))?;

        let object_name = format!(
            "profiles/{}/{}{}",
            user_id.to_hex(),
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
impl UserService for UserServiceImpl {
    #[instrument(skip(self, user, password), fields(email = %user.email))]
    async fn signup(&self, mut user: User, password: String) -> Result<UserAuth, ServiceError> {
        info!("Registering new user");

        if let Err(problems) = PasswordUtilsImpl::validate_password_strength(&password) {
            return Err(ServiceError::InvalidInput(format!(
                "Weak password: {}",
                problems.join("; ")
            )));
        }

        // The email uniqueness check races with concurrent signups; the
        // duplicate-key mapping on insert is the backstop.
        if self.user_repo.find_by_email(&user.email).await?.is_some() {
            return Err(ServiceError::Conflict("Account already exists".to_string()));
        }

        let hash = PasswordUtilsImpl::hash_password(&password)
            .map_err(|e| ServiceError::InvalidInput(format!("Password hash error: {}", e)))?;
        user.password_hash = hash;

        let inserted = self.user_repo.insert(user).await;
        match &inserted {
            Ok(_) => info!("User inserted successfully"),
            Err(e) => error!("Failed to insert user: {e}"),
        }
        let inserted = inserted?;

        let tokens = self.token_pair_for(&inserted)?;
        Ok(UserAuth {
            user: UserProfile::from(inserted),
            tokens,
        })
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: String, password: String) -> Result<UserAuth, ServiceError> {
        info!("User login attempt");

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(ServiceError::NotFound("User not found".to_string()))?;

        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InvalidInput(format!("Password verify error: {}", e)))?;
        if !valid {
            error!("Invalid credentials for user: {}", email);
            return Err(ServiceError::InvalidInput("Invalid credentials".to_string()));
        }

        let tokens = self.token_pair_for(&user)?;
        info!("User logged in successfully");
        Ok(UserAuth {
            user: UserProfile::from(user),
            tokens,
        })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<TokenPair, ServiceError> {
        info!("Refreshing token");
        let claims = self
            .jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::InvalidInput(format!("Invalid refresh token: {}", e)))?;
        let tokens = self
            .jwt_utils
            .generate_token_pair(&claims.sub, &claims.email)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        info!("Token refreshed successfully");
        Ok(tokens)
    }

    #[instrument(skip(self))]
    async fn profile(&self, user_id: &ObjectId) -> Result<UserProfile, ServiceError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("User not found".to_string()))?;
        Ok(UserProfile::from(user))
    }

    #[instrument(skip(self, update), fields(user_id = %user_id))]
    async fn update_profile(
        &self,
        user_id: &ObjectId,
        update: UpdateProfileRequest,
    ) -> Result<UserProfile, ServiceError> {
        info!("Updating user profile");

        let mut user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("User not found".to_string()))?;

        if let Some(ref data_url) = update.profile_pic {
            let url = self.store_profile_pic(user_id, data_url).await?;
            user.profile_pic_url = Some(url);
        }
        user.fullname = update.fullname;
        user.bio = update.bio;

        let updated = self.user_repo.update(*user_id, user).await?;
        info!("Profile updated successfully");
        Ok(UserProfile::from(updated))
    }
}
