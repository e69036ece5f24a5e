use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    Extension,
};
use validator::Validate;

use crate::dto::user_dto::{
    AuthResponse, LoginRequest, ProfileResponse, RefreshTokenRequest, SignupRequest, TokenResponse,
    UpdateProfileRequest,
};
use crate::model::user::User;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::Claims;

fn validation_error(e: validator::ValidationErrors) -> HandlerError {
    HandlerError {
        error: HandlerErrorKind::BadRequest,
        message: format!("Validation error: {}", e),
        details: None,
    }
}

fn caller_id(claims: &Claims) -> Result<bson::oid::ObjectId, HandlerError> {
    bson::oid::ObjectId::parse_str(&claims.sub)
        .map_err(|_| HandlerError::unauthorized("Invalid subject in token"))
}

// Signup
pub async fn signup_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(validation_error)?;

    let user = User {
        id: None,
        fullname: payload.fullname,
        email: payload.email,
        password_hash: String::new(),
        bio: payload.bio,
        profile_pic_url: None,
        created_at: None,
        updated_at: None,
    };
    let auth = service.signup(user, payload.password).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Account created successfully".to_string(),
        user: auth.user,
        tokens: auth.tokens,
    }))
}

// Login
pub async fn login_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(validation_error)?;

    let auth = service.login(payload.email, payload.password).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        user: auth.user,
        tokens: auth.tokens,
    }))
}

// Refresh token
pub async fn refresh_token_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(validation_error)?;

    let tokens = service.refresh_token(payload.refresh_token).await?;
    Ok(Json(TokenResponse {
        success: true,
        tokens,
    }))
}

// Auth check: returns the profile for the validated token
pub async fn check_auth_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = caller_id(&claims)?;
    let user = service.profile(&user_id).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

// Profile update
pub async fn update_profile_handler(
    State(service): State<Arc<UserServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(validation_error)?;

    let user_id = caller_id(&claims)?;
    let user = service.update_profile(&user_id, payload).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}
