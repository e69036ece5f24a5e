use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    Extension,
};
use validator::Validate;

use crate::dto::message_dto::{
    ConversationResponse, MarkSeenResponse, SendMessageRequest, SendMessageResponse,
    SidebarResponse,
};
use crate::service::chat_service::{ChatService, ChatServiceImpl};
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

fn path_id(raw: &str) -> Result<bson::oid::ObjectId, HandlerError> {
    bson::oid::ObjectId::parse_str(raw)
        .map_err(|_| HandlerError::bad_request(format!("Invalid id: {}", raw)))
}

// Sidebar: chat partners with unseen counts
pub async fn sidebar_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = caller_id(&claims)?;
    let users = service.sidebar(&user_id).await?;
    Ok(Json(SidebarResponse {
        success: true,
        users,
    }))
}

// Conversation with the user in the path; marks their messages seen
pub async fn conversation_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = caller_id(&claims)?;
    let other = path_id(&id)?;
    let messages = service.conversation(&user_id, &other).await?;
    Ok(Json(ConversationResponse {
        success: true,
        messages,
    }))
}

// Send a message to the user in the path
pub async fn send_message_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(validation_error)?;

    let sender = caller_id(&claims)?;
    let receiver = path_id(&id)?;
    let message = service.send_message(&sender, &receiver, payload).await?;
    Ok(Json(SendMessageResponse {
        success: true,
        message: "Message sent".to_string(),
        data: message,
    }))
}

// Mark a single message seen
pub async fn mark_seen_handler(
    State(service): State<Arc<ChatServiceImpl>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let user_id = caller_id(&claims)?;
    let message_id = path_id(&id)?;
    service.mark_message_seen(&user_id, &message_id).await?;
    Ok(Json(MarkSeenResponse {
        success: true,
        message: "Message marked as seen".to_string(),
    }))
}
