use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handler::message_handler::{
    conversation_handler, mark_seen_handler, send_message_handler, sidebar_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::chat_service::ChatServiceImpl;

pub fn message_router(service: Arc<ChatServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Every message route requires a valid access token
    Router::new()
        .route("/api/messages/users", get(sidebar_handler))
        .route("/api/messages/send/:id", post(send_message_handler))
        .route("/api/messages/mark/:id", put(mark_seen_handler))
        .route("/api/messages/:id", get(conversation_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(service)
}
