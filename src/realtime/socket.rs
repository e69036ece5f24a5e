use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::realtime::presence::PresenceRegistry;
use crate::util::error::HandlerError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct WsState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub presence: Arc<PresenceRegistry>,
}

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// Access token; browsers cannot set an Authorization header on WebSocket
    pub token: String,
}

pub async fn ws_handler(
    State(state): State<Arc<WsState>>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let claims = match state.jwt_utils.validate_access_token(&query.token) {
        Ok(claims) => claims,
        Err(e) => {
            warn!("WebSocket upgrade rejected: {}", e);
            return HandlerError::unauthorized("Invalid or expired token").into_response();
        }
    };

    let user_id = claims.sub;
    let presence = state.presence.clone();
    ws.on_upgrade(move |socket| run_socket_broker(socket, user_id, presence))
}

/// Drives a single connected client: a writer task drains the presence
/// channel into the socket, a reader task watches for the close frame,
/// and whichever finishes first aborts the other.
async fn run_socket_broker(stream: WebSocket, user_id: String, presence: Arc<PresenceRegistry>) {
    info!("WebSocket session opened for user {}", user_id);

    let (conn_id, mut events) = presence.connect(&user_id).await;
    let (mut sender, mut receiver) = stream.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let payload = match serde_json::to_string(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("Failed to serialize server event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    // Clients do not send chat traffic over the socket (that goes over HTTP);
    // we only care about the connection staying up.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Close(_) => break,
                other => debug!("Ignoring client frame: {:?}", other),
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    presence.disconnect(&user_id, conn_id).await;
    info!("WebSocket session closed for user {}", user_id);
}
