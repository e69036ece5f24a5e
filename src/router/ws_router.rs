use std::sync::Arc;

use axum::{routing::get, Router};

use crate::realtime::socket::{ws_handler, WsState};

pub fn ws_router(state: Arc<WsState>) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}
