use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handler::user_handler::{
    check_auth_handler, login_handler, refresh_token_handler, signup_handler,
    update_profile_handler,
};
use crate::middlewares::auth_middleware::{require_auth, AuthState};
use crate::service::user_service::UserServiceImpl;

pub fn user_router(service: Arc<UserServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public routes
    let public = Router::new()
        .route("/api/auth/signup", post(signup_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/refresh-token", post(refresh_token_handler));

    // Token-protected routes
    let protected = Router::new()
        .route("/api/auth/check", get(check_auth_handler))
        .route("/api/auth/update-profile", put(update_profile_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth));

    public.merge(protected).with_state(service)
}
