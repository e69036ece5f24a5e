use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use dotenv::dotenv;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt; // for .oneshot()
use uuid::Uuid;

use quickchat_backend::config::jwt_conf::JwtConfig;
use quickchat_backend::config::mongo_conf::MongoConfig;
use quickchat_backend::config::MinioConfig;
use quickchat_backend::middlewares::auth_middleware::AuthState;
use quickchat_backend::repository::user_repo::UserRepositoryImpl;
use quickchat_backend::router::user_router::user_router;
use quickchat_backend::service::user_service::UserServiceImpl;
use quickchat_backend::util::jwt::JwtTokenUtilsImpl;
use quickchat_backend::util::minio::MinioService;

/// These tests drive the real router against live MongoDB/MinIO; they skip
/// when the backing services are not configured.
fn integration_env_ready() -> bool {
    std::env::var("MONGO_URI").is_ok()
        && std::env::var("JWT_SECRET").is_ok()
        && std::env::var("MINIO_ENDPOINT").is_ok()
}

async fn build_app() -> Router {
    let mongo_config = MongoConfig::from_env().expect("mongo config");
    let jwt_config = JwtConfig::from_env().expect("jwt config");
    let minio_config = MinioConfig::from_env().expect("minio config");

    let user_repo = Arc::new(
        UserRepositoryImpl::new(&mongo_config)
            .await
            .expect("user repo"),
    );
    let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
    let media = Arc::new(MinioService::new(minio_config).await.expect("minio service"));
    let user_service = Arc::new(UserServiceImpl::new(user_repo, jwt_utils.clone(), media));
    let auth_state = Arc::new(AuthState { jwt_utils });

    Router::new().merge(user_router(user_service, auth_state))
}

fn unique_email() -> String {
    format!("user-{}@example.com", Uuid::new_v4())
}

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_signup_login_and_check_flow() {
    let _ = dotenv();
    if !integration_env_ready() {
        eprintln!("skipping: backing services not configured");
        return;
    }

    let app = build_app().await;
    let email = unique_email();

    // Signup
    let signup_body = json!({
        "fullname": "Integration Tester",
        "email": email,
        "password": "Password123!",
        "bio": "testing"
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(signup_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let signup_json = body_json(resp).await;
    assert_eq!(signup_json["success"], true);
    assert!(signup_json["tokens"]["access_token"].is_string());
    assert!(signup_json["user"]["password_hash"].is_null());

    // Duplicate signup conflicts
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(signup_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Login
    let login_body = json!({ "email": email, "password": "Password123!" });
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(login_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let login_json = body_json(resp).await;
    let access_token = login_json["tokens"]["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string();

    // Check auth with the access token
    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/check")
        .header("authorization", format!("Bearer {}", access_token))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let check_json = body_json(resp).await;
    assert_eq!(check_json["user"]["email"], email.as_str());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let _ = dotenv();
    if !integration_env_ready() {
        eprintln!("skipping: backing services not configured");
        return;
    }

    let app = build_app().await;
    let email = unique_email();

    let signup_body = json!({
        "fullname": "Integration Tester",
        "email": email,
        "password": "Password123!",
        "bio": "testing"
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(signup_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let login_body = json!({ "email": email, "password": "WrongPassword1!" });
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(login_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let login_json = body_json(resp).await;
    assert_eq!(login_json["success"], false);
}

#[tokio::test]
async fn test_check_auth_requires_token() {
    let _ = dotenv();
    if !integration_env_ready() {
        eprintln!("skipping: backing services not configured");
        return;
    }

    let app = build_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/check")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation_error() {
    let _ = dotenv();
    if !integration_env_ready() {
        eprintln!("skipping: backing services not configured");
        return;
    }

    let app = build_app().await;

    let signup_body = json!({
        "fullname": "x",
        "email": "not-an-email",
        "password": "short",
        "bio": ""
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/signup")
        .header("content-type", "application/json")
        .body(Body::from(signup_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
