use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tracing::info;

use crate::config::app_conf::AppConfig;
use crate::config::jwt_conf::JwtConfig;
use crate::config::mongo_conf::MongoConfig;
use crate::config::MinioConfig;
use crate::middlewares::auth_middleware::AuthState;
use crate::realtime::presence::PresenceRegistry;
use crate::realtime::socket::WsState;
use crate::repository::message_repo::MessageRepositoryImpl;
use crate::repository::user_repo::UserRepositoryImpl;
use crate::router::message_router::message_router;
use crate::router::user_router::user_router;
use crate::router::ws_router::ws_router;
use crate::service::chat_service::ChatServiceImpl;
use crate::service::user_service::UserServiceImpl;
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::minio::MinioService;

pub struct App {
    config: AppConfig,
    router: Router,
    pub user_service: Arc<UserServiceImpl>,
    pub chat_service: Arc<ChatServiceImpl>,
    pub presence: Arc<PresenceRegistry>,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();

        let jwt_config = JwtConfig::from_env().expect("JWT config error");
        let mongo_config = MongoConfig::from_env().expect("Mongo config error");
        let minio_config = MinioConfig::from_env().expect("Minio config error");

        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let user_repo = Arc::new(
            UserRepositoryImpl::new(&mongo_config)
                .await
                .expect("User repo error"),
        );
        let message_repo = Arc::new(
            MessageRepositoryImpl::new(&mongo_config)
                .await
                .expect("Message repo error"),
        );
        let media = Arc::new(
            MinioService::new(minio_config)
                .await
                .expect("Media storage error"),
        );
        let presence = Arc::new(PresenceRegistry::new());

        let user_service = Arc::new(UserServiceImpl::new(
            user_repo.clone(),
            jwt_utils.clone(),
            media.clone(),
        ));
        let chat_service = Arc::new(ChatServiceImpl::new(
            message_repo,
            user_repo,
            media,
            presence.clone(),
        ));

        let auth_state = Arc::new(AuthState {
            jwt_utils: jwt_utils.clone(),
        });
        let ws_state = Arc::new(WsState {
            jwt_utils,
            presence: presence.clone(),
        });

        let router = Self::create_router(
            user_service.clone(),
            chat_service.clone(),
            auth_state,
            ws_state,
        );

        App {
            config,
            router,
            user_service,
            chat_service,
            presence,
        }
    }

    fn create_router(
        user_service: Arc<UserServiceImpl>,
        chat_service: Arc<ChatServiceImpl>,
        auth_state: Arc<AuthState>,
        ws_state: Arc<WsState>,
    ) -> Router {
        Router::new()
            .merge(user_router(user_service, auth_state.clone()))
            .merge(message_router(chat_service, auth_state))
            .merge(ws_router(ws_state))
            .route("/health", get(|| async { "OK" }))
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(
            self.config.host.parse().expect("Invalid host"),
            self.config.port,
        );
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind address");
        axum::serve(listener, self.router)
            .await
            .expect("Failed to start server");
    }
}
