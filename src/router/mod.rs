pub mod message_router;
pub mod user_router;
pub mod ws_router;
