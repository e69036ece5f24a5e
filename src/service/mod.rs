pub mod chat_service;
pub mod user_service;
