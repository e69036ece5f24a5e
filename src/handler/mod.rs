pub mod message_handler;
pub mod user_handler;
