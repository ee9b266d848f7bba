//! handlers/mod.rs
pub mod email_handler;
pub mod user_handler;
