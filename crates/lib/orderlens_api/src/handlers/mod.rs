//! Request handlers.

pub mod chat;
pub mod convert;
pub mod health;
