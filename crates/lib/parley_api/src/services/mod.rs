//! Business logic shared by the request handlers.

pub mod chat;
