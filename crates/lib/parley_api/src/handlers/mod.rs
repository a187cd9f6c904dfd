//! Request handlers.

pub mod chat;
pub mod chats;
pub mod health;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// The caller's user id, required on every chat endpoint.
///
/// Blank ids are rejected; anything else is passed through unchanged, since
/// ownership is an exact match on the supplied id.
pub(crate) fn require_user_id(user_id: Option<String>) -> AppResult<String> {
    user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("User ID required".into()))
}

/// A chat id from a path or body. Malformed ids can't name an existing chat.
pub(crate) fn parse_chat_id(raw: &str) -> AppResult<Uuid> {
    parley_core::uuid::parse_id(raw).ok_or_else(AppError::chat_not_found)
}
