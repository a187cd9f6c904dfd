//! Chat history, transcript and deletion handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::AppState;
use crate::error::AppResult;
use crate::handlers::{parse_chat_id, require_user_id};
use crate::models::{ChatView, UserQuery};

/// `GET /api/history`: the caller's recent chats, each with its latest message.
pub async fn history_handler(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<Vec<ChatView>>> {
    let user_id = require_user_id(query.user_id)?;
    let chats = state.chat.history(&user_id).await?;
    Ok(Json(chats.into_iter().map(ChatView::from).collect()))
}

/// `GET /api/chats/{chat_id}`: a chat with its full transcript.
pub async fn get_chat_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<ChatView>> {
    let user_id = require_user_id(query.user_id)?;
    let chat_id = parse_chat_id(&chat_id)?;
    let chat = state.chat.chat(&chat_id, &user_id).await?;
    Ok(Json(chat.into()))
}

/// `DELETE /api/chats/{chat_id}`: delete a chat and its messages.
pub async fn delete_chat_handler(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<ChatView>> {
    let user_id = require_user_id(query.user_id)?;
    let chat_id = parse_chat_id(&chat_id)?;
    let deleted = state.chat.delete_chat(&chat_id, &user_id).await?;
    Ok(Json(deleted.into()))
}
