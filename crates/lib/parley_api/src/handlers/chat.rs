//! Prompt submission handler.

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::AppResult;
use crate::handlers::{parse_chat_id, require_user_id};
use crate::models::{SendMessageRequest, SendMessageResponse};

/// `POST /api/chat`: store a prompt, generate and store the model's reply.
pub async fn send_message_handler(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<Json<SendMessageResponse>> {
    let user_id = require_user_id(body.user_id)?;
    let chat_id = match body.chat_id.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_chat_id(raw)?),
        _ => None,
    };
    let prompt = body.prompt.unwrap_or_default();

    let reply = state.chat.send_message(&user_id, chat_id, &prompt).await?;
    Ok(Json(SendMessageResponse {
        response: reply.response,
        chat_id: reply.chat_id.to_string(),
    }))
}
