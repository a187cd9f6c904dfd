//! Chat service: chat lifecycle and the prompt/reply flow.
//!
//! Ownership is enforced here: every chat-scoped operation takes the caller's
//! user id and treats someone else's chat exactly like a missing one.

use std::sync::Arc;

use parley_core::context::{
    CONTEXT_WINDOW, HISTORY_LIMIT, HISTORY_PREVIEW, build_completion_messages, derive_title,
};
use parley_core::llm::ChatModel;
use parley_core::models::chat::{Chat, ChatWithMessages, Role};
use parley_core::store::ChatStore;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Outcome of sending a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: Uuid,
    pub response: String,
}

/// Chat operations over a store and a model.
#[derive(Clone)]
pub struct ChatService {
    store: Arc<dyn ChatStore>,
    model: Arc<dyn ChatModel>,
    system_prompt: Arc<str>,
}

impl ChatService {
    pub fn new(
        store: Arc<dyn ChatStore>,
        model: Arc<dyn ChatModel>,
        system_prompt: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            model,
            system_prompt: system_prompt.into(),
        }
    }

    /// The user's most recently active chats, each with its latest message.
    pub async fn history(&self, user_id: &str) -> AppResult<Vec<ChatWithMessages>> {
        Ok(self
            .store
            .list_chats(user_id, HISTORY_LIMIT, HISTORY_PREVIEW)
            .await?)
    }

    /// A chat with its full transcript, oldest message first.
    pub async fn chat(&self, chat_id: &Uuid, user_id: &str) -> AppResult<ChatWithMessages> {
        let chat = self.owned_chat(chat_id, user_id).await?;
        let messages = self.store.messages(&chat.id).await?;
        Ok(ChatWithMessages { chat, messages })
    }

    /// Store `prompt`, ask the model for a reply with recent context, store
    /// the reply.
    ///
    /// Starts a new chat when `chat_id` is `None`. If the model call fails the
    /// prompt stays stored and no reply is written.
    pub async fn send_message(
        &self,
        user_id: &str,
        chat_id: Option<Uuid>,
        prompt: &str,
    ) -> AppResult<Reply> {
        if prompt.trim().is_empty() {
            return Err(AppError::Validation("Prompt is required".into()));
        }

        let chat = match chat_id {
            Some(id) => self.owned_chat(&id, user_id).await?,
            None => {
                let chat = self.store.create_chat(user_id, &derive_title(prompt)).await?;
                info!(chat_id = %chat.id, user_id, "created chat");
                chat
            }
        };

        self.store.append_message(&chat.id, Role::User, prompt).await?;

        let context = self.store.recent_messages(&chat.id, CONTEXT_WINDOW).await?;
        let messages = build_completion_messages(&self.system_prompt, &context);

        let response = self.model.complete(&messages).await.map_err(|e| {
            error!(chat_id = %chat.id, model = self.model.name(), error = %e, "completion failed");
            AppError::from(e)
        })?;

        self.store
            .append_message(&chat.id, Role::Model, &response)
            .await?;

        Ok(Reply {
            chat_id: chat.id,
            response,
        })
    }

    /// Delete a chat and its messages. Returns the deleted chat.
    pub async fn delete_chat(&self, chat_id: &Uuid, user_id: &str) -> AppResult<Chat> {
        let deleted = self
            .store
            .delete_chat(user_id, chat_id)
            .await?
            .ok_or_else(AppError::chat_not_found)?;
        info!(chat_id = %deleted.id, user_id, "deleted chat");
        Ok(deleted)
    }

    /// Whether the backing store answers.
    pub async fn store_reachable(&self) -> bool {
        self.store.ping().await
    }

    async fn owned_chat(&self, chat_id: &Uuid, user_id: &str) -> AppResult<Chat> {
        self.store
            .find_chat(user_id, chat_id)
            .await?
            .ok_or_else(|| {
                warn!(%chat_id, user_id, "chat missing or not owned by caller");
                AppError::chat_not_found()
            })
    }
}
