//! Chat persistence.
//!
//! [`ChatStore`] is the seam between the chat service and storage.
//! [`postgres::PgChatStore`] is the production backend;
//! [`memory::MemoryChatStore`] keeps everything in process for local runs
//! without a database.
//!
//! Every chat-scoped read or delete takes the caller's user id and only
//! matches chats owned by that user.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::chat::{Chat, ChatWithMessages, Message, Role, UnknownRole};

pub use memory::MemoryChatStore;
pub use postgres::PgChatStore;

/// Errors that can occur in a chat store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Chat not found: {0}")]
    ChatNotFound(Uuid),

    #[error("Corrupt row: {0}")]
    Corrupt(#[from] UnknownRole),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operations needed by the chat service.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Chats owned by `user_id`, most recently updated first, at most `limit`.
    /// Each carries at most `preview` of its newest messages, oldest first.
    async fn list_chats(
        &self,
        user_id: &str,
        limit: i64,
        preview: i64,
    ) -> StoreResult<Vec<ChatWithMessages>>;

    /// The chat with `chat_id` if it exists and is owned by `user_id`.
    async fn find_chat(&self, user_id: &str, chat_id: &Uuid) -> StoreResult<Option<Chat>>;

    /// Create an empty chat for `user_id`.
    async fn create_chat(&self, user_id: &str, title: &str) -> StoreResult<Chat>;

    /// Append a message and touch the chat's `updated_at`.
    async fn append_message(
        &self,
        chat_id: &Uuid,
        role: Role,
        content: &str,
    ) -> StoreResult<Message>;

    /// All messages of a chat, oldest first.
    async fn messages(&self, chat_id: &Uuid) -> StoreResult<Vec<Message>>;

    /// The newest `limit` messages of a chat, oldest first.
    async fn recent_messages(&self, chat_id: &Uuid, limit: i64) -> StoreResult<Vec<Message>>;

    /// Delete a chat owned by `user_id` together with its messages.
    /// Returns the deleted chat, or `None` if nothing matched.
    async fn delete_chat(&self, user_id: &str, chat_id: &Uuid) -> StoreResult<Option<Chat>>;

    /// Whether the backing store is reachable.
    async fn ping(&self) -> bool;
}
