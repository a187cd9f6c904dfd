//! In-process chat store.
//!
//! Holds chats and messages behind a `tokio::sync::RwLock`. Nothing survives a
//! restart; intended for local runs and tests without PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ChatStore, StoreError, StoreResult};
use crate::models::chat::{Chat, ChatWithMessages, Message, Role};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
struct Inner {
    chats: HashMap<Uuid, Chat>,
    /// Messages per chat in insertion (= creation) order.
    messages: HashMap<Uuid, Vec<Message>>,
    last_stamp: Option<DateTime<Utc>>,
}

impl Inner {
    /// Strictly increasing timestamps, so ordering never depends on clock
    /// resolution.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn owned(&self, user_id: &str, chat_id: &Uuid) -> Option<&Chat> {
        self.chats.get(chat_id).filter(|c| c.user_id == user_id)
    }
}

/// Chat store that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryChatStore {
    inner: RwLock<Inner>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn tail(messages: &[Message], limit: i64) -> Vec<Message> {
    let keep = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
    let start = messages.len().saturating_sub(keep);
    messages[start..].to_vec()
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn list_chats(
        &self,
        user_id: &str,
        limit: i64,
        preview: i64,
    ) -> StoreResult<Vec<ChatWithMessages>> {
        let inner = self.inner.read().await;

        let mut chats: Vec<&Chat> = inner
            .chats
            .values()
            .filter(|c| c.user_id == user_id)
            .collect();
        chats.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));

        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        Ok(chats
            .into_iter()
            .take(limit)
            .map(|chat| ChatWithMessages {
                chat: chat.clone(),
                messages: inner
                    .messages
                    .get(&chat.id)
                    .map(|m| tail(m, preview))
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn find_chat(&self, user_id: &str, chat_id: &Uuid) -> StoreResult<Option<Chat>> {
        Ok(self.inner.read().await.owned(user_id, chat_id).cloned())
    }

    async fn create_chat(&self, user_id: &str, title: &str) -> StoreResult<Chat> {
        let mut inner = self.inner.write().await;
        let stamp = inner.tick();
        let chat = Chat {
            id: uuidv7(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            created_at: stamp,
            updated_at: stamp,
        };
        inner.chats.insert(chat.id, chat.clone());
        Ok(chat)
    }

    async fn append_message(
        &self,
        chat_id: &Uuid,
        role: Role,
        content: &str,
    ) -> StoreResult<Message> {
        let mut inner = self.inner.write().await;
        let stamp = inner.tick();
        let chat = inner
            .chats
            .get_mut(chat_id)
            .ok_or(StoreError::ChatNotFound(*chat_id))?;
        chat.updated_at = stamp;

        let message = Message {
            id: uuidv7(),
            chat_id: *chat_id,
            role,
            content: content.to_string(),
            created_at: stamp,
        };
        inner
            .messages
            .entry(*chat_id)
            .or_default()
            .push(message.clone());
        Ok(message)
    }

    async fn messages(&self, chat_id: &Uuid) -> StoreResult<Vec<Message>> {
        Ok(self
            .inner
            .read()
            .await
            .messages
            .get(chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn recent_messages(&self, chat_id: &Uuid, limit: i64) -> StoreResult<Vec<Message>> {
        Ok(self
            .inner
            .read()
            .await
            .messages
            .get(chat_id)
            .map(|m| tail(m, limit))
            .unwrap_or_default())
    }

    async fn delete_chat(&self, user_id: &str, chat_id: &Uuid) -> StoreResult<Option<Chat>> {
        let mut inner = self.inner.write().await;
        if inner.owned(user_id, chat_id).is_none() {
            return Ok(None);
        }
        inner.messages.remove(chat_id);
        Ok(inner.chats.remove(chat_id))
    }

    async fn ping(&self) -> bool {
        true
    }
}
