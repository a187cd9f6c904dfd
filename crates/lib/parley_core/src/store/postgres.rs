//! PostgreSQL chat store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ChatStore, StoreError, StoreResult};
use crate::models::chat::{Chat, ChatWithMessages, Message, Role};
use crate::uuid::uuidv7;

/// Row returned by chat queries.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ChatRow {
    id: Uuid,
    user_id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        Chat {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Row returned by message queries.
#[derive(Debug, Clone, sqlx::FromRow)]
struct MessageRow {
    id: Uuid,
    chat_id: Uuid,
    role: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Message {
            id: row.id,
            chat_id: row.chat_id,
            role: row.role.parse::<Role>()?,
            content: row.content,
            created_at: row.created_at,
        })
    }
}

fn into_messages(rows: Vec<MessageRow>) -> StoreResult<Vec<Message>> {
    rows.into_iter().map(Message::try_from).collect()
}

/// Chat store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgChatStore {
    pool: PgPool,
}

impl PgChatStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ChatStore for PgChatStore {
    async fn list_chats(
        &self,
        user_id: &str,
        limit: i64,
        preview: i64,
    ) -> StoreResult<Vec<ChatWithMessages>> {
        let chats = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM chats
            WHERE user_id = $1
            ORDER BY updated_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        if chats.is_empty() || preview <= 0 {
            return Ok(chats
                .into_iter()
                .map(|chat| ChatWithMessages {
                    chat: chat.into(),
                    messages: Vec::new(),
                })
                .collect());
        }

        let ids: Vec<Uuid> = chats.iter().map(|c| c.id).collect();

        // Newest `preview` messages per chat, returned oldest first.
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, role, content, created_at
            FROM (
                SELECT id, chat_id, role, content, created_at,
                       row_number() OVER (
                           PARTITION BY chat_id
                           ORDER BY created_at DESC, id DESC
                       ) AS pos
                FROM messages
                WHERE chat_id = ANY($1)
            ) ranked
            WHERE pos <= $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(&ids[..])
        .bind(preview)
        .fetch_all(&self.pool)
        .await?;

        let mut previews: HashMap<Uuid, Vec<Message>> = HashMap::new();
        for message in into_messages(rows)? {
            previews.entry(message.chat_id).or_default().push(message);
        }

        Ok(chats
            .into_iter()
            .map(|chat| {
                let messages = previews.remove(&chat.id).unwrap_or_default();
                ChatWithMessages {
                    chat: chat.into(),
                    messages,
                }
            })
            .collect())
    }

    async fn find_chat(&self, user_id: &str, chat_id: &Uuid) -> StoreResult<Option<Chat>> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            SELECT id, user_id, title, created_at, updated_at
            FROM chats
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chat::from))
    }

    async fn create_chat(&self, user_id: &str, title: &str) -> StoreResult<Chat> {
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            INSERT INTO chats (id, user_id, title)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, created_at, updated_at
            "#,
        )
        .bind(uuidv7())
        .bind(user_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn append_message(
        &self,
        chat_id: &Uuid,
        role: Role,
        content: &str,
    ) -> StoreResult<Message> {
        let mut tx = self.pool.begin().await?;

        let touched = sqlx::query("UPDATE chats SET updated_at = now() WHERE id = $1")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(StoreError::ChatNotFound(*chat_id));
        }

        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, chat_id, role, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, chat_id, role, content, created_at
            "#,
        )
        .bind(uuidv7())
        .bind(chat_id)
        .bind(role.as_str())
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Message::try_from(row)
    }

    async fn messages(&self, chat_id: &Uuid) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, role, content, created_at
            FROM messages
            WHERE chat_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        into_messages(rows)
    }

    async fn recent_messages(&self, chat_id: &Uuid, limit: i64) -> StoreResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, chat_id, role, content, created_at
            FROM (
                SELECT id, chat_id, role, content, created_at
                FROM messages
                WHERE chat_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(chat_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_messages(rows)
    }

    async fn delete_chat(&self, user_id: &str, chat_id: &Uuid) -> StoreResult<Option<Chat>> {
        // Messages go with the chat via ON DELETE CASCADE.
        let row = sqlx::query_as::<_, ChatRow>(
            r#"
            DELETE FROM chats
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, created_at, updated_at
            "#,
        )
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chat::from))
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
