//! Conversation context assembly.
//!
//! Pure helpers that turn stored chat state into what the model sees:
//! chat titles, the context window, and the completion message list.

use crate::llm::{CompletionMessage, CompletionRole};
use crate::models::chat::{Message, Role};

/// System prompt sent ahead of every conversation.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Number of most recent messages forwarded to the model with each prompt.
pub const CONTEXT_WINDOW: i64 = 10;

/// Maximum number of chats returned by a history listing.
pub const HISTORY_LIMIT: i64 = 50;

/// Messages shown per chat in a history listing.
pub const HISTORY_PREVIEW: i64 = 1;

/// Characters of the first prompt kept in a chat title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Title for a new chat: the first [`TITLE_MAX_CHARS`] characters of the
/// opening prompt followed by `...`.
pub fn derive_title(prompt: &str) -> String {
    let mut title: String = prompt.chars().take(TITLE_MAX_CHARS).collect();
    title.push_str("...");
    title
}

/// Wire role for a stored message role.
pub fn completion_role(role: Role) -> CompletionRole {
    match role {
        Role::User => CompletionRole::User,
        Role::Model => CompletionRole::Assistant,
    }
}

/// Completion request body: the system prompt followed by `history`
/// (expected oldest first).
pub fn build_completion_messages(
    system_prompt: &str,
    history: &[Message],
) -> Vec<CompletionMessage> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(CompletionMessage::new(CompletionRole::System, system_prompt));
    messages.extend(
        history
            .iter()
            .map(|m| CompletionMessage::new(completion_role(m.role), m.content.clone())),
    );
    messages
}
