// Helper for generating UUIDv7 (timestamp-sortable UUIDs).
//
// Chats and messages are keyed by UUIDv7 generated app-side, so id order
// follows creation order and can break `created_at` ties.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse a caller-supplied chat id. Returns `None` for anything malformed.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
