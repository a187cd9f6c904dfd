//! # parley_api
//!
//! HTTP API library for Parley.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use parley_core::llm::ChatModel;
use parley_core::store::ChatStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{chat, chats, health};
use crate::services::chat::ChatService;

/// Route paths.
pub mod routes {
    pub const GET_API_HEALTH: &str = "/api/health";
    pub const GET_API_HISTORY: &str = "/api/history";
    pub const GET_API_CHATS_ID: &str = "/api/chats/{chat_id}";
    pub const DELETE_API_CHATS_ID: &str = "/api/chats/{chat_id}";
    pub const POST_API_CHAT: &str = "/api/chat";
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Chat lifecycle operations.
    pub chat: ChatService,
    /// API configuration.
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Wire a store and a model into the chat service.
    pub fn new(store: Arc<dyn ChatStore>, model: Arc<dyn ChatModel>, config: ApiConfig) -> Self {
        let chat = ChatService::new(store, model, config.system_prompt.clone());
        Self {
            chat,
            config: Arc::new(config),
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `parley_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    parley_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
///
/// The caller-supplied `userId` is trusted as-is; identity is established
/// upstream by the client's identity provider.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(routes::GET_API_HISTORY, get(chats::history_handler))
        .route(routes::GET_API_CHATS_ID, get(chats::get_chat_handler))
        .route(routes::DELETE_API_CHATS_ID, delete(chats::delete_chat_handler))
        .route(routes::POST_API_CHAT, post(chat::send_message_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
