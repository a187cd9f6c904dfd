//! Domain models.
//!
//! These are internal domain models, distinct from the API response models
//! (which carry `#[serde(rename_all = "camelCase")]` for the wire format).

pub mod chat;
