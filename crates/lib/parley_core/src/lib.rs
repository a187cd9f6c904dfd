//! # parley_core
//!
//! Core domain logic for Parley: chat and message models, persistence,
//! conversation context assembly and the LLM client.

pub mod context;
pub mod llm;
pub mod migrate;
pub mod models;
pub mod store;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!version().is_empty());
    }
}
