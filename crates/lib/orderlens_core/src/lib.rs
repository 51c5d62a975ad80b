//! # orderlens_core
//!
//! Core domain logic for OrderLens: tabular loading, order aggregation,
//! numeric JSON sanitization and the LLM chat pipeline.

pub mod chat;
pub mod json;
pub mod llm;
pub mod prompt;
pub mod summary;
pub mod tabular;

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
